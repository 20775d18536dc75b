use super::configurator::{CompletionFieldLayout, CompletionRuleConfigurator};
use super::lock::CompletionLockDecision;
use super::settings::CompletionSettings;
use super::types::{fields, FieldErrors, SubmittedData};

/// What a save does to the stored settings and recorded progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub settings: CompletionSettings,
    pub reset_progress: bool,
}

/// Outcome of a completion settings POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// The unlock button was pressed; show the form again, now editable.
    Redisplay,
    Rejected(FieldErrors),
    Save(SavePlan),
}

/// Whether completion rules may change in this request. No decision means
/// completion is off for the course, so nothing is frozen.
pub fn rules_editable(lock: Option<&CompletionLockDecision>) -> bool {
    lock.is_none_or(|decision| !decision.is_locked())
}

/// Decide what a submission does, using the lock decided for this request
/// rather than the hidden unlock flag the browser sent back.
pub fn plan_submit(
    configurator: &CompletionRuleConfigurator<'_>,
    data: &SubmittedData,
    layout: &CompletionFieldLayout,
    lock: Option<&CompletionLockDecision>,
    previous: &CompletionSettings,
) -> SubmitAction {
    if data.get(fields::UNLOCK_BUTTON).is_some() {
        return SubmitAction::Redisplay;
    }

    let unlocked = rules_editable(lock);
    let errors = configurator.validate(data, unlocked);
    if !errors.is_empty() {
        return SubmitAction::Rejected(errors);
    }

    let submitted = CompletionSettings::from_submission(data, &layout.grade_fields, &layout.custom_fields);
    let settings = if unlocked {
        submitted
    } else {
        // Frozen rules stay as stored; the expected date is never frozen.
        CompletionSettings { expected: submitted.expected, ..previous.clone() }
    };
    let reset_progress = lock.is_some() && unlocked && settings.changes_rules_of(previous);

    SubmitAction::Save(SavePlan { settings, reset_progress })
}

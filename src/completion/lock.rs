use std::collections::BTreeSet;

use super::collaborators::{CompletionCountSource, Localizer};
use super::form::{FormError, FormField, FormFieldSink};
use super::types::fields;

/// Notice shown above the completion fields once progress exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockNotice {
    /// Settings were unlocked; saving will erase recorded progress.
    Unlocked,
    /// Settings are frozen because `count` users have progress.
    Locked { count: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionLockDecision {
    /// Non-empty only when progress exists and no unlock was requested.
    pub frozen_fields: BTreeSet<String>,
    pub unlock_requested: bool,
    pub completed_user_count: i64,
    pub show_unlock_button: bool,
    /// Value to force into the hidden unlock flag, if any.
    pub unlocked_flag: Option<bool>,
    pub notice: Option<LockNotice>,
}

impl CompletionLockDecision {
    pub fn is_locked(&self) -> bool {
        !self.frozen_fields.is_empty()
    }
}

/// Decides whether saved completion settings are read-only for this edit.
pub struct CompletionLockState<'a> {
    strings: &'a dyn Localizer,
}

impl<'a> CompletionLockState<'a> {
    pub fn new(strings: &'a dyn Localizer) -> Self {
        Self { strings }
    }

    /// Pure decision. `form` is only read, for which optional fields exist
    /// and whether pass-grade was submitted as checked.
    pub fn decide(
        form: &dyn FormFieldSink,
        completed_user_count: i64,
        unlock_button_pressed: bool,
        unlock_field_already_set: bool,
        custom_fields: &[String],
    ) -> CompletionLockDecision {
        let unlock_requested = unlock_button_pressed || unlock_field_already_set;

        if completed_user_count <= 0 {
            return CompletionLockDecision {
                frozen_fields: BTreeSet::new(),
                unlock_requested,
                completed_user_count: 0,
                show_unlock_button: false,
                unlocked_flag: Some(true),
                notice: None,
            };
        }

        if unlock_requested {
            return CompletionLockDecision {
                frozen_fields: BTreeSet::new(),
                unlock_requested,
                completed_user_count,
                show_unlock_button: false,
                unlocked_flag: Some(true),
                notice: Some(LockNotice::Unlocked),
            };
        }

        let mut frozen = BTreeSet::new();
        frozen.insert(fields::COMPLETION.to_string());
        for name in [fields::VIEW, fields::USE_GRADE, fields::PASS_GRADE, fields::GRADE_ITEM_NUMBER] {
            if form.has_field(name) {
                frozen.insert(name.to_string());
            }
        }
        // A pass-grade requirement pins the host's pass grade value too.
        let pass_grade_checked = form
            .submitted(fields::PASS_GRADE)
            .is_some_and(|v| !v.is_empty() && v != "0");
        if form.has_field(fields::PASS_GRADE) && pass_grade_checked {
            frozen.insert(fields::GRADE_PASS.to_string());
        }
        frozen.extend(custom_fields.iter().cloned());

        CompletionLockDecision {
            frozen_fields: frozen,
            unlock_requested,
            completed_user_count,
            show_unlock_button: true,
            unlocked_flag: None,
            notice: Some(LockNotice::Locked { count: completed_user_count }),
        }
    }

    /// Apply a decision to the form the configurator built.
    pub fn apply(&self, form: &mut dyn FormFieldSink, decision: &CompletionLockDecision) -> Result<(), FormError> {
        match decision.notice {
            Some(LockNotice::Unlocked) => {
                let notice = FormField::notice(
                    fields::UNLOCKED_NOTICE,
                    self.strings.get_string("completedunlocked", "completion", None),
                    self.strings.get_string("completedunlockedtext", "completion", None),
                );
                form.insert_before(notice, fields::UNLOCK_BUTTON)?;
            }
            Some(LockNotice::Locked { count }) => {
                let notice = FormField::notice(
                    fields::WARNING_NOTICE,
                    self.strings.get_string("completedwarning", "completion", None),
                    self.strings
                        .get_string("completedwarningtext", "completion", Some(&count.to_string())),
                );
                form.insert_before(notice, fields::UNLOCK_BUTTON)?;
            }
            None => {}
        }

        if !decision.show_unlock_button && form.has_field(fields::UNLOCK_BUTTON) {
            form.remove_field(fields::UNLOCK_BUTTON)?;
        }
        if let Some(flag) = decision.unlocked_flag {
            form.set_value(fields::UNLOCKED, if flag { "1" } else { "0" })?;
        }
        for name in &decision.frozen_fields {
            // The pass grade value belongs to the host form and may be absent here.
            if name == fields::GRADE_PASS && !form.has_field(name) {
                continue;
            }
            form.freeze(name)?;
        }
        Ok(())
    }

    /// Runs after the form is built and the submission is known. Does
    /// nothing when completion tracking is off for the course.
    pub fn lock_after_data(
        &self,
        form: &mut dyn FormFieldSink,
        course_completion_enabled: bool,
        cm_id: Option<i64>,
        progress: &dyn CompletionCountSource,
        custom_fields: &[String],
    ) -> Result<Option<CompletionLockDecision>, FormError> {
        if !course_completion_enabled {
            return Ok(None);
        }
        let count = cm_id.map_or(0, |id| progress.count_users_with_progress(id));
        let button_pressed = form.submitted(fields::UNLOCK_BUTTON).is_some();
        let already_set = form
            .submitted(fields::UNLOCKED)
            .is_some_and(|v| !v.is_empty() && v != "0");

        let decision = Self::decide(&*form, count, button_pressed, already_set, custom_fields);
        log::debug!(
            "Completion lock for cm {:?}: count={} unlock_requested={} frozen={}",
            cm_id,
            count,
            decision.unlock_requested,
            decision.frozen_fields.len()
        );
        self.apply(form, &decision)?;
        Ok(Some(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::collaborators::ProgressSnapshot;
    use crate::completion::form::CompletionFieldSet;
    use crate::completion::strings::EnglishStrings;
    use crate::completion::types::SubmittedData;

    fn base_form(submission: SubmittedData) -> CompletionFieldSet {
        let mut form = CompletionFieldSet::with_submission(submission);
        form.add_field(FormField::no_submit_button(fields::UNLOCK_BUTTON, "Unlock"));
        form.add_field(FormField::hidden(fields::UNLOCKED, "0"));
        form.add_field(FormField::select(fields::COMPLETION, "Completion", vec![]));
        form.add_field(FormField::checkbox(fields::VIEW, "", ""));
        form.add_field(FormField::checkbox(fields::PASS_GRADE, "", ""));
        form
    }

    #[test]
    fn no_progress_removes_button_and_sets_flag() {
        let mut form = base_form(SubmittedData::new());
        let lock = CompletionLockState::new(&EnglishStrings);
        let snapshot = ProgressSnapshot { cm_id: 1, count: 0 };
        let decision = lock
            .lock_after_data(&mut form, true, Some(1), &snapshot, &[])
            .unwrap()
            .unwrap();
        assert!(decision.frozen_fields.is_empty());
        assert!(!form.has_field(fields::UNLOCK_BUTTON));
        assert_eq!(form.effective_value(fields::UNLOCKED), Some("1"));
    }

    #[test]
    fn locked_inserts_warning_before_button_and_freezes() {
        let mut form = base_form(SubmittedData::new().with(fields::PASS_GRADE, "1"));
        form.add_field(FormField::text(fields::GRADE_PASS, "Grade to pass"));
        let lock = CompletionLockState::new(&EnglishStrings);
        let snapshot = ProgressSnapshot { cm_id: 1, count: 4 };
        let custom = vec!["completionsubmit".to_string()];
        form.add_field(FormField::checkbox("completionsubmit", "", ""));
        lock.lock_after_data(&mut form, true, Some(1), &snapshot, &custom).unwrap();

        assert_eq!(&form.names()[..2], &[fields::WARNING_NOTICE, fields::UNLOCK_BUTTON]);
        for name in [fields::COMPLETION, fields::VIEW, fields::PASS_GRADE, fields::GRADE_PASS, "completionsubmit"] {
            assert!(form.field(name).unwrap().frozen, "{name} should be frozen");
        }
        let warning = form.field(fields::WARNING_NOTICE).unwrap();
        assert!(matches!(&warning.kind, crate::completion::form::FieldKind::Static { text } if text.starts_with("4 students")));
    }

    #[test]
    fn stored_unlock_flag_keeps_settings_editable() {
        let mut form = base_form(SubmittedData::new().with(fields::UNLOCKED, "1"));
        let lock = CompletionLockState::new(&EnglishStrings);
        let snapshot = ProgressSnapshot { cm_id: 1, count: 4 };
        let decision = lock
            .lock_after_data(&mut form, true, Some(1), &snapshot, &[])
            .unwrap()
            .unwrap();
        assert_eq!(decision.notice, Some(LockNotice::Unlocked));
        assert!(form.has_field(fields::UNLOCKED_NOTICE));
        assert!(!form.has_field(fields::UNLOCK_BUTTON));
        assert!(!form.field(fields::COMPLETION).unwrap().frozen);
    }

    #[test]
    fn course_without_completion_is_untouched() {
        let mut form = base_form(SubmittedData::new());
        let before = form.names().len();
        let lock = CompletionLockState::new(&EnglishStrings);
        let snapshot = ProgressSnapshot { cm_id: 1, count: 9 };
        assert!(lock.lock_after_data(&mut form, false, Some(1), &snapshot, &[]).unwrap().is_none());
        assert_eq!(form.names().len(), before);
    }

    #[test]
    fn new_activity_counts_as_no_progress() {
        let mut form = base_form(SubmittedData::new());
        let lock = CompletionLockState::new(&EnglishStrings);
        let snapshot = ProgressSnapshot { cm_id: 1, count: 9 };
        let decision = lock.lock_after_data(&mut form, true, None, &snapshot, &[]).unwrap().unwrap();
        assert!(!decision.is_locked());
    }
}

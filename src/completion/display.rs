use chrono::{DateTime, Utc};
use serde::Serialize;

use super::collaborators::Localizer;

/// One completion condition as seen by the viewing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCondition {
    pub key: String,
    pub description: String,
    pub complete: bool,
}

/// Completion state of a course module for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionDetails {
    pub has_completion: bool,
    pub is_automatic: bool,
    /// Manual completion button is shown to the tracked user on the course page.
    pub show_manual_completion: bool,
    pub overall_complete: bool,
    pub conditions: Vec<CompletionCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDate {
    /// e.g. "timeopen"
    pub data_id: String,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityDate {
    pub fn formatted(&self) -> String {
        self.timestamp.format("%A, %-d %B %Y, %H:%M").to_string()
    }
}

/// Course-level display switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseDisplaySettings {
    pub show_completion_conditions: bool,
    pub show_activity_dates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionDialog {
    pub button_label: String,
    pub classes: String,
    pub button_classes: String,
    pub position: String,
}

/// What the course page renders for one module and one user. Rebuilt per view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionDisplaySnapshot {
    /// The module tracks completion at all.
    pub has_completion: bool,
    /// Completion info is rendered under the course display settings.
    pub show_completion: bool,
    pub is_automatic: bool,
    pub is_manual: bool,
    pub is_tracked_user: bool,
    pub show_manual_button: bool,
    pub overall_complete: bool,
    pub conditions: Vec<CompletionCondition>,
    pub activity_dates: Vec<ActivityDate>,
    pub dialog: Option<CompletionDialog>,
}

impl CompletionDisplaySnapshot {
    pub fn has_dates(&self) -> bool {
        !self.activity_dates.is_empty()
    }
}

pub struct CompletionDisplayDecision<'a> {
    strings: &'a dyn Localizer,
}

impl<'a> CompletionDisplayDecision<'a> {
    pub fn new(strings: &'a dyn Localizer) -> Self {
        Self { strings }
    }

    /// `None` when the module tracks no completion and has no dates to show.
    pub fn decide(
        &self,
        details: &CompletionDetails,
        activity_dates: Vec<ActivityDate>,
        viewing_user_is_tracked: bool,
        settings: CourseDisplaySettings,
    ) -> Option<CompletionDisplaySnapshot> {
        let activity_dates = if settings.show_activity_dates { activity_dates } else { vec![] };
        if !details.has_completion && activity_dates.is_empty() {
            return None;
        }

        let show_completion_info = details.has_completion
            && (settings.show_completion_conditions
                || (!details.is_automatic && details.show_manual_completion));

        let is_automatic = details.has_completion && details.is_automatic;
        let is_manual = details.has_completion && !details.is_automatic;

        let mut snapshot = CompletionDisplaySnapshot {
            has_completion: details.has_completion,
            show_completion: show_completion_info,
            is_automatic,
            is_manual,
            is_tracked_user: viewing_user_is_tracked,
            show_manual_button: show_completion_info
                && is_manual
                && viewing_user_is_tracked
                && details.show_manual_completion,
            overall_complete: details.overall_complete,
            conditions: if show_completion_info { details.conditions.clone() } else { vec![] },
            activity_dates,
            dialog: None,
        };

        if snapshot.is_automatic || (snapshot.is_manual && !snapshot.is_tracked_user) {
            snapshot.dialog = Some(self.dialog(snapshot.is_tracked_user));
        }
        Some(snapshot)
    }

    fn dialog(&self, tracked_user: bool) -> CompletionDialog {
        let key = if tracked_user { "todo" } else { "completionmenuitem" };
        CompletionDialog {
            button_label: self.strings.get_string(key, "completion", None),
            classes: "completion-dropdown".to_string(),
            button_classes: "btn btn-sm btn-outline-secondary dropdown-toggle".to_string(),
            position: "end".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::strings::EnglishStrings;
    use chrono::TimeZone;

    fn date() -> ActivityDate {
        ActivityDate {
            data_id: "timeopen".into(),
            label: "Opens:".into(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        }
    }

    fn all_on() -> CourseDisplaySettings {
        CourseDisplaySettings { show_completion_conditions: true, show_activity_dates: true }
    }

    #[test]
    fn activity_date_serialises_with_timestamp() {
        let value = serde_json::to_value(date()).unwrap();
        assert_eq!(value["data_id"], "timeopen");
        assert_eq!(value["timestamp"], "2026-03-02T09:00:00Z");
    }

    #[test]
    fn nothing_to_show_returns_none() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        assert!(decision.decide(&CompletionDetails::default(), vec![], true, all_on()).is_none());
    }

    #[test]
    fn dates_alone_produce_snapshot_without_dialog() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let snapshot = decision.decide(&CompletionDetails::default(), vec![date()], true, all_on()).unwrap();
        assert!(!snapshot.has_completion);
        assert!(!snapshot.show_completion);
        assert!(snapshot.has_dates());
        assert!(snapshot.dialog.is_none());
    }

    #[test]
    fn dates_hidden_by_course_setting() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let settings = CourseDisplaySettings { show_completion_conditions: true, show_activity_dates: false };
        assert!(decision.decide(&CompletionDetails::default(), vec![date()], true, settings).is_none());
    }

    #[test]
    fn automatic_gets_todo_dialog_for_tracked_user() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let details = CompletionDetails { has_completion: true, is_automatic: true, ..Default::default() };
        let snapshot = decision.decide(&details, vec![], true, all_on()).unwrap();
        assert_eq!(snapshot.dialog.unwrap().button_label, "To do");
    }

    #[test]
    fn manual_tracked_user_gets_button_not_dialog() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let details = CompletionDetails { has_completion: true, show_manual_completion: true, ..Default::default() };
        let settings = CourseDisplaySettings { show_completion_conditions: false, show_activity_dates: true };
        let snapshot = decision.decide(&details, vec![], true, settings).unwrap();
        assert!(snapshot.is_manual);
        assert!(snapshot.show_manual_button);
        assert!(snapshot.dialog.is_none());
    }

    #[test]
    fn manual_for_other_viewer_gets_menu_dialog() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let details = CompletionDetails { has_completion: true, show_manual_completion: true, ..Default::default() };
        let snapshot = decision.decide(&details, vec![], false, all_on()).unwrap();
        assert_eq!(snapshot.dialog.unwrap().button_label, "Completion");
    }

    #[test]
    fn automatic_with_conditions_hidden_keeps_kind_and_dialog() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let details = CompletionDetails {
            has_completion: true,
            is_automatic: true,
            conditions: vec![CompletionCondition {
                key: "completionview".into(),
                description: "View".into(),
                complete: false,
            }],
            ..Default::default()
        };
        let settings = CourseDisplaySettings { show_completion_conditions: false, show_activity_dates: true };
        let snapshot = decision.decide(&details, vec![date()], true, settings).unwrap();
        assert!(snapshot.has_completion);
        assert!(!snapshot.show_completion);
        assert!(snapshot.is_automatic);
        assert!(snapshot.conditions.is_empty());
        assert_eq!(snapshot.dialog.unwrap().button_label, "To do");
    }

    #[test]
    fn manual_button_needs_completion_info_shown() {
        let decision = CompletionDisplayDecision::new(&EnglishStrings);
        let details = CompletionDetails { has_completion: true, ..Default::default() };
        let settings = CourseDisplaySettings { show_completion_conditions: false, show_activity_dates: true };
        let snapshot = decision.decide(&details, vec![date()], true, settings).unwrap();
        assert!(snapshot.is_manual);
        assert!(!snapshot.show_completion);
        assert!(!snapshot.show_manual_button);
    }
}

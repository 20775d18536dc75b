use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::configurator::{GradeCompletionSelection, GradeFieldLayout};
use super::types::{fields, CompletionTrackingMode, SubmittedData};

const EXPECTED_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Stored completion configuration of one course module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    pub mode: CompletionTrackingMode,
    pub view: bool,
    pub use_grade: bool,
    pub grade_item_number: Option<i64>,
    pub pass_grade: bool,
    /// Unix timestamp, 0 when no date is expected.
    pub expected: i64,
    /// Module rule fields, as submitted.
    pub custom_rules: BTreeMap<String, String>,
}

impl CompletionSettings {
    /// Settings from a validated submission. Automatic requirements are
    /// dropped unless the mode is automatic.
    pub fn from_submission(data: &SubmittedData, grade_fields: &GradeFieldLayout, custom_fields: &[String]) -> Self {
        let mode = data.mode().unwrap_or_default();
        let expected = if mode == CompletionTrackingMode::None {
            0
        } else {
            data.get(fields::EXPECTED)
                .and_then(|v| NaiveDateTime::parse_from_str(v.trim(), EXPECTED_FORMAT).ok())
                .map_or(0, |dt| Utc.from_utc_datetime(&dt).timestamp())
        };

        let mut settings = CompletionSettings { mode, expected, ..Default::default() };
        if mode != CompletionTrackingMode::Automatic {
            return settings;
        }

        settings.view = data.is_set(fields::VIEW);
        match GradeCompletionSelection::from_submission(grade_fields, data) {
            Some(GradeCompletionSelection::SingleItem { use_grade, use_pass_grade }) => {
                settings.use_grade = use_grade || use_pass_grade;
                settings.pass_grade = use_grade && use_pass_grade;
                if settings.use_grade {
                    if let GradeFieldLayout::SingleItem { item_number, .. } = grade_fields {
                        settings.grade_item_number = Some(*item_number);
                    }
                }
            }
            Some(GradeCompletionSelection::MultiItem { selected_item_number, use_pass_grade }) => {
                settings.grade_item_number = selected_item_number;
                settings.use_grade = selected_item_number.is_some();
                settings.pass_grade = settings.use_grade && use_pass_grade;
            }
            None => {}
        }
        for name in custom_fields {
            if let Some(value) = data.get(name) {
                settings.custom_rules.insert(name.clone(), value.to_string());
            }
        }
        settings
    }

    /// Values the form shows for these settings before anything is submitted.
    pub fn to_form_values(&self) -> SubmittedData {
        let mut data = SubmittedData::new().with(fields::COMPLETION, &self.mode.form_value());
        if self.view {
            data.insert(fields::VIEW, "1");
        }
        if self.use_grade {
            data.insert(fields::USE_GRADE, "1");
        }
        if self.pass_grade {
            data.insert(fields::PASS_GRADE, "1");
        }
        if let Some(n) = self.grade_item_number {
            data.insert(fields::GRADE_ITEM_NUMBER, n.to_string());
        }
        if self.expected > 0 {
            if let Some(dt) = Utc.timestamp_opt(self.expected, 0).single() {
                data.insert(fields::EXPECTED, dt.format(EXPECTED_FORMAT).to_string());
            }
        }
        for (name, value) in &self.custom_rules {
            data.insert(name.clone(), value.clone());
        }
        data
    }

    /// Whether saving `self` over `previous` changes how completion is computed.
    pub fn changes_rules_of(&self, previous: &CompletionSettings) -> bool {
        self.mode != previous.mode
            || self.view != previous.view
            || self.use_grade != previous.use_grade
            || self.grade_item_number != previous.grade_item_number
            || self.pass_grade != previous.pass_grade
            || self.custom_rules != previous.custom_rules
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::completion::{ActivityCompletionCapabilities, CompletionSettings, CompletionTrackingMode};

/// A course module together with what its module type supports.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Activity {
    pub id: i64,
    pub course_id: i64,
    pub modname: String,
    pub name: String,
    pub assessed: i32,
    pub completion: i16,
    pub completion_view: bool,
    pub completion_use_grade: bool,
    pub completion_grade_item_number: Option<i64>,
    pub completion_pass_grade: bool,
    pub completion_expected: i64,
    pub completion_custom: String, // JSON object of module rule fields
    pub time_open: Option<DateTime<Utc>>,
    pub time_close: Option<DateTime<Utc>>,
    pub tracks_views: bool,
    pub has_grade: bool,
    pub has_rules: bool,
    pub default_completion: bool,
    pub rating: bool,
}

impl Activity {
    pub fn capabilities(&self, system_default_enabled: bool) -> ActivityCompletionCapabilities {
        ActivityCompletionCapabilities {
            module_name: self.modname.clone(),
            supports_views: self.tracks_views,
            supports_grades: self.has_grade,
            supports_rating: self.rating,
            has_module_specific_rules: self.has_rules,
            system_default_enabled,
            module_default_enabled: self.default_completion,
        }
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        let custom_rules: BTreeMap<String, String> =
            serde_json::from_str(&self.completion_custom).unwrap_or_else(|e| {
                log::warn!("Bad completion_custom JSON on cm {}: {}", self.id, e);
                BTreeMap::new()
            });
        CompletionSettings {
            mode: CompletionTrackingMode::from_i16(self.completion).unwrap_or_default(),
            view: self.completion_view,
            use_grade: self.completion_use_grade,
            grade_item_number: self.completion_grade_item_number,
            pass_grade: self.completion_pass_grade,
            expected: self.completion_expected,
            custom_rules,
        }
    }
}

use super::collaborators::Localizer;

/// Built-in English labels. Unknown keys come back as `[[key,component]]`
/// so a missing string is visible on the page instead of blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishStrings;

impl EnglishStrings {
    fn lookup(key: &str, component: &str) -> Option<&'static str> {
        let s = match (component, key) {
            ("completion", "completion") => "Completion tracking",
            ("completion", "completion_none") => "Do not indicate activity completion",
            ("completion", "completion_manual") => "Students can manually mark the activity as completed",
            ("completion", "completion_automatic") => "Show activity as complete when conditions are met",
            ("completion", "completionview") => "Require view",
            ("completion", "completionview_desc") => "Student must view this activity to complete it",
            ("completion", "completionusegrade") => "Receive a grade",
            ("completion", "completionusegrade_desc") => "Student must receive a grade to complete this activity",
            ("completion", "completionpassgrade_desc") => "Student must receive a passing grade to complete this activity",
            ("completion", "activitygradenotrequired") => "Grade not required",
            ("completion", "completionexpected") => "Expect completed on",
            ("completion", "unlockcompletion") => "Unlock completion options",
            ("completion", "completedunlocked") => "Completion options unlocked",
            ("completion", "completedunlockedtext") => {
                "When you save changes, completion state for all students will be erased. If you change your mind about this, do not save the form."
            }
            ("completion", "completedwarning") => "Completion options locked",
            ("completion", "completedwarningtext") => {
                "{$a} students have already completed this activity. Changing completion options will erase their completion state and may cause confusion."
            }
            ("completion", "badautocompletion") => {
                "When you select automatic completion, you must also enable at least one requirement (below)."
            }
            ("completion", "todo") => "To do",
            ("completion", "completionmenuitem") => "Completion",
            ("completion", "activitydate:opens") => "Opens:",
            ("completion", "activitydate:closes") => "Closes:",
            ("completion", "activitydate:due") => "Due:",
            ("mod_forum", "grade_rating_name") => "Whole forum (rating)",
            ("mod_forum", "grade_forum_name") => "Whole forum (grading)",
            ("mod_forum", "completionposts") => "Require posts",
            ("mod_forum", "completionpostsgroup") => "Minimum number of posts",
            ("mod_assign", "completionsubmit") => "Make a submission",
            ("mod_quiz", "grade_attempts_name") => "Attempts",
            _ => return None,
        };
        Some(s)
    }
}

impl Localizer for EnglishStrings {
    fn get_string(&self, key: &str, component: &str, arg: Option<&str>) -> String {
        match Self::lookup(key, component) {
            Some(s) => match arg {
                Some(a) => s.replace("{$a}", a),
                None => s.to_string(),
            },
            None => format!("[[{key},{component}]]"),
        }
    }
}

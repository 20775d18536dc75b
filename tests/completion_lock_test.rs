mod common;

use common::{build, catalog_with_items, caps};
use lms_completion::completion::{
    fields, CompletionLockState, EnglishStrings, FormFieldSink, LockNotice, SubmittedData,
};

#[test]
fn test_no_progress_is_never_frozen() {
    let (form, _) = build(&caps("forum", true, true, true), &catalog_with_items("forum", 2), SubmittedData::new());
    for (pressed, set) in [(false, false), (true, false), (false, true), (true, true)] {
        let decision = CompletionLockState::decide(&form, 0, pressed, set, &[]);
        assert!(decision.frozen_fields.is_empty());
        assert_eq!(decision.unlocked_flag, Some(true));
        assert!(!decision.show_unlock_button);
        assert_eq!(decision.notice, None);
    }
}

#[test]
fn test_progress_without_unlock_freezes_present_fields() {
    let (form, layout) = build(&caps("forum", true, true, true), &catalog_with_items("forum", 2), SubmittedData::new());
    let decision = CompletionLockState::decide(&form, 5, false, false, &layout.custom_fields);
    assert!(decision.frozen_fields.contains(fields::COMPLETION));
    assert!(decision.frozen_fields.contains(fields::VIEW));
    assert!(decision.frozen_fields.contains(fields::GRADE_ITEM_NUMBER));
    assert!(decision.frozen_fields.contains(fields::PASS_GRADE));
    assert!(!decision.frozen_fields.contains(fields::USE_GRADE));
    assert!(decision.frozen_fields.contains("completionposts"));
    // Pass grade not checked, so the host's pass grade stays editable.
    assert!(!decision.frozen_fields.contains(fields::GRADE_PASS));
    assert_eq!(decision.notice, Some(LockNotice::Locked { count: 5 }));
    assert!(decision.show_unlock_button);
}

#[test]
fn test_checked_pass_grade_also_freezes_grade_to_pass() {
    let submission = SubmittedData::new().with(fields::PASS_GRADE, "1");
    let (form, _) = build(&caps("quiz", false, true, false), &catalog_with_items("quiz", 1), submission);
    let decision = CompletionLockState::decide(&form, 2, false, false, &[]);
    assert!(decision.frozen_fields.contains(fields::GRADE_PASS));
}

#[test]
fn test_unlock_button_wins_over_unset_flag() {
    let (form, _) = build(&caps("page", true, false, false), &catalog_with_items("page", 0), SubmittedData::new());
    let decision = CompletionLockState::decide(&form, 5, true, false, &[]);
    assert!(decision.frozen_fields.is_empty());
    assert!(decision.unlock_requested);
    assert_eq!(decision.notice, Some(LockNotice::Unlocked));
    assert_eq!(decision.unlocked_flag, Some(true));
}

#[test]
fn test_applied_lock_on_built_form() {
    let submission = SubmittedData::new().with(fields::UNLOCK_BUTTON, "1");
    let (mut form, _) = build(&caps("page", true, false, false), &catalog_with_items("page", 0), submission);
    let lock = CompletionLockState::new(&EnglishStrings);
    let decision = CompletionLockState::decide(&form, 3, true, false, &[]);
    lock.apply(&mut form, &decision).unwrap();

    assert!(form.has_field(fields::UNLOCKED_NOTICE));
    assert!(!form.has_field(fields::UNLOCK_BUTTON));
    assert_eq!(form.effective_value(fields::UNLOCKED), Some("1"));
    assert!(form.fields().iter().all(|f| !f.frozen));
}

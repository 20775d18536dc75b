pub mod activity;
pub mod completion_state;
pub mod course;
pub mod grade_item;
pub mod setting;

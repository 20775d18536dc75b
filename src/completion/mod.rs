//! Activity completion: settings form rules, edit locking, and per-user display.
//!
//! Everything here is synchronous and owns no state across requests. Data
//! the components need from storage comes in through the traits in
//! `collaborators`, prefetched by the caller.

pub mod collaborators;
pub mod configurator;
pub mod display;
pub mod form;
pub mod lock;
pub mod rules;
pub mod settings;
pub mod strings;
pub mod submission;
pub mod types;

pub use collaborators::{CompletionCountSource, GradeItemCatalog, GradeItemMapping, Localizer, ModuleRuleProvider, ProgressSnapshot};
pub use configurator::{CompletionFieldLayout, CompletionRuleConfigurator, GradeCompletionSelection, GradeFieldLayout, PassGradeGate};
pub use display::{ActivityDate, CompletionCondition, CompletionDetails, CompletionDisplayDecision, CompletionDisplaySnapshot, CourseDisplaySettings};
pub use form::{CompletionFieldSet, Dependency, FieldKind, FormError, FormField, FormFieldSink, Operator};
pub use lock::{CompletionLockDecision, CompletionLockState, LockNotice};
pub use settings::CompletionSettings;
pub use strings::EnglishStrings;
pub use submission::{plan_submit, rules_editable, SavePlan, SubmitAction};
pub use types::{fields, ActivityCompletionCapabilities, CompletionTrackingMode, FieldErrors, SubmittedData};

// Config-driven inquiry forms: declarative configuration, validation, the per-instance
// state machine and the built-in presets.
pub mod config;
pub mod presets;
pub mod scroll_lock;
pub mod state;
pub mod validation;

pub use config::{Condition, FieldConfig, InquiryFormConfig, SectionConfig, SelectOption, ValidationRules};
pub use scroll_lock::ScrollLock;
pub use state::{FieldErrors, FormPhase, FormState, InquiryForm, SubmitAttempt, SubmitOutcome};
pub use validation::ValidatorRegistry;

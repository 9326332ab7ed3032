// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod draft;
pub mod notice;
pub mod progress;
pub mod reference;
pub mod submission;
pub mod summary;
pub mod validation;
pub mod views;
pub mod wizard;

// Re-export key types for library consumers
pub use draft::{FieldPath, FieldPathError, FieldUpdate, RegistrationDraft};
pub use notice::{Notice, NoticeKind};
pub use reference::{AddressLookup, ReferenceDataError, ReferenceDataSource};
pub use submission::{RegistrationId, RegistrationPayload, RegistrationSubmitter, SubmissionError};
pub use validation::{SchemaError, ValidationOptions, ValidationReport, Validator};
pub use wizard::{AdvanceOutcome, RegistrationWizard, WizardError, WizardStep};

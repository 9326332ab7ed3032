//! Multi-step registration wizard: steps, per-step field sets and the controller

pub mod controller;
pub mod error;
pub mod registry;
pub mod step;

pub use controller::{AdvanceOutcome, RegistrationWizard, SubmissionStart};
pub use error::{WizardError, WizardResult};
pub use registry::{earliest_step, owning_step, step_fields};
pub use step::WizardStep;

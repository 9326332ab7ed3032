//! Controller misuse errors

use super::step::WizardStep;
use crate::draft::FieldPathError;
use crate::logging::codes;
use crate::validation::SchemaError;
use thiserror::Error;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// The session already completed a successful submission
    #[error("Wizard session {session_id} is closed")]
    SessionClosed { session_id: String },

    /// A submission is in flight; navigation and edits are locked
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Submission is only possible from the summary step
    #[error("Cannot submit from step {step}; submission starts at the summary")]
    NotAtSummary { step: WizardStep },

    /// `finish_submission` without a matching `begin_submission`
    #[error("No submission is in progress")]
    NoPendingSubmission,

    #[error("Index {index} is out of range for {sequence} (length {len})")]
    IndexOutOfRange {
        sequence: &'static str,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    FieldPath(#[from] FieldPathError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl WizardError {
    pub fn session_closed(session_id: &str) -> Self {
        Self::SessionClosed {
            session_id: session_id.to_string(),
        }
    }

    pub fn index_out_of_range(sequence: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            sequence,
            index,
            len,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::SessionClosed { .. } => codes::wizard::SESSION_CLOSED,
            Self::SubmissionInFlight => codes::wizard::SUBMISSION_IN_FLIGHT,
            Self::NotAtSummary { .. } => codes::wizard::NOT_AT_SUMMARY,
            Self::NoPendingSubmission => codes::wizard::NO_PENDING_SUBMISSION,
            Self::IndexOutOfRange { .. } => codes::wizard::INDEX_OUT_OF_RANGE,
            Self::FieldPath(e) => e.error_code(),
            Self::Schema(e) => e.error_code(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::SessionClosed { .. } => "SessionClosed",
            Self::SubmissionInFlight => "SubmissionInFlight",
            Self::NotAtSummary { .. } => "NotAtSummary",
            Self::NoPendingSubmission => "NoPendingSubmission",
            Self::IndexOutOfRange { .. } => "IndexOutOfRange",
            Self::FieldPath(e) => e.error_type(),
            Self::Schema(e) => e.error_type(),
        }
    }

    pub fn severity(&self) -> &'static str {
        match self {
            Self::Schema(_) => "Critical",
            Self::FieldPath(_) | Self::IndexOutOfRange { .. } => "Medium",
            _ => "Low",
        }
    }
}

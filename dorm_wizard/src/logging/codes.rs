//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes the wizard logs, their metadata, and
//! classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Draft validation codes
pub mod validation {
    use super::Code;

    pub const FIELD_INVALID: Code = Code::new("E101");
    pub const STEP_BLOCKED: Code = Code::new("E102");
    pub const FULL_DRAFT_INVALID: Code = Code::new("E103");
    pub const SCHEMA_MALFORMED: Code = Code::new("E110");
}

/// Wizard controller misuse codes
pub mod wizard {
    use super::Code;

    pub const INVALID_FIELD_PATH: Code = Code::new("E120");
    pub const SESSION_CLOSED: Code = Code::new("E121");
    pub const SUBMISSION_IN_FLIGHT: Code = Code::new("E122");
    pub const NOT_AT_SUMMARY: Code = Code::new("E123");
    pub const INDEX_OUT_OF_RANGE: Code = Code::new("E124");
    pub const NO_PENDING_SUBMISSION: Code = Code::new("E125");
}

/// Reference-data collaborator codes
pub mod reference {
    use super::Code;

    pub const FETCH_FAILED: Code = Code::new("E130");
}

/// Submission collaborator codes
pub mod submission {
    use super::Code;

    pub const SUBMISSION_FAILED: Code = Code::new("E140");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const SESSION_STARTED: Code = Code::new("I002");
    pub const STEP_VALIDATED: Code = Code::new("I010");
    pub const STEP_ADVANCED: Code = Code::new("I011");
    pub const CASCADE_APPLIED: Code = Code::new("I012");
    pub const LOOKUP_COMPLETED: Code = Code::new("I013");
    pub const SUBMISSION_ACCEPTED: Code = Code::new("I020");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Internal wizard error",
                "Report wizard system bug",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or configuration initialization failed",
                "Check configuration profile and environment variables",
            ),
            // Validation
            ErrorMetadata::new(
                "E101",
                "Validation",
                Severity::Low,
                true,
                false,
                "A draft field failed its validation rule",
                "Correct the field value and advance again",
            ),
            ErrorMetadata::new(
                "E102",
                "Validation",
                Severity::Low,
                true,
                false,
                "Advance blocked by field errors on the current step",
                "Fix the reported fields before advancing",
            ),
            ErrorMetadata::new(
                "E103",
                "Validation",
                Severity::Medium,
                true,
                false,
                "Draft failed full validation before submission",
                "Return to the reported step and correct the fields",
            ),
            ErrorMetadata::new(
                "E110",
                "Validation",
                Severity::Critical,
                false,
                true,
                "Validation rule references a field the draft does not have",
                "Fix the rule table; this is a programming error",
            ),
            // Wizard
            ErrorMetadata::new(
                "E120",
                "Wizard",
                Severity::Medium,
                true,
                false,
                "Field path does not exist in the draft or value has the wrong type",
                "Check the field path and value passed to update_field",
            ),
            ErrorMetadata::new(
                "E121",
                "Wizard",
                Severity::Medium,
                true,
                false,
                "Wizard session already completed",
                "Start a new wizard session",
            ),
            ErrorMetadata::new(
                "E122",
                "Wizard",
                Severity::Low,
                true,
                false,
                "Submission already in flight",
                "Wait for the pending submission to finish",
            ),
            ErrorMetadata::new(
                "E123",
                "Wizard",
                Severity::Medium,
                true,
                false,
                "Submission requested outside the summary step",
                "Advance through every data-entry step first",
            ),
            ErrorMetadata::new(
                "E124",
                "Wizard",
                Severity::Medium,
                true,
                false,
                "Sequence index out of range",
                "Use an index within the current sequence length",
            ),
            ErrorMetadata::new(
                "E125",
                "Wizard",
                Severity::Medium,
                true,
                false,
                "No submission is pending",
                "Call begin_submission before finish_submission",
            ),
            // Collaborators
            ErrorMetadata::new(
                "E130",
                "ReferenceData",
                Severity::Low,
                true,
                false,
                "Reference-data lookup failed",
                "Retry the lookup; the affected field stays selectable once options load",
            ),
            ErrorMetadata::new(
                "E140",
                "Submission",
                Severity::High,
                true,
                false,
                "Registration submission failed",
                "Review the notice and resubmit; the draft was kept",
            ),
            // Success
            ErrorMetadata::new(
                "I001",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "Continue",
            ),
            ErrorMetadata::new(
                "I002",
                "Wizard",
                Severity::Low,
                true,
                false,
                "Wizard session started",
                "Continue",
            ),
            ErrorMetadata::new(
                "I010",
                "Validation",
                Severity::Low,
                true,
                false,
                "Step fields validated",
                "Continue",
            ),
            ErrorMetadata::new(
                "I011",
                "Wizard",
                Severity::Low,
                true,
                false,
                "Wizard moved to the next step",
                "Continue",
            ),
            ErrorMetadata::new(
                "I012",
                "Wizard",
                Severity::Low,
                true,
                false,
                "Address cascade cleared dependent selections",
                "Refresh dependent option lists",
            ),
            ErrorMetadata::new(
                "I013",
                "ReferenceData",
                Severity::Low,
                true,
                false,
                "Reference-data lookup completed",
                "Continue",
            ),
            ErrorMetadata::new(
                "I020",
                "Submission",
                Severity::Low,
                true,
                false,
                "Registration accepted by the backend",
                "Navigate away from the wizard",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

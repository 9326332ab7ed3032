//! Registration draft validation
//!
//! Rules are plain data (`schema`) evaluated by one generic engine (`engine`).
//! Field failures come back as a `ValidationReport`; only a malformed rule
//! list produces an error.

pub mod engine;
pub mod error;
pub mod report;
pub mod schema;

pub use engine::{validate_scoped, validate_with};
pub use error::{SchemaError, SchemaResult};
pub use report::ValidationReport;
pub use schema::{registration_rules, Check, Condition, FieldRule, PathPattern, ValidationOptions};

use crate::draft::{FieldPath, RegistrationDraft};

/// Validate the whole draft with the standard rule list
pub fn validate(draft: &RegistrationDraft, options: &ValidationOptions) -> SchemaResult<ValidationReport> {
    Validator::new(options)?.validate(draft)
}

/// Standard rule list built once and reused across calls
#[derive(Debug, Clone)]
pub struct Validator {
    options: ValidationOptions,
    rules: Vec<FieldRule>,
}

impl Validator {
    pub fn new(options: &ValidationOptions) -> SchemaResult<Self> {
        Ok(Self {
            options: options.clone(),
            rules: registration_rules(options)?,
        })
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn validate(&self, draft: &RegistrationDraft) -> SchemaResult<ValidationReport> {
        validate_with(draft, &self.rules)
    }

    /// Validate only the given fields and whatever lies beneath them
    pub fn validate_fields(
        &self,
        draft: &RegistrationDraft,
        fields: &[FieldPath],
    ) -> SchemaResult<ValidationReport> {
        if fields.is_empty() {
            return Ok(ValidationReport::new());
        }
        validate_scoped(draft, &self.rules, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft_is_invalid() {
        let draft = RegistrationDraft::new("TR");
        let report = validate(&draft, &ValidationOptions::strict()).unwrap();

        assert!(!report.is_valid());
        assert!(report.contains("guest.name"));
        assert!(report.contains("bedId"));
        assert!(report.contains("products"));
        assert!(report.contains("invoiceTitles"));
    }

    #[test]
    fn test_no_fields_means_nothing_to_check() {
        let validator = Validator::new(&ValidationOptions::strict()).unwrap();
        let report = validator
            .validate_fields(&RegistrationDraft::new("TR"), &[])
            .unwrap();
        assert!(report.is_valid());
    }
}

//! Declarative field rules for the registration draft

use super::error::{SchemaError, SchemaResult};
use crate::config::compile_time::validation as limits;
use crate::config::WizardPreferences;
use crate::draft::FieldPath;
use serde_json::Value;
use std::fmt;

/// One segment of a rule pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Key(String),
    Index(usize),
    /// `*`: every entry of a sequence
    Any,
}

/// Field path pattern such as `invoiceTitles.*.phone`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> SchemaResult<Self> {
        if raw.is_empty() {
            return Err(SchemaError::invalid_pattern(raw, "pattern is empty"));
        }

        let segments = raw
            .split('.')
            .map(|part| match part {
                "" => Err(SchemaError::invalid_pattern(raw, "empty segment")),
                "*" => Ok(PatternSegment::Any),
                _ => Ok(part
                    .parse::<usize>()
                    .map(PatternSegment::Index)
                    .unwrap_or_else(|_| PatternSegment::Key(part.to_string()))),
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Shape check applied to a single value
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Present and, for strings, not blank
    Required,
    MinLength(usize),
    ExactLength(usize),
    /// Empty is fine; anything else must look like an email address
    OptionalEmail,
    MinItems(usize),
    MinNumber(f64),
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Check::Required => "required",
            Check::MinLength(_) => "min_length",
            Check::ExactLength(_) => "exact_length",
            Check::OptionalEmail => "optional_email",
            Check::MinItems(_) => "min_items",
            Check::MinNumber(_) => "min_number",
        }
    }
}

/// When a rule applies
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Always,
    /// Applies unless the boolean at this draft path is `true`
    WhenFalse(FieldPath),
    /// Applies when a field of the same record holds `value`
    WhenSiblingEquals { field: String, value: Value },
}

/// A field pattern, its condition and its ordered checks
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub pattern: PathPattern,
    pub label: String,
    pub condition: Condition,
    pub checks: Vec<Check>,
}

impl FieldRule {
    pub fn new(pattern: &str, label: &str) -> SchemaResult<Self> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            label: label.to_string(),
            condition: Condition::Always,
            checks: Vec::new(),
        })
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

/// Limits and switches the rule list is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    pub min_name_length: usize,
    pub national_id_length: usize,
    pub min_phone_length: usize,
    pub min_product_quantity: i64,
    pub min_products: usize,
    pub min_invoice_titles: usize,
    pub enforce_invoice_title_type: bool,
}

impl ValidationOptions {
    pub fn from_preferences(preferences: &WizardPreferences) -> Self {
        Self {
            enforce_invoice_title_type: preferences.enforce_invoice_title_type,
            ..Self::strict()
        }
    }

    /// Compile-time limits with type-conditional invoice titles
    pub fn strict() -> Self {
        Self {
            min_name_length: limits::MIN_NAME_LENGTH,
            national_id_length: limits::NATIONAL_ID_LENGTH,
            min_phone_length: limits::MIN_PHONE_LENGTH,
            min_product_quantity: limits::MIN_PRODUCT_QUANTITY,
            min_products: limits::MIN_PRODUCTS,
            min_invoice_titles: limits::MIN_INVOICE_TITLES,
            enforce_invoice_title_type: true,
        }
    }

    /// Invoice-title fields are not gated on the title type
    pub fn lenient() -> Self {
        Self {
            enforce_invoice_title_type: false,
            ..Self::strict()
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::from_preferences(&WizardPreferences::default())
    }
}

/// Full rule list for a registration draft
pub fn registration_rules(options: &ValidationOptions) -> SchemaResult<Vec<FieldRule>> {
    let name = |pattern: &str, label: &str| -> SchemaResult<FieldRule> {
        Ok(FieldRule::new(pattern, label)?
            .check(Check::Required)
            .check(Check::MinLength(options.min_name_length)))
    };
    let national_id = |pattern: &str, label: &str| -> SchemaResult<FieldRule> {
        Ok(FieldRule::new(pattern, label)?
            .check(Check::Required)
            .check(Check::ExactLength(options.national_id_length)))
    };
    let phone = |pattern: &str, label: &str| -> SchemaResult<FieldRule> {
        Ok(FieldRule::new(pattern, label)?
            .check(Check::Required)
            .check(Check::MinLength(options.min_phone_length)))
    };
    let required = |pattern: &str, label: &str| -> SchemaResult<FieldRule> {
        Ok(FieldRule::new(pattern, label)?.check(Check::Required))
    };
    let email = |pattern: &str, label: &str| -> SchemaResult<FieldRule> {
        Ok(FieldRule::new(pattern, label)?.check(Check::OptionalEmail))
    };

    let mut rules = vec![
        name("guest.name", "First name")?,
        name("guest.surname", "Last name")?,
        required("guest.gender", "Gender")?,
        national_id("guest.nationalId", "National ID")?,
        phone("guest.phone", "Phone")?,
        email("guest.email", "Email")?,
        required("guest.birthDate", "Birth date")?,
        required("guest.guestType", "Guest type")?,
        required("guest.emergencyContactName", "Emergency contact name")?,
        required("guest.emergencyContactPhone", "Emergency contact phone")?,
        required("isSelfGuardian", "Self-guardian choice")?,
    ];

    let unless_self = Condition::WhenFalse(
        FieldPath::parse("isSelfGuardian")
            .map_err(|e| SchemaError::invalid_pattern("isSelfGuardian", &e.to_string()))?,
    );
    let guardian_rules = vec![
        name("guardian.name", "Guardian first name")?,
        name("guardian.surname", "Guardian last name")?,
        required("guardian.gender", "Guardian gender")?,
        required("guardian.relationship", "Relationship")?,
        national_id("guardian.nationalId", "Guardian national ID")?,
        phone("guardian.phone", "Guardian phone")?,
        email("guardian.email", "Guardian email")?,
        required("guardian.birthDate", "Guardian birth date")?,
    ];
    rules.extend(
        guardian_rules
            .into_iter()
            .map(|rule| rule.when(unless_self.clone())),
    );

    rules.extend([
        required("bedId", "Bed")?,
        required("seasonCode", "Season")?,
        required("checkInDate", "Check-in date")?,
        required("checkOutDate", "Check-out date")?,
        FieldRule::new("products", "Products")?.check(Check::MinItems(options.min_products)),
        FieldRule::new("products.*.quantity", "Quantity")?
            .check(Check::Required)
            .check(Check::MinNumber(options.min_product_quantity as f64)),
        FieldRule::new("products.*.unitPrice", "Unit price")?
            .check(Check::Required)
            .check(Check::MinNumber(0.0)),
        FieldRule::new("invoiceTitles", "Invoice titles")?
            .check(Check::MinItems(options.min_invoice_titles)),
        required("invoiceTitles.*.phone", "Phone")?,
        email("invoiceTitles.*.email", "Email")?,
    ]);

    let individual = [
        ("invoiceTitles.*.firstName", "First name"),
        ("invoiceTitles.*.lastName", "Last name"),
        ("invoiceTitles.*.identityNumber", "Identity number"),
    ];
    let corporate = [
        ("invoiceTitles.*.companyName", "Company name"),
        ("invoiceTitles.*.taxOffice", "Tax office"),
        ("invoiceTitles.*.taxNumber", "Tax number"),
    ];

    if options.enforce_invoice_title_type {
        for (fields, title_type) in [(individual, "individual"), (corporate, "corporate")] {
            for (pattern, label) in fields {
                rules.push(required(pattern, label)?.when(Condition::WhenSiblingEquals {
                    field: "titleType".to_string(),
                    value: Value::String(title_type.to_string()),
                }));
            }
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pattern_parsing() {
        let pattern = PathPattern::parse("invoiceTitles.*.phone").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Key("invoiceTitles".to_string()),
                PatternSegment::Any,
                PatternSegment::Key("phone".to_string()),
            ]
        );
        assert_eq!(pattern.to_string(), "invoiceTitles.*.phone");
    }

    #[test]
    fn test_malformed_patterns() {
        assert_matches!(PathPattern::parse(""), Err(SchemaError::InvalidPattern { .. }));
        assert_matches!(
            PathPattern::parse("guest..name"),
            Err(SchemaError::InvalidPattern { .. })
        );
    }

    #[test]
    fn test_options_follow_compile_time_limits() {
        let options = ValidationOptions::strict();
        assert_eq!(options.min_name_length, limits::MIN_NAME_LENGTH);
        assert_eq!(options.national_id_length, limits::NATIONAL_ID_LENGTH);
        assert!(options.enforce_invoice_title_type);
        assert!(!ValidationOptions::lenient().enforce_invoice_title_type);
    }

    #[test]
    fn test_guardian_rules_are_conditional() {
        let rules = registration_rules(&ValidationOptions::strict()).unwrap();
        let relationship = rules
            .iter()
            .find(|rule| rule.pattern.as_str() == "guardian.relationship")
            .unwrap();
        assert_matches!(relationship.condition, Condition::WhenFalse(_));

        let guest_name = rules
            .iter()
            .find(|rule| rule.pattern.as_str() == "guest.name")
            .unwrap();
        assert_eq!(guest_name.condition, Condition::Always);
        assert_eq!(guest_name.checks[0], Check::Required);
    }

    #[test]
    fn test_lenient_rules_drop_title_type_requirements() {
        let strict = registration_rules(&ValidationOptions::strict()).unwrap();
        let lenient = registration_rules(&ValidationOptions::lenient()).unwrap();

        assert_eq!(strict.len(), lenient.len() + 6);
        assert!(!lenient
            .iter()
            .any(|rule| rule.pattern.as_str() == "invoiceTitles.*.companyName"));
    }
}

//! Generic rule evaluation over the draft's serialized tree

use super::error::{SchemaError, SchemaResult};
use super::report::ValidationReport;
use super::schema::{Check, Condition, FieldRule, PathPattern, PatternSegment};
use crate::draft::{path, FieldPath, PathSegment, RegistrationDraft};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static NULL: Value = Value::Null;

fn email_regex() -> SchemaResult<&'static Regex> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(|e| SchemaError::invalid_pattern(EMAIL_PATTERN, &e.to_string()))
}

/// Evaluate every rule against the draft
pub fn validate_with(draft: &RegistrationDraft, rules: &[FieldRule]) -> SchemaResult<ValidationReport> {
    let tree = to_tree(draft)?;
    validate_tree(&tree, rules, None)
}

/// Evaluate only the concrete paths equal to, or nested under, one of `scope`
pub fn validate_scoped(
    draft: &RegistrationDraft,
    rules: &[FieldRule],
    scope: &[FieldPath],
) -> SchemaResult<ValidationReport> {
    let tree = to_tree(draft)?;
    validate_tree(&tree, rules, Some(scope))
}

fn to_tree(draft: &RegistrationDraft) -> SchemaResult<Value> {
    draft
        .to_tree()
        .map_err(|e| SchemaError::invalid_pattern("<draft>", &e.to_string()))
}

pub fn validate_tree(
    tree: &Value,
    rules: &[FieldRule],
    scope: Option<&[FieldPath]>,
) -> SchemaResult<ValidationReport> {
    let mut report = ValidationReport::new();

    for rule in rules {
        for (concrete, value) in expand(tree, &rule.pattern)? {
            if let Some(scope) = scope {
                if !scope.iter().any(|s| concrete.is_within(s)) {
                    continue;
                }
            }

            if !condition_holds(tree, &concrete, &rule.condition)? {
                continue;
            }

            for check in &rule.checks {
                if let Some(message) = apply_check(&concrete, value, check, &rule.label)? {
                    report.insert(concrete.clone(), message);
                    break;
                }
            }
        }
    }

    Ok(report)
}

/// Concrete paths and values a pattern resolves to in `tree`
fn expand<'a>(tree: &'a Value, pattern: &PathPattern) -> SchemaResult<Vec<(FieldPath, &'a Value)>> {
    let mut found = Vec::new();
    let mut walked = Vec::new();
    expand_into(tree, pattern.segments(), &mut walked, pattern, &mut found)?;

    found
        .into_iter()
        .map(|(segments, value)| {
            FieldPath::from_segments(segments)
                .map(|path| (path, value))
                .map_err(|e| SchemaError::invalid_pattern(pattern.as_str(), &e.to_string()))
        })
        .collect()
}

fn expand_into<'a>(
    node: &'a Value,
    rest: &[PatternSegment],
    walked: &mut Vec<PathSegment>,
    pattern: &PathPattern,
    found: &mut Vec<(Vec<PathSegment>, &'a Value)>,
) -> SchemaResult<()> {
    let Some((head, tail)) = rest.split_first() else {
        found.push((walked.clone(), node));
        return Ok(());
    };

    match (node, head) {
        // An absent record has no entries and reads as null field by field
        (Value::Null, PatternSegment::Any) => Ok(()),
        (Value::Null, PatternSegment::Key(key)) => {
            descend(&NULL, PathSegment::Key(key.clone()), tail, walked, pattern, found)
        }
        (Value::Null, PatternSegment::Index(index)) => {
            descend(&NULL, PathSegment::Index(*index), tail, walked, pattern, found)
        }
        (Value::Object(map), PatternSegment::Key(key)) => match map.get(key) {
            Some(child) => descend(child, PathSegment::Key(key.clone()), tail, walked, pattern, found),
            None => Err(SchemaError::unknown_field(pattern.as_str(), &location(walked), key)),
        },
        (Value::Array(items), PatternSegment::Any) => {
            for (index, item) in items.iter().enumerate() {
                descend(item, PathSegment::Index(index), tail, walked, pattern, found)?;
            }
            Ok(())
        }
        (Value::Array(items), PatternSegment::Index(index)) => match items.get(*index) {
            Some(item) => descend(item, PathSegment::Index(*index), tail, walked, pattern, found),
            None => Ok(()),
        },
        (_, PatternSegment::Any) | (_, PatternSegment::Index(_)) => {
            Err(SchemaError::not_a_sequence(pattern.as_str(), &location(walked)))
        }
        (_, PatternSegment::Key(key)) => {
            Err(SchemaError::unknown_field(pattern.as_str(), &location(walked), key))
        }
    }
}

fn location(walked: &[PathSegment]) -> String {
    walked
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn descend<'a>(
    child: &'a Value,
    segment: PathSegment,
    tail: &[PatternSegment],
    walked: &mut Vec<PathSegment>,
    pattern: &PathPattern,
    found: &mut Vec<(Vec<PathSegment>, &'a Value)>,
) -> SchemaResult<()> {
    walked.push(segment);
    let result = expand_into(child, tail, walked, pattern, found);
    walked.pop();
    result
}

fn condition_holds(tree: &Value, concrete: &FieldPath, condition: &Condition) -> SchemaResult<bool> {
    match condition {
        Condition::Always => Ok(true),
        Condition::WhenFalse(flag) => {
            let value = path::get(tree, flag).map_err(|e| {
                SchemaError::unknown_field(&flag.to_string(), &flag.to_string(), &e.to_string())
            })?;
            Ok(value != Some(&Value::Bool(true)))
        }
        Condition::WhenSiblingEquals { field, value } => {
            let sibling = match concrete.parent() {
                Some(parent) => parent.child(field),
                None => FieldPath::parse(field)
                    .map_err(|e| SchemaError::invalid_pattern(field, &e.to_string()))?,
            };
            let actual = path::get(tree, &sibling).map_err(|_| {
                SchemaError::unknown_field(&concrete.to_string(), &sibling.to_string(), field)
            })?;
            Ok(actual == Some(value))
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// `Some(message)` when the check fails
fn apply_check(
    concrete: &FieldPath,
    value: &Value,
    check: &Check,
    label: &str,
) -> SchemaResult<Option<String>> {
    let wrong_kind = || SchemaError::wrong_kind(&concrete.to_string(), check.name(), kind(value));

    let failed = match check {
        Check::Required => is_blank(value).then(|| format!("{} is required", label)),

        Check::MinLength(min) => match value {
            _ if is_blank(value) => None,
            Value::String(s) => (s.chars().count() < *min)
                .then(|| format!("{} must be at least {} characters", label, min)),
            _ => return Err(wrong_kind()),
        },

        Check::ExactLength(len) => match value {
            _ if is_blank(value) => None,
            Value::String(s) => (s.chars().count() != *len)
                .then(|| format!("{} must be exactly {} characters", label, len)),
            _ => return Err(wrong_kind()),
        },

        Check::OptionalEmail => match value {
            _ if is_blank(value) => None,
            Value::String(s) => (!email_regex()?.is_match(s.trim()))
                .then(|| format!("{} must be a valid email address", label)),
            _ => return Err(wrong_kind()),
        },

        Check::MinItems(min) => {
            let count = match value {
                Value::Null => 0,
                Value::Array(items) => items.len(),
                _ => return Err(wrong_kind()),
            };
            (count < *min).then(|| {
                let noun = if *min == 1 { "entry" } else { "entries" };
                format!("{} must contain at least {} {}", label, min, noun)
            })
        }

        Check::MinNumber(min) => match value {
            Value::Null => None,
            Value::Number(n) => match n.as_f64() {
                Some(n) if n >= *min => None,
                _ => Some(format!("{} must be at least {}", label, min)),
            },
            _ => return Err(wrong_kind()),
        },
    };

    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ProductLine, TitleType};
    use crate::validation::schema::{registration_rules, ValidationOptions};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn rules() -> Vec<FieldRule> {
        registration_rules(&ValidationOptions::strict()).unwrap()
    }

    fn scope(paths: &[&str]) -> Vec<FieldPath> {
        paths.iter().map(|p| FieldPath::parse(p).unwrap()).collect()
    }

    fn valid_guest(draft: &mut RegistrationDraft) {
        draft.guest.name = "Ayse".to_string();
        draft.guest.surname = "Yilmaz".to_string();
        draft.guest.national_id = "12345678901".to_string();
        draft.guest.phone = "5551234567".to_string();
        draft.guest.birth_date = "2004-05-01".to_string();
        draft.guest.emergency_contact_name = "Mehmet Yilmaz".to_string();
        draft.guest.emergency_contact_phone = "5557654321".to_string();
    }

    #[test]
    fn test_empty_guest_reports_required_fields() {
        let draft = RegistrationDraft::new("TR");
        let report = validate_scoped(&draft, &rules(), &scope(&["guest"])).unwrap();

        assert_eq!(report.get("guest.name"), Some("First name is required"));
        assert_eq!(report.get("guest.nationalId"), Some("National ID is required"));
        assert!(!report.contains("guest.email"));
        assert!(!report.contains("guest.gender"));
    }

    #[test]
    fn test_shape_rules() {
        let mut draft = RegistrationDraft::new("TR");
        valid_guest(&mut draft);
        draft.guest.name = "A".to_string();
        draft.guest.national_id = "123".to_string();
        draft.guest.phone = "555".to_string();
        draft.guest.email = Some("not-an-email".to_string());

        let report = validate_scoped(&draft, &rules(), &scope(&["guest"])).unwrap();

        assert_eq!(report.get("guest.name"), Some("First name must be at least 2 characters"));
        assert_eq!(
            report.get("guest.nationalId"),
            Some("National ID must be exactly 11 characters")
        );
        assert_eq!(report.get("guest.phone"), Some("Phone must be at least 10 characters"));
        assert_eq!(report.get("guest.email"), Some("Email must be a valid email address"));
    }

    #[test]
    fn test_valid_email_and_empty_email_pass() {
        let mut draft = RegistrationDraft::new("TR");
        valid_guest(&mut draft);
        draft.guest.email = Some("ayse@example.com".to_string());
        assert!(validate_scoped(&draft, &rules(), &scope(&["guest"])).unwrap().is_valid());

        draft.guest.email = Some(String::new());
        assert!(validate_scoped(&draft, &rules(), &scope(&["guest"])).unwrap().is_valid());
    }

    #[test]
    fn test_guardian_skipped_when_self_guardian() {
        let mut draft = RegistrationDraft::new("TR");
        draft.is_self_guardian = true;

        let report =
            validate_scoped(&draft, &rules(), &scope(&["isSelfGuardian", "guardian"])).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_guardian_required_otherwise() {
        let draft = RegistrationDraft::new("TR");
        let report = validate_scoped(&draft, &rules(), &scope(&["guardian"])).unwrap();

        assert_eq!(report.get("guardian.relationship"), Some("Relationship is required"));
        assert!(report.contains("guardian.gender"));
        assert!(report.contains("guardian.birthDate"));
    }

    #[test]
    fn test_product_lines_checked_per_entry() {
        let mut draft = RegistrationDraft::new("TR");
        draft.products.push(ProductLine::new("rent", 2, 100.0));
        draft.products.push(ProductLine::new("deposit", 0, -5.0));

        let report = validate_scoped(&draft, &rules(), &scope(&["products"])).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.get("products.1.quantity"), Some("Quantity must be at least 1"));
        assert_eq!(report.get("products.1.unitPrice"), Some("Unit price must be at least 0"));
    }

    #[test]
    fn test_empty_sequences_fail_min_items() {
        let draft = RegistrationDraft::new("TR");
        let report =
            validate_scoped(&draft, &rules(), &scope(&["products", "invoiceTitles"])).unwrap();

        assert_eq!(report.get("products"), Some("Products must contain at least 1 entry"));
        assert!(report.contains("invoiceTitles"));
    }

    #[test]
    fn test_invoice_title_type_enforced() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Corporate);
        draft.invoice_titles[0].phone = "5551234567".to_string();

        let report = validate_scoped(&draft, &rules(), &scope(&["invoiceTitles"])).unwrap();
        assert_eq!(
            report.get("invoiceTitles.0.companyName"),
            Some("Company name is required")
        );
        assert!(!report.contains("invoiceTitles.0.firstName"));

        let lenient = registration_rules(&ValidationOptions::lenient()).unwrap();
        let report = validate_scoped(&draft, &lenient, &scope(&["invoiceTitles"])).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_absent_invoice_address_reads_as_null_fields() {
        let mut draft = RegistrationDraft::new("TR");
        draft.add_invoice_title(TitleType::Individual);

        let rule = FieldRule::new("invoiceTitles.*.address.countryId", "Country")
            .unwrap()
            .check(Check::Required);
        let report = validate_with(&draft, &[rule]).unwrap();

        assert_eq!(
            report.get("invoiceTitles.0.address.countryId"),
            Some("Country is required")
        );
    }

    #[test]
    fn test_malformed_rules_are_schema_errors() {
        let draft = RegistrationDraft::new("TR");

        let unknown = FieldRule::new("guest.middleName", "Middle name")
            .unwrap()
            .check(Check::Required);
        assert_matches!(
            validate_with(&draft, &[unknown]),
            Err(SchemaError::UnknownField { .. })
        );

        let not_sequence = FieldRule::new("guest.*", "Guest").unwrap().check(Check::Required);
        assert_matches!(
            validate_with(&draft, &[not_sequence]),
            Err(SchemaError::NotASequence { .. })
        );

        let wrong_kind = FieldRule::new("guest.name", "Name")
            .unwrap()
            .check(Check::MinItems(1));
        assert_matches!(
            validate_with(&draft, &[wrong_kind]),
            Err(SchemaError::WrongKind { check: "min_items", .. })
        );
    }

    #[test]
    fn test_tree_validation_accepts_raw_json() {
        let tree = json!({ "isSelfGuardian": false, "guardian": { "relationship": null } });
        let rule = FieldRule::new("guardian.relationship", "Relationship")
            .unwrap()
            .check(Check::Required)
            .when(Condition::WhenFalse(FieldPath::parse("isSelfGuardian").unwrap()));

        let report = validate_tree(&tree, &[rule], None).unwrap();
        assert!(report.contains("guardian.relationship"));
    }
}

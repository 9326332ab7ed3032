//! Field paths each step must validate before the wizard moves on

use super::step::WizardStep;
use crate::draft::{FieldPath, FieldPathError, RegistrationDraft};
use crate::validation::ValidationReport;

const GUEST_FIELDS: &[&str] = &[
    "guest.name",
    "guest.surname",
    "guest.gender",
    "guest.nationalId",
    "guest.phone",
    "guest.birthDate",
    "guest.guestType",
    "guest.emergencyContactName",
    "guest.emergencyContactPhone",
];

const GUARDIAN_FIELDS: &[&str] = &[
    "guardian.name",
    "guardian.surname",
    "guardian.gender",
    "guardian.relationship",
    "guardian.nationalId",
    "guardian.phone",
    "guardian.birthDate",
];

const ACCOMMODATION_FIELDS: &[&str] = &["bedId", "seasonCode", "checkInDate", "checkOutDate"];

/// Fields `advance()` validates on `step`; guardian fields only when needed
pub fn step_fields(step: WizardStep, draft: &RegistrationDraft) -> Result<Vec<FieldPath>, FieldPathError> {
    let raw: Vec<&str> = match step {
        WizardStep::GuestInfo => GUEST_FIELDS.to_vec(),
        WizardStep::GuardianInfo => {
            let mut fields = vec!["isSelfGuardian"];
            if !draft.is_self_guardian {
                fields.extend_from_slice(GUARDIAN_FIELDS);
            }
            fields
        }
        WizardStep::Accommodation => ACCOMMODATION_FIELDS.to_vec(),
        WizardStep::Pricing => vec!["products"],
        WizardStep::InvoiceInfo => vec!["invoiceTitles"],
        WizardStep::Summary => Vec::new(),
    };

    raw.into_iter().map(FieldPath::parse).collect()
}

/// Step whose view edits the field at `path`
pub fn owning_step(path: &FieldPath) -> Option<WizardStep> {
    match path.root_key()? {
        "guest" => Some(WizardStep::GuestInfo),
        "isSelfGuardian" | "guardian" => Some(WizardStep::GuardianInfo),
        "bedId" | "seasonCode" | "checkInDate" | "checkOutDate" | "depositAmount" | "notes" => {
            Some(WizardStep::Accommodation)
        }
        "products" => Some(WizardStep::Pricing),
        "invoiceTitles" => Some(WizardStep::InvoiceInfo),
        _ => None,
    }
}

/// Earliest step owning one of the report's failures
pub fn earliest_step(report: &ValidationReport) -> Option<WizardStep> {
    report.paths().filter_map(owning_step).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fields: &[FieldPath]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_guest_step_fields() {
        let draft = RegistrationDraft::new("TR");
        let fields = step_fields(WizardStep::GuestInfo, &draft).unwrap();

        assert_eq!(fields.len(), 9);
        assert!(names(&fields).contains(&"guest.emergencyContactPhone".to_string()));
    }

    #[test]
    fn test_guardian_fields_depend_on_self_guardian() {
        let mut draft = RegistrationDraft::new("TR");
        assert_eq!(step_fields(WizardStep::GuardianInfo, &draft).unwrap().len(), 8);

        draft.is_self_guardian = true;
        assert_eq!(
            names(&step_fields(WizardStep::GuardianInfo, &draft).unwrap()),
            vec!["isSelfGuardian".to_string()]
        );
    }

    #[test]
    fn test_summary_has_no_fields() {
        let draft = RegistrationDraft::new("TR");
        assert!(step_fields(WizardStep::Summary, &draft).unwrap().is_empty());
    }

    #[test]
    fn test_owning_step() {
        let path = |raw: &str| FieldPath::parse(raw).unwrap();
        assert_eq!(owning_step(&path("guest.address.countryId")), Some(WizardStep::GuestInfo));
        assert_eq!(owning_step(&path("notes")), Some(WizardStep::Accommodation));
        assert_eq!(owning_step(&path("products.0.quantity")), Some(WizardStep::Pricing));
        assert_eq!(owning_step(&path("unknown")), None);
    }

    #[test]
    fn test_earliest_step() {
        let mut report = ValidationReport::new();
        report.insert(FieldPath::parse("invoiceTitles").unwrap(), "x".to_string());
        report.insert(FieldPath::parse("bedId").unwrap(), "y".to_string());

        assert_eq!(earliest_step(&report), Some(WizardStep::Accommodation));
        assert_eq!(earliest_step(&ValidationReport::new()), None);
    }
}

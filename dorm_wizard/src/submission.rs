//! Submission collaborator contract and the single nested wire payload

use crate::draft::{
    Gender, GuestType, InvoiceTitle, PostalAddress, ProductLine, RegistrationDraft, Relationship,
    TitleType,
};
use crate::logging::codes;
use crate::summary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier the backend assigns to an accepted registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random v4 identifier, for submitters that assign ids locally
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// The backend refused the registration
    #[error("Registration rejected: {reason}")]
    Rejected { reason: String },

    /// The backend could not be reached or timed out
    #[error("Registration service unavailable: {message}")]
    Unavailable { message: String },

    /// The payload could not be produced or written
    #[error("Registration payload could not be encoded: {message}")]
    Encoding { message: String },
}

impl SubmissionError {
    pub fn rejected(reason: &str) -> Self {
        Self::Rejected {
            reason: reason.to_string(),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    pub fn encoding(message: &str) -> Self {
        Self::Encoding {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        codes::submission::SUBMISSION_FAILED
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "Rejected",
            Self::Unavailable { .. } => "Unavailable",
            Self::Encoding { .. } => "Encoding",
        }
    }

    pub fn severity(&self) -> &'static str {
        "High"
    }
}

/// Backend that accepts a completed registration draft
#[async_trait]
pub trait RegistrationSubmitter: Send + Sync {
    async fn submit(&self, draft: &RegistrationDraft) -> Result<RegistrationId, SubmissionError>;
}

/// Request body sent to the registration backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub guest: GuestPayload,
    /// Absent when the guest is their own guardian
    pub guardian: Option<GuardianPayload>,
    pub is_self_guardian: bool,
    pub accommodation: AccommodationPayload,
    pub products: Vec<ProductLinePayload>,
    pub invoice_titles: Vec<InvoiceTitlePayload>,
    pub total_amount: f64,
}

impl RegistrationPayload {
    pub fn from_draft(draft: &RegistrationDraft) -> Self {
        Self {
            guest: GuestPayload::from(draft),
            guardian: (!draft.is_self_guardian).then(|| GuardianPayload::from(draft)),
            is_self_guardian: draft.is_self_guardian,
            accommodation: AccommodationPayload {
                bed_id: draft.bed_id.clone(),
                season_code: draft.season_code.clone(),
                check_in_date: draft.check_in_date.clone(),
                check_out_date: draft.check_out_date.clone(),
                deposit_amount: draft.deposit_amount,
                notes: draft.notes.clone(),
            },
            products: draft.products.iter().map(ProductLinePayload::from).collect(),
            invoice_titles: draft
                .invoice_titles
                .iter()
                .map(InvoiceTitlePayload::from)
                .collect(),
            total_amount: summary::total(&draft.products),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressPayload {
    pub country_id: Option<i64>,
    pub province_id: Option<i64>,
    pub district_id: Option<i64>,
    pub neighborhood: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

impl From<&PostalAddress> for AddressPayload {
    fn from(address: &PostalAddress) -> Self {
        Self {
            country_id: address.country_id,
            province_id: address.province_id,
            district_id: address.district_id,
            neighborhood: address.neighborhood.clone(),
            address_line: address.address_line.clone(),
            postal_code: address.postal_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestPayload {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub nationality: String,
    pub guest_type: GuestType,
    pub school: Option<String>,
    pub department: Option<String>,
    pub student_number: Option<String>,
    pub grade: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: Option<String>,
    pub address: AddressPayload,
}

impl From<&RegistrationDraft> for GuestPayload {
    fn from(draft: &RegistrationDraft) -> Self {
        let guest = &draft.guest;
        Self {
            name: guest.name.clone(),
            surname: guest.surname.clone(),
            gender: guest.gender,
            national_id: guest.national_id.clone(),
            phone: guest.phone.clone(),
            email: non_blank(&guest.email),
            birth_date: guest.birth_date.clone(),
            nationality: guest.nationality.clone(),
            guest_type: guest.guest_type,
            school: non_blank(&guest.school),
            department: non_blank(&guest.department),
            student_number: non_blank(&guest.student_number),
            grade: non_blank(&guest.grade),
            emergency_contact_name: guest.emergency_contact_name.clone(),
            emergency_contact_phone: guest.emergency_contact_phone.clone(),
            emergency_contact_relationship: non_blank(&guest.emergency_contact_relationship),
            address: AddressPayload::from(&guest.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianPayload {
    pub name: String,
    pub surname: String,
    pub gender: Option<Gender>,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: String,
    pub relationship: Option<Relationship>,
    pub occupation: Option<String>,
    pub workplace: Option<String>,
    pub address: AddressPayload,
}

impl From<&RegistrationDraft> for GuardianPayload {
    fn from(draft: &RegistrationDraft) -> Self {
        let guardian = &draft.guardian;
        Self {
            name: guardian.name.clone(),
            surname: guardian.surname.clone(),
            gender: guardian.gender,
            national_id: guardian.national_id.clone(),
            phone: guardian.phone.clone(),
            email: non_blank(&guardian.email),
            birth_date: guardian.birth_date.clone(),
            relationship: guardian.relationship,
            occupation: non_blank(&guardian.occupation),
            workplace: non_blank(&guardian.workplace),
            address: AddressPayload::from(&guardian.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationPayload {
    pub bed_id: String,
    pub season_code: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub deposit_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLinePayload {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl From<&ProductLine> for ProductLinePayload {
    fn from(line: &ProductLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTitlePayload {
    pub title_type: TitleType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub identity_number: Option<String>,
    pub company_name: Option<String>,
    pub tax_office: Option<String>,
    pub tax_number: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub is_default: bool,
    pub address: Option<AddressPayload>,
}

impl From<&InvoiceTitle> for InvoiceTitlePayload {
    fn from(title: &InvoiceTitle) -> Self {
        let text = |value: &str| (!value.trim().is_empty()).then(|| value.to_string());
        Self {
            title_type: title.title_type,
            first_name: text(&title.first_name),
            last_name: text(&title.last_name),
            identity_number: text(&title.identity_number),
            company_name: text(&title.company_name),
            tax_office: text(&title.tax_office),
            tax_number: text(&title.tax_number),
            phone: title.phone.clone(),
            email: non_blank(&title.email),
            is_default: title.is_default,
            address: title.address.as_ref().map(AddressPayload::from),
        }
    }
}

/// Empty optional text is sent as absent
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::new("TR");
        draft.guest.name = "Ayse".to_string();
        draft.guest.email = Some(String::new());
        draft.guardian.name = "Fatma".to_string();
        draft.bed_id = "B-101".to_string();
        draft.products.push(ProductLine::new("rent", 2, 100.0));
        draft.products.push(ProductLine::new("laundry", 1, 50.0));
        draft.add_invoice_title(TitleType::Individual);
        draft.invoice_titles[0].first_name = "Ayse".to_string();
        draft
    }

    #[test]
    fn test_payload_nests_every_section() {
        let payload = RegistrationPayload::from_draft(&draft());

        assert_eq!(payload.guest.name, "Ayse");
        assert_eq!(payload.guest.email, None);
        assert_eq!(payload.guardian.as_ref().map(|g| g.name.as_str()), Some("Fatma"));
        assert_eq!(payload.accommodation.bed_id, "B-101");
        assert_eq!(payload.products[0].line_total, 200.0);
        assert_eq!(payload.total_amount, 250.0);
        assert_eq!(payload.invoice_titles[0].first_name.as_deref(), Some("Ayse"));
        assert_eq!(payload.invoice_titles[0].company_name, None);
        assert!(payload.invoice_titles[0].is_default);
    }

    #[test]
    fn test_guardian_absent_for_self_guardian() {
        let mut draft = draft();
        draft.is_self_guardian = true;

        let payload = RegistrationPayload::from_draft(&draft);
        assert!(payload.guardian.is_none());
        assert!(payload.is_self_guardian);
    }

    #[test]
    fn test_payload_wire_names_are_snake_case() {
        let json = serde_json::to_value(RegistrationPayload::from_draft(&draft())).unwrap();

        assert_eq!(json["guest"]["national_id"], "");
        assert_eq!(json["guest"]["gender"], "MALE");
        assert_eq!(json["accommodation"]["bed_id"], "B-101");
        assert_eq!(json["invoice_titles"][0]["title_type"], "individual");
        assert_eq!(json["products"][1]["unit_price"], 50.0);
    }

    #[test]
    fn test_registration_id() {
        let id = RegistrationId::new("REG-1");
        assert_eq!(id.to_string(), "REG-1");
        assert_ne!(RegistrationId::generate(), RegistrationId::generate());
    }
}

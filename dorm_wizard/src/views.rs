//! Slices of the draft each step view binds to
//!
//! Rendering belongs to the host. A view reads its slice and reports edits
//! back through `RegistrationWizard::update_field`; the summary slice is
//! read-only.

use crate::draft::{GuardianInfo, GuestInfo, InvoiceTitle, ProductLine, RegistrationDraft};
use crate::summary;
use crate::wizard::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccommodationTerms<'a> {
    pub bed_id: &'a str,
    pub season_code: &'a str,
    pub check_in_date: &'a str,
    pub check_out_date: &'a str,
    pub deposit_amount: Option<f64>,
    pub notes: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepSlice<'a> {
    Guest(&'a GuestInfo),
    Guardian {
        is_self_guardian: bool,
        guardian: &'a GuardianInfo,
    },
    Accommodation(AccommodationTerms<'a>),
    Pricing {
        products: &'a [ProductLine],
        total: f64,
    },
    InvoiceInfo(&'a [InvoiceTitle]),
    Summary(&'a RegistrationDraft),
}

impl<'a> StepSlice<'a> {
    pub fn for_step(step: WizardStep, draft: &'a RegistrationDraft) -> Self {
        match step {
            WizardStep::GuestInfo => StepSlice::Guest(&draft.guest),
            WizardStep::GuardianInfo => StepSlice::Guardian {
                is_self_guardian: draft.is_self_guardian,
                guardian: &draft.guardian,
            },
            WizardStep::Accommodation => StepSlice::Accommodation(AccommodationTerms {
                bed_id: &draft.bed_id,
                season_code: &draft.season_code,
                check_in_date: &draft.check_in_date,
                check_out_date: &draft.check_out_date,
                deposit_amount: draft.deposit_amount,
                notes: draft.notes.as_deref(),
            }),
            WizardStep::Pricing => StepSlice::Pricing {
                products: &draft.products,
                total: summary::total(&draft.products),
            },
            WizardStep::InvoiceInfo => StepSlice::InvoiceInfo(&draft.invoice_titles),
            WizardStep::Summary => StepSlice::Summary(draft),
        }
    }

    pub fn step(&self) -> WizardStep {
        match self {
            StepSlice::Guest(_) => WizardStep::GuestInfo,
            StepSlice::Guardian { .. } => WizardStep::GuardianInfo,
            StepSlice::Accommodation(_) => WizardStep::Accommodation,
            StepSlice::Pricing { .. } => WizardStep::Pricing,
            StepSlice::InvoiceInfo(_) => WizardStep::InvoiceInfo,
            StepSlice::Summary(_) => WizardStep::Summary,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, StepSlice::Summary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_slice_follows_step() {
        let mut draft = RegistrationDraft::new("TR");
        draft.products.push(ProductLine::new("rent", 2, 100.0));
        draft.is_self_guardian = true;

        for step in WizardStep::ALL {
            assert_eq!(StepSlice::for_step(step, &draft).step(), step);
        }

        assert_matches!(
            StepSlice::for_step(WizardStep::GuardianInfo, &draft),
            StepSlice::Guardian { is_self_guardian: true, .. }
        );
        assert_matches!(
            StepSlice::for_step(WizardStep::Pricing, &draft),
            StepSlice::Pricing { total, .. } if total == 200.0
        );
        assert!(StepSlice::for_step(WizardStep::Summary, &draft).is_read_only());
    }
}

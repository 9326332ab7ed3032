//! The six ordered wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    GuestInfo,
    GuardianInfo,
    Accommodation,
    Pricing,
    InvoiceInfo,
    /// Read-only review; advancing from here submits
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::GuestInfo,
        WizardStep::GuardianInfo,
        WizardStep::Accommodation,
        WizardStep::Pricing,
        WizardStep::InvoiceInfo,
        WizardStep::Summary,
    ];

    pub const FIRST: WizardStep = WizardStep::GuestInfo;
    pub const LAST: WizardStep = WizardStep::Summary;

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_summary(&self) -> bool {
        *self == WizardStep::Summary
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::GuestInfo => "Guest information",
            WizardStep::GuardianInfo => "Guardian information",
            WizardStep::Accommodation => "Accommodation",
            WizardStep::Pricing => "Pricing",
            WizardStep::InvoiceInfo => "Invoice information",
            WizardStep::Summary => "Summary",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::GuestInfo => "GuestInfo",
            WizardStep::GuardianInfo => "GuardianInfo",
            WizardStep::Accommodation => "Accommodation",
            WizardStep::Pricing => "Pricing",
            WizardStep::InvoiceInfo => "InvoiceInfo",
            WizardStep::Summary => "Summary",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_indices() {
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(WizardStep::from_index(i), Some(*step));
        }
        assert_eq!(WizardStep::from_index(6), None);
    }

    #[test]
    fn test_navigation_bounds() {
        assert_eq!(WizardStep::FIRST.previous(), None);
        assert_eq!(WizardStep::LAST.next(), None);
        assert_eq!(
            WizardStep::Pricing.next(),
            Some(WizardStep::InvoiceInfo)
        );
        assert_eq!(
            WizardStep::GuardianInfo.previous(),
            Some(WizardStep::GuestInfo)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(WizardStep::GuardianInfo.to_string(), "GuardianInfo");
        assert_eq!(WizardStep::InvoiceInfo.title(), "Invoice information");
    }
}

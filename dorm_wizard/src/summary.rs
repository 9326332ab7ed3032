//! Read-only review of a completed draft

use crate::draft::{ProductLine, RegistrationDraft};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Sum of `quantity * unitPrice` over every product line
pub fn total(products: &[ProductLine]) -> f64 {
    products.iter().map(ProductLine::line_total).sum()
}

/// Disclosure panel of the summary view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SummarySection {
    Guest,
    Guardian,
    Accommodation,
    Pricing,
    InvoiceTitles,
}

impl SummarySection {
    pub const ALL: [SummarySection; 5] = [
        SummarySection::Guest,
        SummarySection::Guardian,
        SummarySection::Accommodation,
        SummarySection::Pricing,
        SummarySection::InvoiceTitles,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SummarySection::Guest => "Guest",
            SummarySection::Guardian => "Guardian",
            SummarySection::Accommodation => "Accommodation",
            SummarySection::Pricing => "Pricing",
            SummarySection::InvoiceTitles => "Invoice titles",
        }
    }
}

impl fmt::Display for SummarySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPanel {
    pub section: SummarySection,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub product_id: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub panels: Vec<SummaryPanel>,
    pub line_items: Vec<LineItem>,
    pub total: f64,
}

impl Summary {
    pub fn from_draft(draft: &RegistrationDraft) -> Self {
        let guest = &draft.guest;
        let mut panels = vec![SummaryPanel {
            section: SummarySection::Guest,
            rows: vec![
                row("Name", guest.full_name()),
                row("National ID", &guest.national_id),
                row("Gender", guest.gender),
                row("Birth date", &guest.birth_date),
                row("Phone", &guest.phone),
                row("Email", guest.email.as_deref().unwrap_or("-")),
                row("Nationality", &guest.nationality),
                row("Guest type", guest.guest_type),
                row(
                    "Emergency contact",
                    format!("{} ({})", guest.emergency_contact_name, guest.emergency_contact_phone),
                ),
            ],
        }];

        let guardian_rows = if draft.is_self_guardian {
            vec![row("Guardian", "Guest is their own guardian")]
        } else {
            let guardian = &draft.guardian;
            vec![
                row("Name", guardian.full_name()),
                row(
                    "Relationship",
                    guardian
                        .relationship
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                row("National ID", &guardian.national_id),
                row("Phone", &guardian.phone),
            ]
        };
        panels.push(SummaryPanel {
            section: SummarySection::Guardian,
            rows: guardian_rows,
        });

        let mut accommodation = vec![
            row("Bed", &draft.bed_id),
            row("Season", &draft.season_code),
            row("Check-in", &draft.check_in_date),
            row("Check-out", &draft.check_out_date),
        ];
        if let Some(deposit) = draft.deposit_amount {
            accommodation.push(row("Deposit", format!("{:.2}", deposit)));
        }
        if let Some(notes) = draft.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            accommodation.push(row("Notes", notes));
        }
        panels.push(SummaryPanel {
            section: SummarySection::Accommodation,
            rows: accommodation,
        });

        let line_items: Vec<LineItem> = draft
            .products
            .iter()
            .map(|line| LineItem {
                product_id: line.product_id.clone(),
                description: line
                    .product_name
                    .clone()
                    .unwrap_or_else(|| line.product_id.clone()),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total(),
            })
            .collect();
        let total = total(&draft.products);

        panels.push(SummaryPanel {
            section: SummarySection::Pricing,
            rows: line_items
                .iter()
                .map(|item| {
                    row(
                        &item.description,
                        format!("{} x {:.2} = {:.2}", item.quantity, item.unit_price, item.line_total),
                    )
                })
                .chain(std::iter::once(row("Total", format!("{:.2}", total))))
                .collect(),
        });

        panels.push(SummaryPanel {
            section: SummarySection::InvoiceTitles,
            rows: draft
                .invoice_titles
                .iter()
                .map(|title| {
                    let marker = if title.is_default { " (default)" } else { "" };
                    row(&title.title_type.to_string(), format!("{}{}", title.display_name(), marker))
                })
                .collect(),
        });

        Self {
            panels,
            line_items,
            total,
        }
    }

    pub fn panel(&self, section: SummarySection) -> Option<&SummaryPanel> {
        self.panels.iter().find(|panel| panel.section == section)
    }
}

fn row(label: &str, value: impl fmt::Display) -> SummaryRow {
    SummaryRow {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// Which summary panels are expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureState {
    expanded: BTreeSet<SummarySection>,
}

impl DisclosureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, section: SummarySection) -> bool {
        self.expanded.contains(&section)
    }

    /// Flip one panel; returns whether it is now expanded
    pub fn toggle(&mut self, section: SummarySection) -> bool {
        if !self.expanded.remove(&section) {
            self.expanded.insert(section);
            return true;
        }
        false
    }

    pub fn expand_all(&mut self) {
        self.expanded.extend(SummarySection::ALL);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::TitleType;

    #[test]
    fn test_total_is_exact_sum() {
        let products = vec![
            ProductLine::new("rent", 2, 100.0),
            ProductLine::new("laundry", 1, 50.0),
        ];
        assert_eq!(total(&products), 250.0);
        assert_eq!(total(&[]), 0.0);
    }

    #[test]
    fn test_summary_sections() {
        let mut draft = RegistrationDraft::new("TR");
        draft.guest.name = "Ayse".to_string();
        draft.guest.surname = "Yilmaz".to_string();
        draft.is_self_guardian = true;
        draft.products.push(ProductLine::new("rent", 1, 1000.0));
        draft.add_invoice_title(TitleType::Individual);
        draft.invoice_titles[0].first_name = "Ayse".to_string();

        let summary = Summary::from_draft(&draft);

        assert_eq!(summary.panels.len(), 5);
        assert_eq!(summary.total, 1000.0);
        assert_eq!(summary.line_items[0].description, "rent");

        let guest = summary.panel(SummarySection::Guest).unwrap();
        assert_eq!(guest.rows[0].value, "Ayse Yilmaz");

        let guardian = summary.panel(SummarySection::Guardian).unwrap();
        assert_eq!(guardian.rows.len(), 1);

        let titles = summary.panel(SummarySection::InvoiceTitles).unwrap();
        assert_eq!(titles.rows[0].value, "Ayse (default)");

        let pricing = summary.panel(SummarySection::Pricing).unwrap();
        assert_eq!(pricing.rows.last().unwrap().value, "1000.00");
    }

    #[test]
    fn test_disclosure_state() {
        let mut state = DisclosureState::new();
        assert!(!state.is_expanded(SummarySection::Pricing));

        assert!(state.toggle(SummarySection::Pricing));
        assert!(state.is_expanded(SummarySection::Pricing));
        assert!(!state.toggle(SummarySection::Pricing));

        state.expand_all();
        assert!(SummarySection::ALL.iter().all(|s| state.is_expanded(*s)));
        state.collapse_all();
        assert!(!state.is_expanded(SummarySection::Guest));
    }
}

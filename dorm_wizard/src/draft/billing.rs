//! Product lines and invoice titles

use super::address::PostalAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductLine {
    pub product_id: String,
    /// Display name resolved by the pricing view; not validated
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
}

impl ProductLine {
    pub fn new(product_id: &str, quantity: i64, unit_price: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            product_name: None,
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl Default for ProductLine {
    fn default() -> Self {
        Self::new("", 1, 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    #[default]
    Individual,
    Corporate,
}

impl TitleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleType::Individual => "individual",
            TitleType::Corporate => "corporate",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing identity attached to a registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceTitle {
    pub title_type: TitleType,

    // Individual
    pub first_name: String,
    pub last_name: String,
    pub identity_number: String,

    // Corporate
    pub company_name: String,
    pub tax_office: String,
    pub tax_number: String,

    pub phone: String,
    pub email: Option<String>,
    pub is_default: bool,
    pub address: Option<PostalAddress>,
}

impl InvoiceTitle {
    pub fn new(title_type: TitleType) -> Self {
        Self {
            title_type,
            ..Default::default()
        }
    }

    /// Name printed on the invoice
    pub fn display_name(&self) -> String {
        match self.title_type {
            TitleType::Individual => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
            TitleType::Corporate => self.company_name.clone(),
        }
    }
}

//! Postal address sub-record and the country → province → district cascade

use super::path::FieldPath;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostalAddress {
    pub country_id: Option<i64>,
    pub province_id: Option<i64>,
    pub district_id: Option<i64>,
    pub neighborhood: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

impl PostalAddress {
    /// Select a country; a different country clears province and district
    pub fn select_country(&mut self, country_id: Option<i64>) -> bool {
        if self.country_id == country_id {
            return false;
        }
        self.country_id = country_id;
        self.province_id = None;
        self.district_id = None;
        true
    }

    /// Select a province; a different province clears the district
    pub fn select_province(&mut self, province_id: Option<i64>) -> bool {
        if self.province_id == province_id {
            return false;
        }
        self.province_id = province_id;
        self.district_id = None;
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Address level whose change triggers a cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLevel {
    Country,
    Province,
}

impl AddressLevel {
    pub const COUNTRY_KEY: &'static str = "countryId";
    pub const PROVINCE_KEY: &'static str = "provinceId";
    pub const DISTRICT_KEY: &'static str = "districtId";

    /// Recognise a cascade trigger from the changed field's key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            Self::COUNTRY_KEY => Some(Self::Country),
            Self::PROVINCE_KEY => Some(Self::Province),
            _ => None,
        }
    }

    /// Keys cleared when this level changes
    pub fn dependent_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Country => &[Self::PROVINCE_KEY, Self::DISTRICT_KEY],
            Self::Province => &[Self::DISTRICT_KEY],
        }
    }
}

/// Dependent selections cleared after a country or province change
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCascade {
    /// Path of the address record that changed
    pub address: FieldPath,
    pub trigger: AddressLevel,
    /// New selection at the trigger level
    pub selected: Option<i64>,
    pub cleared: Vec<FieldPath>,
}

impl AddressCascade {
    /// Option list the host has to refresh for this address
    pub fn lookup_request(&self) -> LookupRequest {
        match self.trigger {
            AddressLevel::Country => LookupRequest::Provinces(self.selected),
            AddressLevel::Province => LookupRequest::Districts(self.selected),
        }
    }
}

/// Reference-data refresh following a cascade; `None` empties the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRequest {
    Provinces(Option<i64>),
    Districts(Option<i64>),
}

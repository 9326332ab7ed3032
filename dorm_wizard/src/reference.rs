//! Country, province and district reference data for address fields

use crate::draft::LookupRequest;
use crate::logging::codes;
use crate::notice::Notice;
use crate::{log_debug, log_error, log_success};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceDataError {
    #[error("Could not load {resource}: {message}")]
    Unavailable { resource: String, message: String },

    #[error("No {resource} with id {id}")]
    NotFound { resource: String, id: i64 },
}

impl ReferenceDataError {
    pub fn unavailable(resource: &str, message: &str) -> Self {
        Self::Unavailable {
            resource: resource.to_string(),
            message: message.to_string(),
        }
    }

    pub fn not_found(resource: &str, id: i64) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        codes::reference::FETCH_FAILED
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "Unavailable",
            Self::NotFound { .. } => "NotFound",
        }
    }

    pub fn severity(&self) -> &'static str {
        "Low"
    }
}

/// Source of address option lists; empty lists are valid answers
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError>;

    async fn provinces(&self, country_id: i64) -> Result<Vec<Province>, ReferenceDataError>;

    async fn districts(&self, province_id: i64) -> Result<Vec<District>, ReferenceDataError>;
}

/// Option lists bound to one address record.
///
/// Failed fetches leave the affected list empty and come back as a notice.
/// A fetch is not cancelled when the selection changes again before it
/// resolves; the last response applied wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressLookup {
    countries: Vec<Country>,
    provinces: Vec<Province>,
    districts: Vec<District>,
}

impl AddressLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub async fn load_countries<S>(&mut self, source: &S) -> Option<Notice>
    where
        S: ReferenceDataSource + ?Sized,
    {
        match source.countries().await {
            Ok(countries) => {
                log_success!(
                    codes::success::LOOKUP_COMPLETED,
                    "Countries loaded",
                    "count" => countries.len()
                );
                self.countries = countries;
                None
            }
            Err(e) => {
                self.countries.clear();
                Some(Self::failure(&e))
            }
        }
    }

    /// Refresh the list a cascade asked for
    pub async fn apply<S>(&mut self, source: &S, request: LookupRequest) -> Option<Notice>
    where
        S: ReferenceDataSource + ?Sized,
    {
        match request {
            LookupRequest::Provinces(country) => {
                self.provinces.clear();
                self.districts.clear();

                let country_id = country?;
                match source.provinces(country_id).await {
                    Ok(provinces) => {
                        log_success!(
                            codes::success::LOOKUP_COMPLETED,
                            "Provinces loaded",
                            "country_id" => country_id,
                            "count" => provinces.len()
                        );
                        self.provinces = provinces;
                        None
                    }
                    Err(e) => Some(Self::failure(&e)),
                }
            }
            LookupRequest::Districts(province) => {
                self.districts.clear();

                let province_id = province?;
                match source.districts(province_id).await {
                    Ok(districts) => {
                        log_success!(
                            codes::success::LOOKUP_COMPLETED,
                            "Districts loaded",
                            "province_id" => province_id,
                            "count" => districts.len()
                        );
                        self.districts = districts;
                        None
                    }
                    Err(e) => Some(Self::failure(&e)),
                }
            }
        }
    }

    fn failure(error: &ReferenceDataError) -> Notice {
        log_error!(
            error.error_code(),
            "Reference data fetch failed",
            "error_type" => error.error_type(),
            "error" => error
        );
        log_debug!("Option list left empty after failed fetch");
        Notice::reference_data(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSource {
        fail_provinces: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReferenceDataSource for FakeSource {
        async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Country {
                id: 90,
                code: "TR".to_string(),
                name: "Turkey".to_string(),
            }])
        }

        async fn provinces(&self, country_id: i64) -> Result<Vec<Province>, ReferenceDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_provinces {
                return Err(ReferenceDataError::unavailable("provinces", "timeout"));
            }
            if country_id != 90 {
                return Ok(Vec::new());
            }
            Ok(vec![Province {
                id: 34,
                name: "Istanbul".to_string(),
            }])
        }

        async fn districts(&self, _province_id: i64) -> Result<Vec<District>, ReferenceDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![District {
                id: 1,
                name: "Kadikoy".to_string(),
            }])
        }
    }

    #[test]
    fn test_country_change_refreshes_provinces_and_clears_districts() {
        let source = FakeSource::default();
        let mut lookup = AddressLookup::new();

        block_on(lookup.apply(&source, LookupRequest::Provinces(Some(90))));
        block_on(lookup.apply(&source, LookupRequest::Districts(Some(34))));
        assert_eq!(lookup.districts().len(), 1);

        let notice = block_on(lookup.apply(&source, LookupRequest::Provinces(Some(90))));
        assert!(notice.is_none());
        assert_eq!(lookup.provinces()[0].name, "Istanbul");
        assert!(lookup.districts().is_empty());
    }

    #[test]
    fn test_empty_result_is_tolerated() {
        let source = FakeSource::default();
        let mut lookup = AddressLookup::new();

        let notice = block_on(lookup.apply(&source, LookupRequest::Provinces(Some(1))));
        assert!(notice.is_none());
        assert!(lookup.provinces().is_empty());
    }

    #[test]
    fn test_failure_becomes_notice() {
        let source = FakeSource {
            fail_provinces: true,
            ..Default::default()
        };
        let mut lookup = AddressLookup::new();

        let notice = block_on(lookup.apply(&source, LookupRequest::Provinces(Some(90)))).unwrap();
        assert_eq!(notice.kind, NoticeKind::ReferenceData);
        assert!(notice.message.contains("provinces"));
        assert!(lookup.provinces().is_empty());
    }

    #[test]
    fn test_cleared_selection_skips_fetch() {
        let source = FakeSource::default();
        let mut lookup = AddressLookup::new();

        block_on(lookup.apply(&source, LookupRequest::Districts(None)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_countries() {
        let source = FakeSource::default();
        let mut lookup = AddressLookup::new();

        assert!(block_on(lookup.load_countries(&source)).is_none());
        assert_eq!(lookup.countries()[0].code, "TR");
    }
}

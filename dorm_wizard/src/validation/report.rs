//! Per-field validation outcome

use crate::draft::FieldPath;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping from concrete field path to the message of its first failing check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<FieldPath, String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; an earlier failure for the same path wins
    pub fn insert(&mut self, path: FieldPath, message: String) {
        self.errors.entry(path).or_insert(message);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a dotted path such as `guardian.relationship`
    pub fn get(&self, path: &str) -> Option<&str> {
        let path = FieldPath::parse(path).ok()?;
        self.errors.get(&path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.errors.iter().map(|(path, message)| (path, message.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.errors.keys()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for (path, message) in other.errors {
            self.insert(path, message);
        }
    }
}

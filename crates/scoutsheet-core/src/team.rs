//! Per-team raw value stores.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::columns::normalize_column_key;

/// Read-only view of one team's answers, keyed by column key.
///
/// A missing key and an empty string both mean "not answered"; neither is an
/// error at this level.
pub trait TeamValues {
    fn get(&self, key: &str) -> Option<&str>;

    /// Look up a data key as written, then under its normalized column key.
    fn answer(&self, key: &str) -> &str {
        match self.get(key) {
            Some(value) => value,
            None => self.get(&normalize_column_key(key)).unwrap_or_default(),
        }
    }
}

impl TeamValues for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl TeamValues for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// One team's scouting record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team number (or other identifier) taken from the record.
    pub number: String,
    /// Raw answers keyed by column key.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl TeamRecord {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl TeamValues for TeamRecord {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

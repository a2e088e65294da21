//! Query string codec.
//!
//! # Design Decisions
//! - `application/x-www-form-urlencoded` rules via `url::form_urlencoded`
//!   (`+` is a space, keys and values are percent-decoded)
//! - Duplicate keys: the last occurrence wins
//! - Backed by a `BTreeMap` so serialization order is stable

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Key-unique query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryMap(BTreeMap<String, String>);

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without a leading `?`.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut map = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            map.insert(key.into_owned(), value.into_owned());
        }
        Self(map)
    }

    /// Canonical query string (no leading `?`).
    pub fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&str> for QueryMap {
    fn from(search: &str) -> Self {
        Self::parse(search)
    }
}

impl From<String> for QueryMap {
    fn from(search: String) -> Self {
        Self::parse(&search)
    }
}

impl From<BTreeMap<String, String>> for QueryMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

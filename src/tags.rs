//! The tag set: the key/value description of one map feature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidTags;

/// An immutable-by-contract set of key/value tags describing one feature.
///
/// Keys are unique; the engine never mutates a caller's tag set. Build one
/// from pairs, or from raw JSON via [`TagSet::from_value`] when the input
/// comes straight off the wire and may be malformed.
///
/// # Example
///
/// ```
/// use iconmap::TagSet;
///
/// let tags = TagSet::new()
///     .with("highway", "bus_stop")
///     .with("shelter", "yes");
/// assert_eq!(tags.get("shelter"), Some("yes"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: BTreeMap<String, String>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this tag set with one more tag, replacing any existing
    /// value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a tag in place, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Builds a tag set from a raw JSON document.
    ///
    /// This is the boundary where malformed input is rejected: the
    /// document must be an object whose values are all strings. Matching
    /// itself never sees an invalid tag set.
    pub fn from_value(value: &Value) -> Result<Self, InvalidTags> {
        let object = value.as_object().ok_or(InvalidTags::NotAnObject)?;
        let mut tags = BTreeMap::new();
        for (key, value) in object {
            let value = value.as_str().ok_or_else(|| InvalidTags::NonStringValue {
                key: key.clone(),
            })?;
            tags.insert(key.clone(), value.to_string());
        }
        Ok(Self { tags })
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Iterates the tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

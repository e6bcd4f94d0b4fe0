//! Tag predicates: the matching half of a rule.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tags::TagSet;

/// A condition on one tag value.
///
/// In the scheme document this is a plain string (exact value), the
/// string `"*"` (any value, key must be present), or an array of strings
/// (any one of the listed values).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueMatcher {
    /// The tag value must equal this string exactly. Case-sensitive, no
    /// normalization.
    Literal(String),
    /// The tag value must be one of these strings.
    AnyOf(Vec<String>),
    /// Any value is accepted; only the key's presence is required.
    Wildcard,
}

impl ValueMatcher {
    /// Creates a literal condition.
    pub fn literal(value: impl Into<String>) -> Self {
        ValueMatcher::Literal(value.into())
    }

    /// Creates an alternatives condition.
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueMatcher::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Tests a tag value against this condition.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValueMatcher::Literal(expected) => value == expected,
            ValueMatcher::AnyOf(alternatives) => alternatives.iter().any(|a| a == value),
            ValueMatcher::Wildcard => true,
        }
    }
}

impl Serialize for ValueMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValueMatcher::Literal(value) => serializer.serialize_str(value),
            ValueMatcher::AnyOf(values) => values.serialize(serializer),
            ValueMatcher::Wildcard => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for ValueMatcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(value) if value == "*" => ValueMatcher::Wildcard,
            Repr::One(value) => ValueMatcher::Literal(value),
            Repr::Many(values) => ValueMatcher::AnyOf(values),
        })
    }
}

/// The predicate of a rule: required tags plus optional forbidden tags.
///
/// A tag set satisfies the matcher when every required condition holds
/// and no forbidden condition does. There is no partial credit: a rule
/// either fully matches or is skipped.
///
/// # Example
///
/// ```
/// use iconmap::{TagMatcher, TagSet};
///
/// let matcher = TagMatcher::tag("highway", "crossing")
///     .with_any_of("crossing", ["zebra", "marked"])
///     .without_tag("crossing_ref", "toucan");
///
/// let tags = TagSet::new()
///     .with("highway", "crossing")
///     .with("crossing", "zebra");
/// assert!(matcher.matches(&tags));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMatcher {
    required: BTreeMap<String, ValueMatcher>,
    forbidden: BTreeMap<String, ValueMatcher>,
}

impl TagMatcher {
    /// Creates an empty matcher.
    ///
    /// An empty matcher is accepted here but rejected when a scheme is
    /// loaded: a rule must require at least one tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher requiring one exact tag.
    pub fn tag(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with_tag(key, value)
    }

    /// Creates a matcher requiring a key with any value.
    pub fn key_present(key: impl Into<String>) -> Self {
        Self::new().with_key_present(key)
    }

    /// Requires one more exact tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.required.insert(key.into(), ValueMatcher::literal(value));
        self
    }

    /// Requires a key whose value is any of the alternatives.
    pub fn with_any_of<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.insert(key.into(), ValueMatcher::any_of(values));
        self
    }

    /// Requires a key to be present with any value.
    pub fn with_key_present(mut self, key: impl Into<String>) -> Self {
        self.required.insert(key.into(), ValueMatcher::Wildcard);
        self
    }

    /// Excludes tag sets carrying this exact tag.
    pub fn without_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.forbidden.insert(key.into(), ValueMatcher::literal(value));
        self
    }

    /// Excludes tag sets whose value for the key is any of the
    /// alternatives.
    pub fn without_any_of<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forbidden.insert(key.into(), ValueMatcher::any_of(values));
        self
    }

    /// Excludes tag sets where the key is present at all.
    pub fn without_key(mut self, key: impl Into<String>) -> Self {
        self.forbidden.insert(key.into(), ValueMatcher::Wildcard);
        self
    }

    pub(crate) fn from_maps(
        required: BTreeMap<String, ValueMatcher>,
        forbidden: BTreeMap<String, ValueMatcher>,
    ) -> Self {
        Self { required, forbidden }
    }

    /// Returns the required conditions, keyed by tag key.
    pub fn required(&self) -> &BTreeMap<String, ValueMatcher> {
        &self.required
    }

    /// Returns the forbidden conditions, keyed by tag key.
    pub fn forbidden(&self) -> &BTreeMap<String, ValueMatcher> {
        &self.forbidden
    }

    /// Returns true if no tags are required.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Tests whether a tag set satisfies this matcher.
    pub fn matches(&self, tags: &TagSet) -> bool {
        for (key, condition) in &self.required {
            match tags.get(key) {
                Some(value) if condition.matches(value) => {}
                _ => return false,
            }
        }
        for (key, condition) in &self.forbidden {
            if let Some(value) = tags.get(key) {
                if condition.matches(value) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_exactly() {
        let matcher = TagMatcher::tag("natural", "tree");
        assert!(matcher.matches(&TagSet::new().with("natural", "tree")));
        assert!(!matcher.matches(&TagSet::new().with("natural", "wood")));
        assert!(!matcher.matches(&TagSet::new().with("landuse", "forest")));
    }

    #[test]
    fn literal_is_case_sensitive() {
        let matcher = TagMatcher::tag("natural", "tree");
        assert!(!matcher.matches(&TagSet::new().with("natural", "Tree")));
        assert!(!matcher.matches(&TagSet::new().with("Natural", "tree")));
    }

    #[test]
    fn any_of_accepts_each_alternative() {
        let matcher = TagMatcher::new().with_any_of("crossing", ["zebra", "marked"]);
        assert!(matcher.matches(&TagSet::new().with("crossing", "zebra")));
        assert!(matcher.matches(&TagSet::new().with("crossing", "marked")));
        assert!(!matcher.matches(&TagSet::new().with("crossing", "unmarked")));
    }

    #[test]
    fn wildcard_requires_presence_only() {
        let matcher = TagMatcher::key_present("tomb");
        assert!(matcher.matches(&TagSet::new().with("tomb", "war_grave")));
        assert!(matcher.matches(&TagSet::new().with("tomb", "")));
        assert!(!matcher.matches(&TagSet::new().with("historic", "tomb")));
    }

    #[test]
    fn all_required_conditions_must_hold() {
        let matcher = TagMatcher::tag("highway", "bus_stop").with_tag("shelter", "yes");
        let full = TagSet::new().with("highway", "bus_stop").with("shelter", "yes");
        assert!(matcher.matches(&full));

        // Negating any single required condition breaks the match.
        let wrong_value = TagSet::new().with("highway", "bus_stop").with("shelter", "no");
        assert!(!matcher.matches(&wrong_value));
        let missing_key = TagSet::new().with("highway", "bus_stop");
        assert!(!matcher.matches(&missing_key));
    }

    #[test]
    fn extra_tags_do_not_prevent_matching() {
        let matcher = TagMatcher::tag("natural", "tree");
        let tags = TagSet::new().with("natural", "tree").with("height", "12");
        assert!(matcher.matches(&tags));
    }

    mod forbidden {
        use super::*;

        #[test]
        fn absent_key_satisfies_forbidden_condition() {
            let matcher = TagMatcher::tag("amenity", "bench").without_tag("backrest", "no");
            assert!(matcher.matches(&TagSet::new().with("amenity", "bench")));
        }

        #[test]
        fn matching_forbidden_literal_excludes_the_rule() {
            let matcher = TagMatcher::tag("amenity", "bench").without_tag("backrest", "no");
            let tags = TagSet::new().with("amenity", "bench").with("backrest", "no");
            assert!(!matcher.matches(&tags));
            // A different value for the forbidden key is fine.
            let tags = TagSet::new().with("amenity", "bench").with("backrest", "yes");
            assert!(matcher.matches(&tags));
        }

        #[test]
        fn forbidden_alternatives_exclude_each_listed_value() {
            let matcher =
                TagMatcher::tag("highway", "crossing").without_any_of("crossing", ["no", "none"]);
            for value in ["no", "none"] {
                let tags = TagSet::new().with("highway", "crossing").with("crossing", value);
                assert!(!matcher.matches(&tags), "value {value:?} should exclude");
            }
            let tags = TagSet::new().with("highway", "crossing").with("crossing", "zebra");
            assert!(matcher.matches(&tags));
        }

        #[test]
        fn forbidden_wildcard_means_key_must_be_absent() {
            let matcher = TagMatcher::tag("natural", "tree").without_key("leaf_type");
            assert!(matcher.matches(&TagSet::new().with("natural", "tree")));
            let tags = TagSet::new().with("natural", "tree").with("leaf_type", "broadleaved");
            assert!(!matcher.matches(&tags));
        }
    }

    mod serde_repr {
        use super::*;
        use serde_json::json;

        #[test]
        fn string_becomes_literal() {
            let matcher: ValueMatcher = serde_json::from_value(json!("tree")).unwrap();
            assert_eq!(matcher, ValueMatcher::literal("tree"));
        }

        #[test]
        fn star_becomes_wildcard() {
            let matcher: ValueMatcher = serde_json::from_value(json!("*")).unwrap();
            assert_eq!(matcher, ValueMatcher::Wildcard);
        }

        #[test]
        fn array_becomes_alternatives() {
            let matcher: ValueMatcher = serde_json::from_value(json!(["zebra", "marked"])).unwrap();
            assert_eq!(matcher, ValueMatcher::any_of(["zebra", "marked"]));
        }

        #[test]
        fn round_trip_preserves_each_form() {
            for matcher in [
                ValueMatcher::literal("tree"),
                ValueMatcher::any_of(["a", "b"]),
                ValueMatcher::Wildcard,
            ] {
                let value = serde_json::to_value(&matcher).unwrap();
                let back: ValueMatcher = serde_json::from_value(value).unwrap();
                assert_eq!(back, matcher);
            }
        }

        #[test]
        fn wildcard_serializes_as_star() {
            let value = serde_json::to_value(ValueMatcher::Wildcard).unwrap();
            assert_eq!(value, json!("*"));
        }
    }
}

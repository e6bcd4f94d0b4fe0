//! A rule binds a tag predicate to icon-layer directives.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::matcher::{TagMatcher, ValueMatcher};
use crate::tags::TagSet;

/// One entry of the rule table.
///
/// A rule pairs a [`TagMatcher`] with the directives applied when it
/// matches: icon identifiers for the four layer slots, an optional
/// symbolic color reference, an optional tag rewrite, and the suppress
/// flag. Directives are applied by [`Scheme::resolve`](crate::Scheme::resolve)
/// in declaration order.
///
/// # Example
///
/// ```
/// use iconmap::{Rule, TagMatcher};
///
/// let rule = Rule::new(TagMatcher::tag("natural", "tree"))
///     .with_icon("tree")
///     .with_color("tree_color");
/// assert_eq!(rule.primary(), ["tree"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    matcher: TagMatcher,
    rewrite: BTreeMap<String, String>,
    primary: Vec<String>,
    secondary: Vec<String>,
    base: Vec<String>,
    overlay: Vec<String>,
    color: Option<String>,
    suppress: bool,
}

impl Rule {
    /// Creates a rule with the given matcher and no directives.
    pub fn new(matcher: TagMatcher) -> Self {
        Self {
            matcher,
            ..Self::default()
        }
    }

    /// Appends an identifier to the principal-icon directive.
    ///
    /// When the rule matches, the principal icon replaces any primary
    /// assignment made by earlier rules.
    pub fn with_icon(mut self, id: impl Into<String>) -> Self {
        self.primary.push(id.into());
        self
    }

    /// Appends several identifiers to the principal-icon directive.
    pub fn with_icons<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Appends a badge icon, drawn beside the principal icon.
    pub fn with_extra_icon(mut self, id: impl Into<String>) -> Self {
        self.secondary.push(id.into());
        self
    }

    /// Appends an icon drawn beneath the principal icon.
    pub fn with_under_icon(mut self, id: impl Into<String>) -> Self {
        self.base.push(id.into());
        self
    }

    /// Appends an icon drawn above the principal icon.
    pub fn with_over_icon(mut self, id: impl Into<String>) -> Self {
        self.overlay.push(id.into());
        self
    }

    /// Sets the symbolic color reference.
    pub fn with_color(mut self, reference: impl Into<String>) -> Self {
        self.color = Some(reference.into());
        self
    }

    /// Adds a tag rewrite, applied to the working tag view for rules
    /// evaluated after this one in the same resolution pass.
    pub fn with_rewrite(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.rewrite.insert(key.into(), value.into());
        self
    }

    /// Marks matching tag sets as not to be drawn.
    ///
    /// Layer and color accumulation continues; the caller decides what
    /// to do with the suppressed result.
    pub fn suppress_drawing(mut self) -> Self {
        self.suppress = true;
        self
    }

    /// Returns the matcher for this rule.
    pub fn matcher(&self) -> &TagMatcher {
        &self.matcher
    }

    /// Returns the tag rewrites.
    pub fn rewrite(&self) -> &BTreeMap<String, String> {
        &self.rewrite
    }

    /// Returns the principal-icon identifiers.
    pub fn primary(&self) -> &[String] {
        &self.primary
    }

    /// Returns the badge-icon identifiers.
    pub fn secondary(&self) -> &[String] {
        &self.secondary
    }

    /// Returns the identifiers drawn beneath the principal icon.
    pub fn base(&self) -> &[String] {
        &self.base
    }

    /// Returns the identifiers drawn above the principal icon.
    pub fn overlay(&self) -> &[String] {
        &self.overlay
    }

    /// Returns the symbolic color reference, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns true if matching tag sets are marked as not drawable.
    pub fn suppresses(&self) -> bool {
        self.suppress
    }

    /// Returns true if the rule carries any directive besides its
    /// rewrite. Directive-free rules still participate in matching (for
    /// their rewrite) but consume no tag keys.
    pub fn has_directives(&self) -> bool {
        !self.primary.is_empty()
            || !self.secondary.is_empty()
            || !self.base.is_empty()
            || !self.overlay.is_empty()
            || self.color.is_some()
            || self.suppress
    }

    /// Evaluates this rule's predicate against a tag set.
    pub fn matches(&self, tags: &TagSet) -> bool {
        self.matcher.matches(tags)
    }
}

/// The wire form of a rule in the scheme document.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleRepr {
    tags: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    no_tags: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    to_tags: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    icon: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    add_icon: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    under_icon: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    over_icon: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default = "default_draw", skip_serializing_if = "is_default_draw")]
    draw: bool,
}

fn default_draw() -> bool {
    true
}

fn is_default_draw(draw: &bool) -> bool {
    *draw
}

/// Icon directives accept a bare identifier or a list of identifiers.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::One(id) => vec![id],
        Repr::Many(ids) => ids,
    })
}

impl From<RuleRepr> for Rule {
    fn from(repr: RuleRepr) -> Self {
        Rule {
            matcher: TagMatcher::from_maps(repr.tags, repr.no_tags),
            rewrite: repr.to_tags,
            primary: repr.icon,
            secondary: repr.add_icon,
            base: repr.under_icon,
            overlay: repr.over_icon,
            color: repr.color,
            suppress: !repr.draw,
        }
    }
}

impl From<&Rule> for RuleRepr {
    fn from(rule: &Rule) -> Self {
        RuleRepr {
            tags: rule.matcher.required().clone(),
            no_tags: rule.matcher.forbidden().clone(),
            to_tags: rule.rewrite.clone(),
            icon: rule.primary.clone(),
            add_icon: rule.secondary.clone(),
            under_icon: rule.base.clone(),
            over_icon: rule.overlay.clone(),
            color: rule.color.clone(),
            draw: !rule.suppress,
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RuleRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RuleRepr::deserialize(deserializer).map(Rule::from)
    }
}

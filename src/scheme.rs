//! The scheme: an ordered rule table, a palette, and the resolver.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{Color, Palette};
use crate::error::SchemeError;
use crate::keys::KeyRoles;
use crate::resolution::{Resolution, DEFAULT_GLYPH};
use crate::rule::Rule;
use crate::tags::TagSet;

/// An ordered rule table with its palette and key roles.
///
/// A scheme is loaded once, validated eagerly, and never mutated again;
/// it can be shared across threads and queried concurrently without
/// synchronization. Rule order is preserved exactly as declared: it is
/// the tie-break for the primary icon and the color (last matching rule
/// wins), while the other layer slots accumulate across all matching
/// rules.
///
/// # Example
///
/// ```
/// use iconmap::{Scheme, TagSet};
///
/// let scheme = Scheme::from_json_str(r##"{
///     "colors": { "water_color": "#45688e" },
///     "node_icons": [
///         { "tags": { "natural": "spring" }, "icon": "spring", "color": "water_color" }
///     ]
/// }"##)?;
///
/// let resolution = scheme.resolve(&TagSet::new().with("natural", "spring"));
/// assert_eq!(resolution.primary(), Some("spring"));
/// # Ok::<(), iconmap::SchemeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    rules: Vec<Rule>,
    palette: Palette,
    keys: KeyRoles,
}

/// The scheme document: rules under `node_icons`, named colors under
/// `colors`, and the optional key-role lists.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeDoc {
    #[serde(default, skip_serializing_if = "Palette::is_empty")]
    colors: Palette,
    node_icons: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags_to_write: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prefix_to_write: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags_to_skip: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prefix_to_skip: Vec<String>,
}

impl Scheme {
    /// Creates a scheme from rules and a palette, validating eagerly.
    ///
    /// Fails if any rule requires no tags, or if any rule's color
    /// reference is neither a palette entry nor a hex literal. A scheme
    /// that constructs successfully never fails at query time.
    pub fn new(rules: Vec<Rule>, palette: Palette) -> Result<Self, SchemeError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.matcher().is_empty() {
                return Err(SchemeError::EmptyRequired { index });
            }
            if let Some(name) = rule.color() {
                if palette.resolve(name).is_none() {
                    return Err(SchemeError::UnknownColor {
                        index,
                        name: name.to_string(),
                    });
                }
            }
        }
        tracing::debug!(rules = rules.len(), colors = palette.len(), "scheme validated");
        Ok(Self {
            rules,
            palette,
            keys: KeyRoles::default(),
        })
    }

    /// Returns this scheme with the given key roles.
    pub fn with_key_roles(mut self, keys: KeyRoles) -> Self {
        self.keys = keys;
        self
    }

    /// Loads a scheme from a JSON document string.
    pub fn from_json_str(source: &str) -> Result<Self, SchemeError> {
        Self::build(serde_json::from_str(source)?)
    }

    /// Loads a scheme from a reader producing a JSON document.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, SchemeError> {
        Self::build(serde_json::from_reader(reader)?)
    }

    /// Loads a scheme from an already-parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, SchemeError> {
        Self::build(serde_json::from_value(value)?)
    }

    fn build(doc: SchemeDoc) -> Result<Self, SchemeError> {
        Ok(Self::new(doc.node_icons, doc.colors)?.with_key_roles(KeyRoles::new(
            doc.tags_to_write,
            doc.prefix_to_write,
            doc.tags_to_skip,
            doc.prefix_to_skip,
        )))
    }

    /// Serializes this scheme back to its document form.
    ///
    /// Loading the output yields a scheme that resolves identically for
    /// every tag set; nothing is normalized away at load time.
    pub fn to_value(&self) -> Result<Value, SchemeError> {
        let doc = SchemeDoc {
            colors: self.palette.clone(),
            node_icons: self.rules.clone(),
            tags_to_write: self.keys.write_keys().to_vec(),
            prefix_to_write: self.keys.write_prefixes().to_vec(),
            tags_to_skip: self.keys.skip_keys().to_vec(),
            prefix_to_skip: self.keys.skip_prefixes().to_vec(),
        };
        Ok(serde_json::to_value(doc)?)
    }

    /// Serializes this scheme to a JSON document string.
    pub fn to_json_string(&self) -> Result<String, SchemeError> {
        Ok(self.to_value()?.to_string())
    }

    /// Returns the rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns true if the key should be rendered as text by the caller.
    pub fn is_writable(&self, key: &str) -> bool {
        self.keys.is_writable(key)
    }

    /// Returns true if the key is not represented by icons: rendered as
    /// text or dropped entirely.
    pub fn is_hidden(&self, key: &str) -> bool {
        self.keys.is_hidden(key)
    }

    /// Resolves a tag set to its layered icon assignment.
    ///
    /// A single pass over the rule table in declaration order: the
    /// primary icon and color are replaced by each matching rule (last
    /// match wins), the other layer slots accumulate, suppression is
    /// sticky, and tag rewrites apply to a working view seen only by
    /// rules declared later in the table. Zero matching rules yield an
    /// empty, unsuppressed result with the default color, never an
    /// error.
    pub fn resolve(&self, tags: &TagSet) -> Resolution {
        self.resolve_inner(tags, false)
    }

    /// Like [`Scheme::resolve`], but substitutes the fallback
    /// [`DEFAULT_GLYPH`] as the primary icon when no rule assigned any
    /// icon and at least one tag key is neither consumed by a rule nor
    /// hidden by the key roles.
    pub fn resolve_or_default(&self, tags: &TagSet) -> Resolution {
        self.resolve_inner(tags, true)
    }

    fn resolve_inner(&self, tags: &TagSet, with_fallback: bool) -> Resolution {
        let mut working: Cow<'_, TagSet> = Cow::Borrowed(tags);
        let mut primary_stack: Vec<String> = Vec::new();
        let mut base: Vec<String> = Vec::new();
        let mut secondary: Vec<String> = Vec::new();
        let mut overlay: Vec<String> = Vec::new();
        let mut color_ref: Option<&str> = None;
        let mut suppressed = false;
        let mut processed: BTreeSet<String> = BTreeSet::new();
        let mut priority = 0;

        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.matches(&working) {
                continue;
            }
            priority = self.rules.len() - index;
            if rule.has_directives() {
                processed.extend(rule.matcher().required().keys().cloned());
            }
            if !rule.primary().is_empty() {
                primary_stack = rule.primary().to_vec();
            }
            base.extend(rule.base().iter().cloned());
            secondary.extend(rule.secondary().iter().cloned());
            overlay.extend(rule.overlay().iter().cloned());
            if let Some(reference) = rule.color() {
                color_ref = Some(reference);
            }
            if rule.suppresses() {
                suppressed = true;
            }
            if !rule.rewrite().is_empty() {
                // Later rules in this pass see the rewritten values; the
                // caller's tag set stays untouched.
                let view = working.to_mut();
                for (key, value) in rule.rewrite() {
                    view.insert(key.clone(), value.clone());
                }
            }
        }

        // A multi-identifier primary directive is a stack: the first
        // identifier is the principal icon, the rest draw above it,
        // beneath any accumulated overlays.
        let mut primary_ids = primary_stack.into_iter();
        let mut primary = primary_ids.next();
        let mut full_overlay: Vec<String> = primary_ids.collect();
        full_overlay.append(&mut overlay);

        let mut fill = match color_ref {
            Some(reference) => self.palette.resolve_or(reference, Color::default()),
            None => Color::default(),
        };

        // Colors supplied by the tags themselves override the rules:
        // namespaced `*:colo(u)r` keys first, then the plain keys.
        for (key, value) in working.iter() {
            if key.ends_with(":color") || key.ends_with(":colour") {
                if let Some(color) = self.palette.resolve(value) {
                    fill = color;
                    processed.insert(key.to_string());
                }
            }
        }
        for key in ["color", "colour"] {
            if let Some(value) = working.get(key) {
                if let Some(color) = self.palette.resolve(value) {
                    fill = color;
                    processed.insert(key.to_string());
                }
            }
        }

        let mut default_applied = false;
        if with_fallback
            && primary.is_none()
            && base.is_empty()
            && secondary.is_empty()
            && full_overlay.is_empty()
        {
            let drawable_left = working
                .keys()
                .any(|key| !processed.contains(key) && !self.keys.is_hidden(key));
            if drawable_left {
                primary = Some(DEFAULT_GLYPH.to_string());
                default_applied = true;
            }
        }

        tracing::trace!(?primary, suppressed, priority, "resolved tag set");

        Resolution {
            base,
            primary,
            secondary,
            overlay: full_overlay,
            color: fill,
            suppressed,
            processed,
            priority,
            default_applied,
        }
    }
}

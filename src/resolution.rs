//! The result of resolving one tag set against a scheme.

use std::collections::BTreeSet;

use crate::color::Color;

/// The icon identifier substituted by
/// [`Scheme::resolve_or_default`](crate::Scheme::resolve_or_default) when
/// no rule assigned an icon but drawable tags remain.
pub const DEFAULT_GLYPH: &str = "default";

/// The layered icon assignment for one tag set.
///
/// Produced fresh by every [`Scheme::resolve`](crate::Scheme::resolve)
/// call; a pure function of the scheme and the tag set, with no further
/// lifecycle. Stacking order is base, then primary, then overlay;
/// secondary icons are badges drawn beside the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub(crate) base: Vec<String>,
    pub(crate) primary: Option<String>,
    pub(crate) secondary: Vec<String>,
    pub(crate) overlay: Vec<String>,
    pub(crate) color: Color,
    pub(crate) suppressed: bool,
    pub(crate) processed: BTreeSet<String>,
    pub(crate) priority: usize,
    pub(crate) default_applied: bool,
}

impl Resolution {
    /// Returns the icons drawn beneath the principal icon, in
    /// accumulation order.
    pub fn base(&self) -> &[String] {
        &self.base
    }

    /// Returns the principal icon, if any rule assigned one.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Returns the badge icons, in accumulation order.
    pub fn secondary(&self) -> &[String] {
        &self.secondary
    }

    /// Returns the icons drawn above the principal icon, in
    /// accumulation order.
    pub fn overlay(&self) -> &[String] {
        &self.overlay
    }

    /// Returns the resolved fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns true if a matching rule marked this tag set as not to be
    /// drawn. The accumulated layers are still available for callers
    /// that override suppression.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Returns the tag keys consumed by matching rules (plus any
    /// color-carrying tag keys). Keys outside this set were not
    /// represented by the icon assignment.
    pub fn processed(&self) -> &BTreeSet<String> {
        &self.processed
    }

    /// Returns true if the key was consumed by a matching rule.
    pub fn is_processed(&self, key: &str) -> bool {
        self.processed.contains(key)
    }

    /// Placement priority: higher for earlier-declared rules, zero when
    /// nothing matched.
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// Returns true if the primary slot holds the fallback
    /// [`DEFAULT_GLYPH`] rather than a rule-assigned icon.
    pub fn is_default_glyph(&self) -> bool {
        self.default_applied
    }

    /// Returns true if no icon was assigned to any slot.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.primary.is_none()
            && self.secondary.is_empty()
            && self.overlay.is_empty()
    }

    /// Iterates the main stack in drawing order: base icons, then the
    /// principal icon, then overlays.
    pub fn stack(&self) -> impl Iterator<Item = &str> {
        self.base
            .iter()
            .map(String::as_str)
            .chain(self.primary.as_deref())
            .chain(self.overlay.iter().map(String::as_str))
    }
}

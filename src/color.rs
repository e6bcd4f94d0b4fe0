//! Concrete color values and the named-color palette.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidColor;

/// An opaque RGB color value.
///
/// Parses from `#rgb` and `#rrggbb` literals and displays as a normalized
/// lowercase `#rrggbb` string, which is also its serialized form.
///
/// # Example
///
/// ```
/// use iconmap::Color;
///
/// let color: Color = "#FCAF3E".parse().unwrap();
/// assert_eq!(color.to_string(), "#fcaf3e");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a color from its channel values.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// The fill used when no rule assigns a color.
impl Default for Color {
    fn default() -> Self {
        Color::rgb(0x44, 0x44, 0x44)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = || InvalidColor {
            literal: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(reject)?;
        if !hex.is_ascii() {
            return Err(reject());
        }
        match hex.len() {
            3 => {
                let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                // Each shorthand digit expands to a doubled pair: #4a2 is #44aa22.
                let red = channels.next().flatten().ok_or_else(reject)?;
                let green = channels.next().flatten().ok_or_else(reject)?;
                let blue = channels.next().flatten().ok_or_else(reject)?;
                Ok(Color::rgb(red, green, blue))
            }
            6 => {
                let channel =
                    |range| u8::from_str_radix(&hex[range], 16).map_err(|_| reject());
                Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
            }
            _ => Err(reject()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(D::Error::custom)
    }
}

/// The named-color table of a scheme.
///
/// Maps symbolic color names (as referenced by rules and tag values) to
/// concrete [`Color`] values. Loaded with the rule table and immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: BTreeMap<String, Color>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named entry.
    pub fn insert(&mut self, name: impl Into<String>, color: Color) {
        self.entries.insert(name.into(), color);
    }

    /// Looks up a name, falling back to its lowercase form.
    pub fn get(&self, name: &str) -> Option<Color> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(&name.to_ascii_lowercase()))
            .copied()
    }

    /// Resolves a color reference: a palette name, or failing that a hex
    /// literal. Returns `None` when the reference is neither.
    pub fn resolve(&self, reference: &str) -> Option<Color> {
        self.get(reference).or_else(|| reference.parse().ok())
    }

    /// Resolves a color reference, substituting `fallback` when the
    /// reference is neither a palette name nor a hex literal.
    pub fn resolve_or(&self, reference: &str, fallback: Color) -> Color {
        self.resolve(reference).unwrap_or(fallback)
    }

    /// Returns the number of named entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Color)> for Palette {
    fn from_iter<I: IntoIterator<Item = (K, Color)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_literal() {
        let color: Color = "#fcaf3e".parse().unwrap();
        assert_eq!(color, Color::rgb(0xfc, 0xaf, 0x3e));
    }

    #[test]
    fn parses_shorthand_literal() {
        let color: Color = "#4a2".parse().unwrap();
        assert_eq!(color, Color::rgb(0x44, 0xaa, 0x22));
    }

    #[test]
    fn parse_is_case_insensitive_and_display_is_lowercase() {
        let color: Color = "#AABBCC".parse().unwrap();
        assert_eq!(color.to_string(), "#aabbcc");
    }

    #[test]
    fn rejects_malformed_literals() {
        for literal in ["", "4a2", "#", "#zzz", "#12345", "#1234567", "red"] {
            assert!(literal.parse::<Color>().is_err(), "accepted {literal:?}");
        }
    }

    #[test]
    fn rejects_non_ascii_literal() {
        assert!("#ффффff".parse::<Color>().is_err());
    }

    #[test]
    fn default_color_is_dark_gray() {
        assert_eq!(Color::default().to_string(), "#444444");
    }

    #[test]
    fn serde_round_trips_as_string() {
        let color = Color::rgb(0x98, 0xac, 0x64);
        let value = serde_json::to_value(color).unwrap();
        assert_eq!(value, serde_json::json!("#98ac64"));
        let back: Color = serde_json::from_value(value).unwrap();
        assert_eq!(back, color);
    }

    mod palette {
        use super::*;

        fn palette() -> Palette {
            Palette::from_iter([
                ("deciduous", Color::rgb(0xfc, 0xaf, 0x3e)),
                ("tree_color", Color::rgb(0x98, 0xac, 0x64)),
            ])
        }

        #[test]
        fn get_finds_exact_name() {
            assert_eq!(palette().get("deciduous"), Some(Color::rgb(0xfc, 0xaf, 0x3e)));
            assert_eq!(palette().get("lagoon"), None);
        }

        #[test]
        fn get_falls_back_to_lowercase_name() {
            assert_eq!(palette().get("Deciduous"), Some(Color::rgb(0xfc, 0xaf, 0x3e)));
        }

        #[test]
        fn resolve_accepts_names_and_literals() {
            let palette = palette();
            assert_eq!(palette.resolve("tree_color"), Some(Color::rgb(0x98, 0xac, 0x64)));
            assert_eq!(palette.resolve("#102030"), Some(Color::rgb(0x10, 0x20, 0x30)));
            assert_eq!(palette.resolve("no_such_color"), None);
        }

        #[test]
        fn resolve_or_substitutes_fallback() {
            let fill = palette().resolve_or("no_such_color", Color::default());
            assert_eq!(fill, Color::default());
        }

        #[test]
        fn serde_is_a_transparent_map() {
            let value = serde_json::to_value(palette()).unwrap();
            assert_eq!(
                value,
                serde_json::json!({ "deciduous": "#fcaf3e", "tree_color": "#98ac64" })
            );
            let back: Palette = serde_json::from_value(value).unwrap();
            assert_eq!(back, palette());
        }
    }
}

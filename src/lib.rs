//! Iconmap: a library for mapping OpenStreetMap tag sets to layered icon
//! assignments.
//!
//! Iconmap evaluates **tag sets** against a **scheme** (an ordered table
//! of declarative rules plus a named-color palette) to decide which
//! icons a feature gets, in what stacking order, and in what color.
//!
//! # Example
//!
//! ```
//! use iconmap::{Scheme, TagSet};
//!
//! let scheme = Scheme::from_json_str(r##"{
//!     "colors": { "tree_color": "#98ac64" },
//!     "node_icons": [
//!         { "tags": { "natural": "tree" }, "icon": "tree", "color": "tree_color" },
//!         { "tags": { "natural": "tree", "denotation": "urban" },
//!           "add_icon": "urban_badge" }
//!     ]
//! }"##)?;
//!
//! let tags = TagSet::new()
//!     .with("natural", "tree")
//!     .with("denotation", "urban");
//! let resolution = scheme.resolve(&tags);
//!
//! assert_eq!(resolution.primary(), Some("tree"));
//! assert_eq!(resolution.secondary(), ["urban_badge"]);
//! assert_eq!(resolution.color().to_string(), "#98ac64");
//! assert!(!resolution.is_suppressed());
//! # Ok::<(), iconmap::SchemeError>(())
//! ```
//!
//! Rules are evaluated in declaration order in a single pass. The
//! primary icon and the color are replaced by each matching rule (last
//! match wins); under-, over- and badge icons accumulate; a `draw: false`
//! rule marks the result suppressed without stopping accumulation. The
//! scheme is immutable after loading and can be queried from any number
//! of threads concurrently.
//!
//! Resolving identifiers to drawable shapes is deliberately out of
//! scope: a [`Resolution`] carries icon identifiers only, and the icon
//! store consuming them decides what exists.

mod color;
mod error;
mod keys;
mod matcher;
mod resolution;
mod rule;
mod scheme;
mod tags;

pub use color::{Color, Palette};
pub use error::{InvalidColor, InvalidTags, SchemeError};
pub use keys::KeyRoles;
pub use matcher::{TagMatcher, ValueMatcher};
pub use resolution::{Resolution, DEFAULT_GLYPH};
pub use rule::Rule;
pub use scheme::Scheme;
pub use tags::TagSet;

//! Key roles: which tag keys are rendered as text and which are ignored.
//!
//! The scheme document carries four lists (`tags_to_write`,
//! `prefix_to_write`, `tags_to_skip`, `prefix_to_skip`) that classify tag
//! keys the icon rules do not consume. The engine itself only uses them
//! to gate the fallback glyph; the text-rendering layer queries them
//! through [`Scheme::is_writable`](crate::Scheme::is_writable) and
//! [`Scheme::is_hidden`](crate::Scheme::is_hidden).

/// Classification of tag keys outside the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRoles {
    write_keys: Vec<String>,
    write_prefixes: Vec<String>,
    skip_keys: Vec<String>,
    skip_prefixes: Vec<String>,
}

impl KeyRoles {
    /// Creates key roles from the four document lists.
    pub fn new(
        write_keys: Vec<String>,
        write_prefixes: Vec<String>,
        skip_keys: Vec<String>,
        skip_prefixes: Vec<String>,
    ) -> Self {
        Self {
            write_keys,
            write_prefixes,
            skip_keys,
            skip_prefixes,
        }
    }

    /// Returns the exact keys to render as text.
    pub fn write_keys(&self) -> &[String] {
        &self.write_keys
    }

    /// Returns the `prefix:`-style namespaces to render as text.
    pub fn write_prefixes(&self) -> &[String] {
        &self.write_prefixes
    }

    /// Returns the exact keys to drop entirely.
    pub fn skip_keys(&self) -> &[String] {
        &self.skip_keys
    }

    /// Returns the `prefix:`-style namespaces to drop entirely.
    pub fn skip_prefixes(&self) -> &[String] {
        &self.skip_prefixes
    }

    /// Returns true if the key should not be represented by an icon:
    /// it is either rendered as text or dropped.
    pub fn is_hidden(&self, key: &str) -> bool {
        if self.write_keys.iter().any(|k| k == key) || self.skip_keys.iter().any(|k| k == key) {
            return true;
        }
        self.write_prefixes
            .iter()
            .chain(&self.skip_prefixes)
            .any(|prefix| has_prefix(key, prefix))
    }

    /// Returns true if the key should be rendered as text. Skipped keys
    /// win over written ones.
    pub fn is_writable(&self, key: &str) -> bool {
        if self.skip_keys.iter().any(|k| k == key) {
            return false;
        }
        if self.write_keys.iter().any(|k| k == key) {
            return true;
        }
        self.write_prefixes.iter().any(|prefix| has_prefix(key, prefix))
    }
}

/// A prefix matches `prefix:*` keys only, never the bare prefix itself.
fn has_prefix(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> KeyRoles {
        KeyRoles::new(
            vec!["name".to_string(), "operator".to_string()],
            vec!["name".to_string()],
            vec!["source".to_string(), "fixme".to_string()],
            vec!["source".to_string()],
        )
    }

    #[test]
    fn written_keys_are_writable_and_hidden_from_icons() {
        assert!(roles().is_writable("name"));
        assert!(roles().is_hidden("name"));
    }

    #[test]
    fn skipped_keys_are_hidden_and_not_writable() {
        assert!(roles().is_hidden("source"));
        assert!(!roles().is_writable("source"));
    }

    #[test]
    fn prefixes_match_namespaced_keys_only() {
        assert!(roles().is_writable("name:en"));
        assert!(roles().is_hidden("source:position"));
        // "named" shares characters with the prefix but not the namespace.
        assert!(!roles().is_writable("named"));
        assert!(!roles().is_hidden("sourced"));
    }

    #[test]
    fn unlisted_keys_are_neither() {
        assert!(!roles().is_hidden("natural"));
        assert!(!roles().is_writable("natural"));
    }

    #[test]
    fn skip_wins_over_write_for_exact_keys() {
        let roles = KeyRoles::new(
            vec!["level".to_string()],
            vec![],
            vec!["level".to_string()],
            vec![],
        );
        assert!(!roles.is_writable("level"));
        assert!(roles.is_hidden("level"));
    }
}

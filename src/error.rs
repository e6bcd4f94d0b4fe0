//! Error types for scheme loading and query inputs.

use thiserror::Error;

/// Errors raised while loading or validating a scheme document.
///
/// Every variant is fatal to the load: a scheme is either fully valid or
/// not constructed at all, so queries never run against a partially-loaded
/// rule table.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// The document is not well-formed JSON of the expected shape.
    #[error("failed to parse scheme document: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule has an empty `tags` section. Every rule must require at
    /// least one tag, otherwise it would match every input.
    #[error("rule {index} requires no tags; every rule must require at least one")]
    EmptyRequired { index: usize },

    /// A rule references a color that is neither a palette entry nor a
    /// parseable hex literal. Detected at load time so that query-time
    /// color resolution never fails.
    #[error("rule {index} references unknown color {name:?}")]
    UnknownColor { index: usize, name: String },
}

/// A malformed tag set handed to the query boundary.
///
/// Unlike [`SchemeError`] this is recoverable: the caller may skip the
/// offending input and continue with the next one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidTags {
    /// The tag document is not a JSON object.
    #[error("tag set must be a JSON object")]
    NotAnObject,

    /// A tag value is not a string.
    #[error("tag value for key {key:?} is not a string")]
    NonStringValue { key: String },
}

/// A string that could not be parsed as a hex color literal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a hex color literal: {literal:?}")]
pub struct InvalidColor {
    /// The rejected input.
    pub literal: String,
}

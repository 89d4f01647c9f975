//! Core error types for assertgen-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of catalog lookup and type introspection.

use thiserror::Error;

use crate::name::TypeName;

/// Core errors produced by the assertgen-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested type cannot be given a companion assertion class
    /// (anonymous or local types have no externally nameable name).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A type or package name did not resolve to anything in the catalog.
    #[error("class not found: '{name}'")]
    ClassNotFound { name: String },

    /// A type signature could not be parsed.
    #[error("malformed type signature '{signature}': {reason}")]
    MalformedSignature { signature: String, reason: String },

    /// A catalog document could not be parsed.
    #[error("malformed type catalog: {0}")]
    MalformedCatalog(#[from] serde_json::Error),
}

impl CoreError {
    /// Builds the error reported when introspecting a type that has no
    /// nameable companion class.
    pub fn unnameable(name: &TypeName, what: &str) -> Self {
        CoreError::InvalidArgument {
            reason: format!(
                "cannot generate assertions for {} type '{}'",
                what,
                name.qualified()
            ),
        }
    }
}

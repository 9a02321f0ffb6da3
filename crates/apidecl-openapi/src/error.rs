//! Error types for document rendering
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::version::VersionError;
use apidecl_core::ReferenceError;
use thiserror::Error;

/// Main error type for rendering operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested OpenAPI version cannot be produced
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// A reference in the registry did not resolve; no document is produced
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Serialization of a document fragment failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

//! Existence levels
//!
//! An ordered description of whether a value may be omitted, may be null, or
//! has to be present and non-empty. Validation uses it to emit `blank`
//! errors and the document renderer uses it to decide what is `required`.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requirement strength, ordered `None < AllowOmitted < AllowNil < Present`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Existence {
    /// No requirement at all
    #[default]
    None,
    /// The value may be left out entirely
    #[serde(alias = "optional")]
    AllowOmitted,
    /// The key has to be sent but its value may be null
    AllowNil,
    /// A non-empty value is required
    #[serde(alias = "required")]
    Present,
}

/// What the existence check needs to know about a casted value
pub trait Presence {
    /// The value was not supplied at all
    fn is_omitted(&self) -> bool;
    /// The value is null, either explicitly or because it was omitted
    fn is_null(&self) -> bool;
    /// Null, a zero-length string or sequence, or an object of empty attributes
    fn is_empty(&self) -> bool;
}

impl Existence {
    /// Whether `node` satisfies this level.
    ///
    /// `Present` rejects any empty value. `AllowNil` rejects a value that was
    /// omitted while accepting an explicit null. Lower levels accept anything.
    pub fn reach<P: Presence + ?Sized>(self, node: &P) -> bool {
        match self {
            Existence::Present => !node.is_empty(),
            Existence::AllowNil => !node.is_omitted(),
            Existence::AllowOmitted | Existence::None => true,
        }
    }

    /// Whether documents should list the field as required
    pub fn is_required(self) -> bool {
        self >= Existence::AllowNil
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Existence::None => "none",
            Existence::AllowOmitted => "allow_omitted",
            Existence::AllowNil => "allow_nil",
            Existence::Present => "present",
        }
    }
}

impl fmt::Display for Existence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

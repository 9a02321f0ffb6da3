//! Engine configuration
//!
//! Settings are carried by an explicit [`EngineConfig`] value handed to the
//! registry at construction time. Nothing here is process-global.

use crate::casting::CastMode;
use serde::{Deserialize, Serialize};

/// Default limit on chained reference resolution
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 32;

/// Configuration threaded through a [`crate::Registry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many references may be followed before resolution gives up
    pub max_reference_depth: usize,
    /// Locale used when formatting error messages
    pub locale: String,
    /// Attribute extraction mode used when the caller does not pick one
    pub default_cast_mode: CastMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            locale: "en".to_string(),
            default_cast_mode: CastMode::Object,
        }
    }
}

impl EngineConfig {
    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_default_cast_mode(mut self, mode: CastMode) -> Self {
        self.default_cast_mode = mode;
        self
    }
}

//! Parser configuration.
//!
//! Hosts usually embed [`ParserSettings`] in their own configuration file,
//! so the struct deserializes with every field optional.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default upper bound for a single script, 4 MiB.
pub const DEFAULT_MAX_SCRIPT_BYTES: usize = 4 * 1024 * 1024;

/// Settings for [`crate::RepoInitParserService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ParserSettings {
    /// Largest script accepted, in bytes. `None` disables the check.
    pub max_script_bytes: Option<usize>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            max_script_bytes: Some(DEFAULT_MAX_SCRIPT_BYTES),
        }
    }
}

impl ParserSettings {
    /// Replace the size limit; `None` accepts scripts of any size.
    pub fn with_max_script_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_script_bytes = limit;
        self
    }
}

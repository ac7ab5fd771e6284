use serde::{Deserialize, Serialize};

use crate::error::{AgeError, AgeResult};

/// Bounds applied while parsing an untrusted header.
///
/// Embeddable as a section of a host application's TOML config:
/// ```toml
/// [header]
/// max_header_len = 65536
/// max_stanzas = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLimits {
    /// Maximum header length in bytes, version line through MAC line (default: 1 MiB)
    pub max_header_len: usize,
    /// Maximum number of recipient stanzas (default: 4096)
    pub max_stanzas: usize,
}

impl Default for HeaderLimits {
    fn default() -> Self {
        Self {
            max_header_len: 1024 * 1024,
            max_stanzas: 4096,
        }
    }
}

impl HeaderLimits {
    /// Parse limits from a TOML fragment. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> AgeResult<Self> {
        let limits: Self = toml::from_str(s).map_err(|e| AgeError::Config(e.to_string()))?;
        if limits.max_header_len == 0 {
            return Err(AgeError::Config("max_header_len must be non-zero".into()));
        }
        Ok(limits)
    }
}

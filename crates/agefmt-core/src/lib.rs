//! agefmt-core: wire-format constants, parse limits, and the shared error type
//!
//! Header layout:
//! ```text
//! age-encryption.org/v1\n
//! -> <type> <arg> ...\n
//! <base64 body, 64 chars per line, final line shorter>\n
//! --- <43-char base64 MAC>\n
//! <16-byte payload nonce><payload chunks...>
//! ```

pub mod config;
pub mod error;
pub mod format;

pub use config::HeaderLimits;
pub use error::{AgeError, AgeResult};

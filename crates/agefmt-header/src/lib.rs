//! agefmt-header: the age v1 header engine
//!
//! Write path: file key → stanzas from every [`StanzaWriter`] → header + MAC
//! → payload nonce → payload key.
//!
//! Read path: parse header → first [`StanzaReader`] that yields the file key
//! → verify MAC → payload nonce → payload key.
//!
//! Recipient mechanisms plug in through the two traits in [`recipient`];
//! nothing here knows about X25519, scrypt, or SSH keys.

pub mod header;
pub mod mac;
pub mod payload;
pub mod recipient;
pub mod resolver;
pub mod stanza;

pub use header::Header;
pub use payload::{decrypt_header, decrypt_header_with_limits, encrypt_header, encrypt_header_into};
pub use recipient::{StanzaReader, StanzaWriter};
pub use resolver::{resolve_file_key, unlock_header};
pub use stanza::Stanza;

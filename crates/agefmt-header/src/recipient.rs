//! Capability traits implemented by recipient mechanisms (X25519, scrypt, SSH, ...)
//!
//! The header engine only ever talks to these traits; concrete key-agreement
//! schemes live outside this crate.

use agefmt_core::AgeResult;
use agefmt_crypto::FileKey;

use crate::stanza::Stanza;

/// Recovers the file key from the stanzas of a header.
///
/// An implementation is bound to one identity or passphrase.
pub trait StanzaReader {
    /// `Ok(None)` means no stanza was addressed to this identity. A stanza
    /// that matches but fails to unwrap should be reported as an error.
    fn file_key(&self, stanzas: &[Stanza]) -> AgeResult<Option<FileKey>>;
}

/// Produces the stanzas that let one recipient recover `file_key`.
pub trait StanzaWriter {
    fn recipient_stanzas(&self, file_key: &FileKey) -> AgeResult<Vec<Stanza>>;
}

impl<T: StanzaReader + ?Sized> StanzaReader for Box<T> {
    fn file_key(&self, stanzas: &[Stanza]) -> AgeResult<Option<FileKey>> {
        (**self).file_key(stanzas)
    }
}

impl<T: StanzaWriter + ?Sized> StanzaWriter for Box<T> {
    fn recipient_stanzas(&self, file_key: &FileKey) -> AgeResult<Vec<Stanza>> {
        (**self).recipient_stanzas(file_key)
    }
}

//! Multi-recipient trial decryption
//!
//! Each configured reader is tried in order against the full stanza list
//! until one yields a file key. Readers only see `&[Stanza]`, so a failing
//! reader cannot move the caller's read position.

use agefmt_core::{AgeError, AgeResult};
use agefmt_crypto::FileKey;
use tracing::debug;

use crate::header::Header;
use crate::recipient::StanzaReader;
use crate::stanza::Stanza;

/// Try `readers` in order until one produces the file key.
///
/// When every reader fails, a lone configured reader's error is returned
/// unchanged; otherwise the failures are collected, in reader order, into
/// [`AgeError::NoSupportedRecipient`].
pub fn resolve_file_key(stanzas: &[Stanza], readers: &[&dyn StanzaReader]) -> AgeResult<FileKey> {
    let mut causes = Vec::with_capacity(readers.len());
    for (index, reader) in readers.iter().enumerate() {
        match reader.file_key(stanzas) {
            Ok(Some(file_key)) => {
                debug!(reader = index, "stanza reader produced file key");
                return Ok(file_key);
            }
            Ok(None) => {
                debug!(reader = index, "stanza reader matched no stanza");
                causes.push(AgeError::NoFileKey);
            }
            Err(e) => {
                debug!(reader = index, error = %e, "stanza reader failed");
                causes.push(e);
            }
        }
    }

    if readers.len() == 1 {
        if let Some(only) = causes.pop() {
            return Err(only);
        }
    }
    Err(AgeError::NoSupportedRecipient { causes })
}

/// Resolve the file key for `header` and authenticate the header with it.
///
/// The file key is dropped (and zeroed) if the MAC does not verify.
pub fn unlock_header(header: &Header, readers: &[&dyn StanzaReader]) -> AgeResult<FileKey> {
    let mut file_key = resolve_file_key(header.stanzas(), readers)?;
    if let Err(e) = header.verify_mac(&file_key) {
        file_key.destroy();
        return Err(e);
    }
    Ok(file_key)
}

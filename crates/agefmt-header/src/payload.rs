//! Header write/read orchestration producing the payload key
//!
//! Stream layout produced on write and consumed on read:
//! ```text
//! [header, version line through MAC line][16 bytes: payload nonce][payload chunks...]
//! ```
//!
//! The file key never leaves this module: it is destroyed as soon as the
//! payload key has been derived, and dropped (zeroed) on every error path.

use agefmt_core::format::PAYLOAD_NONCE_SIZE;
use agefmt_core::{AgeError, AgeResult, HeaderLimits};
use agefmt_crypto::{payload_key, CipherKey, FileKey};
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::header::Header;
use crate::recipient::{StanzaReader, StanzaWriter};
use crate::resolver::unlock_header;

/// Write a header for `writers` followed by a fresh payload nonce.
///
/// Returns the header-and-nonce bytes and the payload key for the chunk cipher.
pub fn encrypt_header<R: RngCore + CryptoRng>(
    writers: &[&dyn StanzaWriter],
    rng: &mut R,
) -> AgeResult<(Vec<u8>, CipherKey)> {
    if writers.is_empty() {
        return Err(AgeError::NoRecipients);
    }

    let mut file_key = FileKey::generate(rng);
    let mut stanzas = Vec::new();
    for writer in writers {
        stanzas.extend(writer.recipient_stanzas(&file_key)?);
    }

    let (header, mut out) = Header::encode(stanzas, &file_key)?;

    let mut nonce = [0u8; PAYLOAD_NONCE_SIZE];
    rng.fill_bytes(&mut nonce);
    out.extend_from_slice(&nonce);

    let key = payload_key(&file_key, &nonce)?;
    file_key.destroy();

    debug!(
        recipients = writers.len(),
        stanzas = header.stanzas().len(),
        len = out.len(),
        "wrote header"
    );
    Ok((out, key))
}

/// Like [`encrypt_header`], writing into a caller-provided buffer.
///
/// Returns the payload key and the number of bytes written. Fails with
/// [`AgeError::BufferTooSmall`] when `out` cannot hold the header and nonce.
pub fn encrypt_header_into<R: RngCore + CryptoRng>(
    writers: &[&dyn StanzaWriter],
    out: &mut [u8],
    rng: &mut R,
) -> AgeResult<(CipherKey, usize)> {
    let (bytes, key) = encrypt_header(writers, rng)?;
    if out.len() < bytes.len() {
        return Err(AgeError::BufferTooSmall {
            needed: bytes.len(),
            available: out.len(),
        });
    }
    out[..bytes.len()].copy_from_slice(&bytes);
    Ok((key, bytes.len()))
}

/// Read and authenticate the header at the start of `input` and derive the payload key.
///
/// Returns the payload key and the offset of the first payload chunk.
pub fn decrypt_header(
    input: &[u8],
    readers: &[&dyn StanzaReader],
) -> AgeResult<(CipherKey, usize)> {
    decrypt_header_with_limits(input, readers, &HeaderLimits::default())
}

pub fn decrypt_header_with_limits(
    input: &[u8],
    readers: &[&dyn StanzaReader],
    limits: &HeaderLimits,
) -> AgeResult<(CipherKey, usize)> {
    let (header, cursor) = Header::parse_with_limits(input, limits)?;
    let mut file_key = unlock_header(&header, readers)?;

    let rest = &input[cursor..];
    let nonce: [u8; PAYLOAD_NONCE_SIZE] = rest
        .get(..PAYLOAD_NONCE_SIZE)
        .and_then(|n| n.try_into().ok())
        .ok_or(AgeError::Truncated {
            needed: PAYLOAD_NONCE_SIZE,
            available: rest.len(),
        })?;

    let key = payload_key(&file_key, &nonce)?;
    file_key.destroy();

    debug!(stanzas = header.stanzas().len(), len = cursor, "read header");
    Ok((key, cursor + PAYLOAD_NONCE_SIZE))
}

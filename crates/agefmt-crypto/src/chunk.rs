//! Per-chunk ChaCha20-Poly1305 sealing for the payload stream
//!
//! Encrypted chunk format (binary):
//! ```text
//! [N bytes: ciphertext][16 bytes: Poly1305 tag]
//! key = payload key, nonce = current ChunkNonce
//! ```
//!
//! The chunk position and the last-chunk flag live in the nonce, so a chunk
//! moved to another position, or a truncated stream, fails to open.

use agefmt_core::AgeResult;

use crate::aead::{AeadCipher, Direction};
use crate::keys::CipherKey;
use crate::nonce::ChunkNonce;

/// Encrypt a single payload chunk at the nonce's position.
///
/// Returns: `[ciphertext][16-byte tag]`
pub fn seal_chunk(
    payload_key: &CipherKey,
    nonce: &ChunkNonce,
    plaintext: &[u8],
) -> AgeResult<Vec<u8>> {
    AeadCipher::new(payload_key, *nonce.as_bytes(), Direction::Encrypt)?.encrypt(plaintext)
}

/// Decrypt a single payload chunk sealed by [`seal_chunk`].
pub fn open_chunk(
    payload_key: &CipherKey,
    nonce: &ChunkNonce,
    encrypted: &[u8],
) -> AgeResult<Vec<u8>> {
    AeadCipher::new(payload_key, *nonce.as_bytes(), Direction::Decrypt)?.decrypt(encrypted)
}

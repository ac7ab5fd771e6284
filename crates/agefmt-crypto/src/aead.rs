//! ChaCha20-Poly1305 contexts and file-key wrapping
//!
//! File-key wrap format (binary):
//! ```text
//! [16 bytes: encrypted file key][16 bytes: Poly1305 tag]
//! nonce = 12 zero bytes
//! ```
//!
//! The zero nonce is only sound because every wrap key is freshly derived and
//! used for exactly one file key.

use agefmt_core::format::CHUNK_NONCE_SIZE;
use agefmt_core::{AgeError, AgeResult};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use tracing::debug;
use zeroize::Zeroize;

use crate::keys::{CipherKey, EncryptedFileKey, FileKey};

/// Which operation a cipher context was initialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn name(self) -> &'static str {
        match self {
            Self::Encrypt => "encryption",
            Self::Decrypt => "decryption",
        }
    }
}

/// A ChaCha20-Poly1305 context bound to one key, one nonce, and one direction.
pub struct AeadCipher {
    cipher: ChaCha20Poly1305,
    nonce: [u8; CHUNK_NONCE_SIZE],
    direction: Direction,
}

impl AeadCipher {
    pub fn new(
        key: &CipherKey,
        nonce: [u8; CHUNK_NONCE_SIZE],
        direction: Direction,
    ) -> AgeResult<Self> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()?));
        Ok(Self {
            cipher,
            nonce,
            direction,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> AgeResult<Vec<u8>> {
        if self.direction != Direction::Encrypt {
            return Err(AgeError::WrongDirection(self.direction.name()));
        }
        self.cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext)
            .map_err(|e| AgeError::EncryptionFailed(e.to_string()))
    }

    /// Verifies the trailing tag and returns the plaintext; nothing is
    /// returned when the tag does not match.
    pub fn decrypt(&self, ciphertext: &[u8]) -> AgeResult<Vec<u8>> {
        if self.direction != Direction::Decrypt {
            return Err(AgeError::WrongDirection(self.direction.name()));
        }
        self.cipher
            .decrypt(Nonce::from_slice(&self.nonce), ciphertext)
            .map_err(|_| AgeError::DecryptionFailed)
    }
}

impl std::fmt::Debug for AeadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadCipher")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Wrap (encrypt) a file key under a single-use wrap key.
pub fn wrap_file_key(wrap_key: &CipherKey, file_key: &FileKey) -> AgeResult<EncryptedFileKey> {
    let cipher = AeadCipher::new(wrap_key, [0u8; CHUNK_NONCE_SIZE], Direction::Encrypt)?;
    let sealed = cipher.encrypt(file_key.as_bytes()?)?;
    EncryptedFileKey::from_slice(&sealed)
}

/// Unwrap (decrypt) a file key sealed by [`wrap_file_key`].
pub fn unwrap_file_key(wrap_key: &CipherKey, wrapped: &EncryptedFileKey) -> AgeResult<FileKey> {
    let cipher = AeadCipher::new(wrap_key, [0u8; CHUNK_NONCE_SIZE], Direction::Decrypt)?;
    let mut plaintext = cipher
        .decrypt(wrapped.as_bytes()?)
        .inspect_err(|e| debug!(error = %e, "file key unwrap failed"))?;
    let key = FileKey::from_slice(&plaintext);
    plaintext.zeroize();
    key
}

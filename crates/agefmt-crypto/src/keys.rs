//! Typed key wrappers: file key, cipher key, MAC key, encrypted file key
//!
//! Every wrapper validates its length at construction and zeroes its storage
//! on `destroy()` (also run on drop). Reading a destroyed key is an error.

use agefmt_core::format::{
    CIPHER_KEY_SIZE, ENCRYPTED_FILE_KEY_SIZE, FILE_KEY_SIZE, PAYLOAD_NONCE_SIZE,
};
use agefmt_core::{AgeError, AgeResult};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

macro_rules! fixed_key {
    ($(#[$meta:meta])* $name:ident, $size:expr, $kind:literal) => {
        $(#[$meta])*
        pub struct $name {
            bytes: [u8; $size],
            destroyed: bool,
        }

        impl $name {
            pub const SIZE: usize = $size;

            pub fn from_bytes(bytes: [u8; $size]) -> Self {
                Self {
                    bytes,
                    destroyed: false,
                }
            }

            /// Copy key material out of `slice`, rejecting any other length.
            pub fn from_slice(slice: &[u8]) -> AgeResult<Self> {
                let bytes: [u8; $size] =
                    slice.try_into().map_err(|_| AgeError::InvalidKeyLength {
                        kind: $kind,
                        expected: $size,
                        actual: slice.len(),
                    })?;
                Ok(Self::from_bytes(bytes))
            }

            pub fn as_bytes(&self) -> AgeResult<&[u8; $size]> {
                if self.destroyed {
                    return Err(AgeError::KeyDestroyed($kind));
                }
                Ok(&self.bytes)
            }

            /// Zero the key material. Safe to call more than once.
            pub fn destroy(&mut self) {
                self.bytes.zeroize();
                self.destroyed = true;
            }

            pub fn is_destroyed(&self) -> bool {
                self.destroyed
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                self.destroy();
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("bytes", &"[REDACTED]")
                    .field("destroyed", &self.destroyed)
                    .finish()
            }
        }
    };
}

fixed_key!(
    /// The per-file 128-bit secret all other keys are derived from.
    FileKey,
    FILE_KEY_SIZE,
    "file key"
);

fixed_key!(
    /// A ChaCha20-Poly1305 key.
    CipherKey,
    CIPHER_KEY_SIZE,
    "cipher key"
);

fixed_key!(
    /// A file key sealed under a recipient's wrap key: ciphertext followed by the tag.
    EncryptedFileKey,
    ENCRYPTED_FILE_KEY_SIZE,
    "encrypted file key"
);

impl FileKey {
    /// Generate a fresh file key from a cryptographic RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; FILE_KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        let key = Self::from_bytes(bytes);
        bytes.zeroize();
        key
    }
}

/// Generate a random file key from the thread-local RNG.
pub fn generate_file_key() -> FileKey {
    FileKey::generate(&mut rand::thread_rng())
}

/// What a [`MacKey`] is used for; fixes its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacContext {
    /// Header MAC key, output of the header HKDF
    Header,
    /// HKDF pseudorandom key produced by the extract step
    Extracted,
    /// Payload nonce used as the payload HKDF salt
    Nonce,
    /// Explicit HKDF salt
    Salt,
}

impl MacContext {
    pub const fn key_len(self) -> usize {
        match self {
            Self::Header | Self::Extracted | Self::Salt => 32,
            Self::Nonce => PAYLOAD_NONCE_SIZE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Header => "header MAC key",
            Self::Extracted => "extracted MAC key",
            Self::Nonce => "nonce MAC key",
            Self::Salt => "salt MAC key",
        }
    }
}

/// Longest key any [`MacContext`] allows.
const MAC_KEY_MAX: usize = 32;

/// An HMAC-SHA-256 key tagged with its context.
pub struct MacKey {
    bytes: [u8; MAC_KEY_MAX],
    context: MacContext,
    destroyed: bool,
}

impl MacKey {
    pub fn new(context: MacContext, bytes: &[u8]) -> AgeResult<Self> {
        if bytes.len() != context.key_len() {
            return Err(AgeError::InvalidKeyLength {
                kind: context.name(),
                expected: context.key_len(),
                actual: bytes.len(),
            });
        }
        let mut storage = [0u8; MAC_KEY_MAX];
        storage[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: storage,
            context,
            destroyed: false,
        })
    }

    /// The all-zero salt used for the header key.
    pub fn zero_salt() -> Self {
        Self {
            bytes: [0u8; MAC_KEY_MAX],
            context: MacContext::Salt,
            destroyed: false,
        }
    }

    pub fn context(&self) -> MacContext {
        self.context
    }

    pub fn as_bytes(&self) -> AgeResult<&[u8]> {
        if self.destroyed {
            return Err(AgeError::KeyDestroyed(self.context.name()));
        }
        Ok(&self.bytes[..self.context.key_len()])
    }

    /// Zero the key material. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.bytes.zeroize();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for MacKey {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacKey")
            .field("context", &self.context)
            .field("bytes", &"[REDACTED]")
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_file_key_generation() {
        let k1 = generate_file_key();
        let k2 = generate_file_key();
        assert_ne!(
            k1.as_bytes().unwrap(),
            k2.as_bytes().unwrap(),
            "random keys must differ"
        );
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let k1 = FileKey::generate(&mut StdRng::seed_from_u64(7));
        let k2 = FileKey::generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(k1.as_bytes().unwrap(), k2.as_bytes().unwrap());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = FileKey::from_slice(&[0u8; 15]).unwrap_err();
        assert!(matches!(
            err,
            AgeError::InvalidKeyLength {
                kind: "file key",
                expected: 16,
                actual: 15
            }
        ));

        assert!(CipherKey::from_slice(&[0u8; 16]).is_err());
        assert!(EncryptedFileKey::from_slice(&[0u8; 33]).is_err());
        assert!(CipherKey::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_mac_key_length_depends_on_context() {
        assert!(MacKey::new(MacContext::Nonce, &[1u8; 16]).is_ok());
        assert!(MacKey::new(MacContext::Nonce, &[1u8; 32]).is_err());
        assert!(MacKey::new(MacContext::Header, &[1u8; 32]).is_ok());
        assert!(MacKey::new(MacContext::Salt, &[1u8; 16]).is_err());

        let salt = MacKey::zero_salt();
        assert_eq!(salt.context(), MacContext::Salt);
        assert_eq!(salt.as_bytes().unwrap(), &[0u8; 32]);
    }

    #[test]
    fn test_destroy_zeroes_storage() {
        let mut key = FileKey::from_bytes([0xA5; FILE_KEY_SIZE]);
        key.destroy();

        assert!(key.is_destroyed());
        assert_eq!(key.bytes, [0u8; FILE_KEY_SIZE]);
        assert!(matches!(
            key.as_bytes(),
            Err(AgeError::KeyDestroyed("file key"))
        ));

        // idempotent
        key.destroy();
        assert_eq!(key.bytes, [0u8; FILE_KEY_SIZE]);
    }

    #[test]
    fn test_mac_key_destroy_zeroes_storage() {
        let mut key = MacKey::new(MacContext::Header, &[0x5A; 32]).unwrap();
        key.destroy();
        key.destroy();

        assert!(key.is_destroyed());
        assert_eq!(key.bytes, [0u8; MAC_KEY_MAX]);
        assert!(key.as_bytes().is_err());
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let key = CipherKey::from_bytes([0x42; CIPHER_KEY_SIZE]);
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("66"));
    }
}

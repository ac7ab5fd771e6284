//! agefmt-crypto: key hierarchy and symmetric primitives of the age v1 format
//!
//! Key hierarchy:
//! ```text
//! File Key (128-bit, random per file)
//!   ├── Header Key  = HKDF-SHA256(file_key, salt = 0^32,          info = "header")
//!   │   └── HMAC-SHA256 over the header, version line through "---"
//!   └── Payload Key = HKDF-SHA256(file_key, salt = payload nonce, info = "payload")
//!       └── Chunk AEAD: ChaCha20-Poly1305 (nonce = 11-byte counter || last flag)
//! ```
//!
//! Recipient mechanisms wrap the file key with ChaCha20-Poly1305 under their
//! own single-use key and a zero nonce (see [`wrap_file_key`]).

pub mod aead;
pub mod chunk;
pub mod kdf;
pub mod keys;
pub mod nonce;

pub use aead::{unwrap_file_key, wrap_file_key, AeadCipher, Direction};
pub use chunk::{open_chunk, seal_chunk};
pub use kdf::{derive, header_key, hmac_sha256, payload_key, verify_hmac_sha256};
pub use keys::{generate_file_key, CipherKey, EncryptedFileKey, FileKey, MacContext, MacKey};
pub use nonce::ChunkNonce;

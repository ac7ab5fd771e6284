//! Byte-exact constants of the age v1 header and payload framing.

/// First line of every header (without the trailing LF).
pub const VERSION_LINE: &str = "age-encryption.org/v1";

/// Leading token of a recipient stanza line.
pub const STANZA_MARKER: &str = "->";

/// Token that ends the stanza list; the MAC follows on the same line.
pub const TERMINATOR: &str = "---";

/// Size of the header MAC (HMAC-SHA-256 output).
pub const MAC_SIZE: usize = 32;

/// Length of the MAC in unpadded base64.
pub const MAC_B64_LEN: usize = 43;

/// Maximum characters per base64 line in a stanza body.
pub const BODY_LINE_LEN: usize = 64;

/// Size of the per-file symmetric key (128-bit)
pub const FILE_KEY_SIZE: usize = 16;

/// Size of a ChaCha20-Poly1305 key (256-bit)
pub const CIPHER_KEY_SIZE: usize = 32;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// A wrapped file key: 16 bytes of ciphertext followed by the tag.
pub const ENCRYPTED_FILE_KEY_SIZE: usize = FILE_KEY_SIZE + TAG_SIZE;

/// Random nonce written right after the header, used as the payload HKDF salt.
pub const PAYLOAD_NONCE_SIZE: usize = 16;

/// ChaCha20-Poly1305 nonce: 11-byte counter plus the last-chunk flag.
pub const CHUNK_NONCE_SIZE: usize = 12;

/// Bytes of the chunk nonce holding the big-endian counter.
pub const CHUNK_COUNTER_SIZE: usize = CHUNK_NONCE_SIZE - 1;

/// HKDF info string for the header MAC key.
pub const HEADER_KEY_INFO: &[u8] = b"header";

/// HKDF info string for the payload key.
pub const PAYLOAD_KEY_INFO: &[u8] = b"payload";

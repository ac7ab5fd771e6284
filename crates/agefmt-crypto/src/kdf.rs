//! HKDF-SHA256 (RFC 5869) and the two fixed key derivations of the format
//!
//! Every derivation here asks for exactly one 32-byte output block, so the
//! expand step is a single HMAC over `info || 0x01`.

use agefmt_core::format::{HEADER_KEY_INFO, PAYLOAD_KEY_INFO, PAYLOAD_NONCE_SIZE};
use agefmt_core::{AgeError, AgeResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::keys::{CipherKey, FileKey, MacContext, MacKey};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Key an HMAC-SHA-256 instance with the given MAC key.
pub(crate) fn hmac_with(key: &MacKey) -> AgeResult<HmacSha256> {
    let bytes = key.as_bytes()?;
    HmacSha256::new_from_slice(bytes).map_err(|_| AgeError::InvalidKeyLength {
        kind: key.context().name(),
        expected: key.context().key_len(),
        actual: bytes.len(),
    })
}

/// HMAC-SHA-256 tag of `data`.
pub fn hmac_sha256(key: &MacKey, data: &[u8]) -> AgeResult<[u8; 32]> {
    let mut mac = hmac_with(key)?;
    mac.update(data);
    let mut tag = [0u8; 32];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Constant-time check of an HMAC-SHA-256 tag over `data`.
pub fn verify_hmac_sha256(key: &MacKey, data: &[u8], tag: &[u8]) -> AgeResult<bool> {
    let mut mac = hmac_with(key)?;
    mac.update(data);
    Ok(mac.verify_slice(tag).is_ok())
}

/// HKDF extract: `PRK = HMAC(salt, input)`.
pub fn extract(input: &[u8], salt: &MacKey) -> AgeResult<MacKey> {
    let mut mac = hmac_with(salt)?;
    mac.update(input);
    let mut prk = [0u8; 32];
    prk.copy_from_slice(&mac.finalize().into_bytes());
    let extracted = MacKey::new(MacContext::Extracted, &prk);
    prk.zeroize();
    extracted
}

/// One HKDF expand block: `T(1) = HMAC(PRK, info || 0x01)`.
pub fn expand(prk: &MacKey, info: &[u8]) -> AgeResult<[u8; 32]> {
    let mut mac = hmac_with(prk)?;
    mac.update(info);
    mac.update(&[0x01]);
    let mut okm = [0u8; 32];
    okm.copy_from_slice(&mac.finalize().into_bytes());
    Ok(okm)
}

/// Derive 32 bytes from `input` with `salt` and `info`.
pub fn derive(input: &[u8], salt: &MacKey, info: &[u8]) -> AgeResult<CipherKey> {
    let prk = extract(input, salt)?;
    let mut okm = expand(&prk, info)?;
    let key = CipherKey::from_bytes(okm);
    okm.zeroize();
    Ok(key)
}

/// Derive the header MAC key: `HKDF(file_key, salt = 0^32, info = "header")`.
pub fn header_key(file_key: &FileKey) -> AgeResult<MacKey> {
    let derived = derive(file_key.as_bytes()?, &MacKey::zero_salt(), HEADER_KEY_INFO)?;
    MacKey::new(MacContext::Header, derived.as_bytes()?)
}

/// Derive the payload key: `HKDF(file_key, salt = payload nonce, info = "payload")`.
pub fn payload_key(file_key: &FileKey, nonce: &[u8; PAYLOAD_NONCE_SIZE]) -> AgeResult<CipherKey> {
    let salt = MacKey::new(MacContext::Nonce, nonce)?;
    derive(file_key.as_bytes()?, &salt, PAYLOAD_KEY_INFO)
}

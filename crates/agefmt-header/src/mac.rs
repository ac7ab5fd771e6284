//! Header MAC footer: `" " <43-char base64 HMAC-SHA256> "\n"` after `---`
//!
//! The MAC covers the serialized header from the version line through the
//! `---` terminator inclusive, keyed with the header key.

use agefmt_core::format::{MAC_B64_LEN, MAC_SIZE};
use agefmt_core::{AgeError, AgeResult};
use agefmt_crypto::{hmac_sha256, verify_hmac_sha256, MacKey};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};

/// Bytes of the footer after the terminator: space, MAC, LF.
pub const FOOTER_LEN: usize = 1 + MAC_B64_LEN + 1;

/// Compute the MAC over `unauthenticated` and append the footer.
pub fn append_mac(
    unauthenticated: &mut Vec<u8>,
    header_key: &MacKey,
) -> AgeResult<[u8; MAC_SIZE]> {
    let mac = hmac_sha256(header_key, unauthenticated)?;
    unauthenticated.push(b' ');
    unauthenticated.extend_from_slice(STANDARD_NO_PAD.encode(mac).as_bytes());
    unauthenticated.push(b'\n');
    Ok(mac)
}

/// Read the footer at `cursor` (just past `---`).
pub fn read_mac(input: &[u8], cursor: usize) -> AgeResult<([u8; MAC_SIZE], usize)> {
    let rest = &input[cursor..];
    if rest.len() < FOOTER_LEN {
        return Err(AgeError::MacNotFound);
    }
    if rest[0] != b' ' {
        return Err(AgeError::malformed(
            cursor,
            format!("expected space before MAC, found byte 0x{:02x}", rest[0]),
        ));
    }
    if rest[FOOTER_LEN - 1] != b'\n' {
        return Err(AgeError::malformed(
            cursor + FOOTER_LEN - 1,
            format!(
                "expected line feed after MAC, found byte 0x{:02x}",
                rest[FOOTER_LEN - 1]
            ),
        ));
    }

    let decoded = STANDARD_NO_PAD
        .decode(&rest[1..1 + MAC_B64_LEN])
        .map_err(|e| AgeError::malformed(cursor + 1, format!("header MAC: {e}")))?;
    let mac: [u8; MAC_SIZE] = decoded.as_slice().try_into().map_err(|_| {
        AgeError::malformed(
            cursor + 1,
            format!("header MAC is {} bytes, expected {MAC_SIZE}", decoded.len()),
        )
    })?;
    Ok((mac, cursor + FOOTER_LEN))
}

/// Recompute the MAC over `unauthenticated` and compare in constant time.
pub fn verify_mac(unauthenticated: &[u8], mac: &[u8; MAC_SIZE], header_key: &MacKey) -> AgeResult<()> {
    if verify_hmac_sha256(header_key, unauthenticated, mac)? {
        Ok(())
    } else {
        Err(AgeError::HeaderMacMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agefmt_crypto::MacContext;

    fn key() -> MacKey {
        MacKey::new(MacContext::Header, &[3u8; 32]).unwrap()
    }

    #[test]
    fn test_append_then_read() {
        let mut buf = b"age-encryption.org/v1\n---".to_vec();
        let start = buf.len();
        let mac = append_mac(&mut buf, &key()).unwrap();
        assert_eq!(buf.len(), start + FOOTER_LEN);

        let (read, end) = read_mac(&buf, start).unwrap();
        assert_eq!(read, mac);
        assert_eq!(end, buf.len());
        verify_mac(&buf[..start], &read, &key()).unwrap();
    }

    #[test]
    fn test_wrong_key_mismatch() {
        let mut buf = b"age-encryption.org/v1\n---".to_vec();
        let mac = append_mac(&mut buf, &key()).unwrap();
        let other = MacKey::new(MacContext::Header, &[4u8; 32]).unwrap();

        let err = verify_mac(b"age-encryption.org/v1\n---", &mac, &other).unwrap_err();
        assert!(matches!(err, AgeError::HeaderMacMismatch));
    }

    #[test]
    fn test_end_of_buffer_is_mac_not_found() {
        assert!(matches!(read_mac(b"---", 3), Err(AgeError::MacNotFound)));
        assert!(matches!(read_mac(b"--- abc\n", 3), Err(AgeError::MacNotFound)));
    }

    #[test]
    fn test_bad_separators() {
        let mac = STANDARD_NO_PAD.encode([0u8; 32]);
        let no_space = format!("---\n{mac}\n");
        assert!(matches!(
            read_mac(no_space.as_bytes(), 3),
            Err(AgeError::Malformed { offset: 3, .. })
        ));

        let no_lf = format!("--- {mac} ");
        assert!(matches!(
            read_mac(no_lf.as_bytes(), 3),
            Err(AgeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_non_canonical_mac_rejected() {
        let mut mac = STANDARD_NO_PAD.encode([0u8; 32]);
        // last char of a 32-byte encoding carries two zero trailing bits
        mac.pop();
        mac.push('B');
        let footer = format!("--- {mac}\n");
        assert!(read_mac(footer.as_bytes(), 3).is_err());
    }
}

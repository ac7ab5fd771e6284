//! File header: version line, recipient stanzas, terminator, MAC
//!
//! Parsing is a single forward pass over the input with an explicit cursor.
//! Writing is two-phase: serialize everything up to `---`, then MAC those
//! bytes and append the footer.

use agefmt_core::format::{MAC_SIZE, TERMINATOR, VERSION_LINE};
use agefmt_core::{AgeError, AgeResult, HeaderLimits};
use agefmt_crypto::{header_key, FileKey};
use tracing::{trace, warn};

use crate::mac::{append_mac, read_mac, verify_mac};
use crate::stanza::{read_line, Stanza};

/// A parsed header. The MAC is unverified until [`Header::verify_mac`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    stanzas: Vec<Stanza>,
    mac: [u8; MAC_SIZE],
}

impl Header {
    pub fn stanzas(&self) -> &[Stanza] {
        &self.stanzas
    }

    pub fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// Serialize and authenticate a header for `stanzas` under `file_key`.
    pub fn encode(stanzas: Vec<Stanza>, file_key: &FileKey) -> AgeResult<(Self, Vec<u8>)> {
        let mut bytes = unauthenticated_bytes(&stanzas);
        let key = header_key(file_key)?;
        let mac = append_mac(&mut bytes, &key)?;
        trace!(stanzas = stanzas.len(), len = bytes.len(), "encoded header");
        Ok((Self { stanzas, mac }, bytes))
    }

    /// Parse a header from the start of `input` with default limits.
    ///
    /// Returns the header and the offset of the first byte after it.
    pub fn parse(input: &[u8]) -> AgeResult<(Self, usize)> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    pub fn parse_with_limits(input: &[u8], limits: &HeaderLimits) -> AgeResult<(Self, usize)> {
        let (version, mut cursor) = read_line(input, 0)?;
        if version != VERSION_LINE.as_bytes() {
            return Err(AgeError::UnsupportedVersion(
                String::from_utf8_lossy(version).into_owned(),
            ));
        }

        let mut stanzas = Vec::new();
        while let Some((stanza, next)) = Stanza::parse(input, cursor)? {
            if stanzas.len() == limits.max_stanzas {
                return Err(AgeError::TooManyStanzas {
                    limit: limits.max_stanzas,
                });
            }
            stanzas.push(stanza);
            cursor = next;
            check_len(cursor, limits)?;
        }

        if !input[cursor..].starts_with(TERMINATOR.as_bytes()) {
            return Err(match input.get(cursor) {
                Some(b) => AgeError::malformed(
                    cursor,
                    format!("expected stanza or {TERMINATOR:?}, found byte 0x{b:02x}"),
                ),
                None => AgeError::Truncated {
                    needed: TERMINATOR.len(),
                    available: 0,
                },
            });
        }
        cursor += TERMINATOR.len();

        let (mac, end) = read_mac(input, cursor)?;
        check_len(end, limits)?;
        trace!(stanzas = stanzas.len(), len = end, "parsed header");
        Ok((Self { stanzas, mac }, end))
    }

    /// Re-serialize the stanzas and check the MAC under the key derived from `file_key`.
    pub fn verify_mac(&self, file_key: &FileKey) -> AgeResult<()> {
        let key = header_key(file_key)?;
        verify_mac(&unauthenticated_bytes(&self.stanzas), &self.mac, &key).inspect_err(|_| {
            warn!(stanzas = self.stanzas.len(), "header MAC mismatch");
        })
    }
}

/// Version line, stanzas, and terminator: the bytes covered by the MAC.
pub fn unauthenticated_bytes(stanzas: &[Stanza]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + stanzas.len() * 128);
    out.extend_from_slice(VERSION_LINE.as_bytes());
    out.push(b'\n');
    for stanza in stanzas {
        stanza.write_to(&mut out);
    }
    out.extend_from_slice(TERMINATOR.as_bytes());
    out
}

fn check_len(cursor: usize, limits: &HeaderLimits) -> AgeResult<()> {
    if cursor > limits.max_header_len {
        return Err(AgeError::HeaderTooLarge {
            limit: limits.max_header_len,
        });
    }
    Ok(())
}

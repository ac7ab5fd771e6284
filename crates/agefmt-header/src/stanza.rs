//! Recipient stanza model and its line grammar
//!
//! Stanza format:
//! ```text
//! -> <type> [<arg> ...]\n
//! <base64 body, 64 chars per line>\n
//! <final body line, 0..=63 chars>\n
//! ```
//!
//! The body is canonical unpadded base64. A line shorter than 64 characters
//! ends the body, so a body whose encoding fills whole lines is followed by
//! an empty line.

use agefmt_core::format::{BODY_LINE_LEN, STANZA_MARKER};
use agefmt_core::{AgeError, AgeResult};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};

/// One header entry: a recipient type, its arguments, and an opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    tag: String,
    args: Vec<String>,
    body: Vec<u8>,
}

impl Stanza {
    /// Build a stanza, rejecting type or argument tokens that cannot be written.
    pub fn new<S: Into<String>>(tag: S, args: Vec<String>, body: Vec<u8>) -> AgeResult<Self> {
        let tag = tag.into();
        if !is_valid_token(tag.as_bytes()) {
            return Err(AgeError::InvalidStanza(format!("invalid stanza type {tag:?}")));
        }
        if let Some(bad) = args.iter().find(|a| !is_valid_token(a.as_bytes())) {
            return Err(AgeError::InvalidStanza(format!(
                "invalid stanza argument {bad:?}"
            )));
        }
        Ok(Self { tag, args, body })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Append the encoded stanza, including its body lines.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(STANZA_MARKER.as_bytes());
        for token in std::iter::once(&self.tag).chain(&self.args) {
            out.push(b' ');
            out.extend_from_slice(token.as_bytes());
        }
        out.push(b'\n');

        let encoded = STANDARD_NO_PAD.encode(&self.body);
        for line in encoded.as_bytes().chunks(BODY_LINE_LEN) {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        if encoded.len() % BODY_LINE_LEN == 0 {
            out.push(b'\n');
        }
    }

    /// Parse one stanza starting at `cursor`.
    ///
    /// Returns `Ok(None)` when the bytes at `cursor` do not start with the
    /// stanza marker; the caller's cursor is then still positioned before
    /// the unrecognized token.
    pub fn parse(input: &[u8], cursor: usize) -> AgeResult<Option<(Stanza, usize)>> {
        if !input[cursor..].starts_with(STANZA_MARKER.as_bytes()) {
            return Ok(None);
        }

        let (line, mut pos) = read_line(input, cursor)?;
        let mut tokens = line.split(|&b| b == b' ');
        if tokens.next() != Some(STANZA_MARKER.as_bytes()) {
            return Err(AgeError::malformed(
                cursor,
                "stanza marker must be followed by a space",
            ));
        }

        let mut words = Vec::new();
        let mut offset = cursor + STANZA_MARKER.len() + 1;
        for token in tokens {
            if token.is_empty() {
                return Err(AgeError::malformed(
                    offset,
                    "empty stanza token (doubled or trailing space)",
                ));
            }
            if let Some(i) = token.iter().position(|&b| !is_token_byte(b)) {
                return Err(AgeError::malformed(
                    offset + i,
                    format!("invalid byte 0x{:02x} in stanza token", token[i]),
                ));
            }
            // checked printable ASCII above
            words.push(String::from_utf8_lossy(token).into_owned());
            offset += token.len() + 1;
        }
        if words.is_empty() {
            return Err(AgeError::malformed(cursor, "stanza has no type"));
        }
        let tag = words.remove(0);

        let body_start = pos;
        let mut encoded = Vec::new();
        loop {
            let (line, next) = read_line(input, pos)?;
            if line.len() > BODY_LINE_LEN {
                return Err(AgeError::malformed(
                    pos,
                    format!(
                        "stanza body line of {} chars exceeds {BODY_LINE_LEN}",
                        line.len()
                    ),
                ));
            }
            encoded.extend_from_slice(line);
            pos = next;
            if line.len() < BODY_LINE_LEN {
                break;
            }
        }
        let body = STANDARD_NO_PAD
            .decode(&encoded)
            .map_err(|e| AgeError::malformed(body_start, format!("stanza body: {e}")))?;

        Ok(Some((
            Stanza {
                tag,
                args: words,
                body,
            },
            pos,
        )))
    }
}

/// Printable ASCII excluding space.
fn is_token_byte(b: u8) -> bool {
    (0x21..=0x7E).contains(&b)
}

fn is_valid_token(token: &[u8]) -> bool {
    !token.is_empty() && token.iter().all(|&b| is_token_byte(b))
}

/// Return the line at `cursor` (without its LF) and the position after the LF.
pub(crate) fn read_line(input: &[u8], cursor: usize) -> AgeResult<(&[u8], usize)> {
    let rest = &input[cursor..];
    match rest.iter().position(|&b| b == b'\n') {
        Some(end) => Ok((&rest[..end], cursor + end + 1)),
        None => Err(AgeError::Truncated {
            needed: rest.len() + 1,
            available: rest.len(),
        }),
    }
}

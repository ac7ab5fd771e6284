use thiserror::Error;

pub type AgeResult<T> = Result<T, AgeError>;

#[derive(Debug, Error)]
pub enum AgeError {
    #[error("unsupported header version: {0:?}")]
    UnsupportedVersion(String),

    #[error("malformed header at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("invalid stanza: {0}")]
    InvalidStanza(String),

    #[error("truncated input: need {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("header exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },

    #[error("header has more than {limit} stanzas")]
    TooManyStanzas { limit: usize },

    #[error("header MAC not found")]
    MacNotFound,

    #[error("header MAC verification failed")]
    HeaderMacMismatch,

    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("stanza reader produced no file key")]
    NoFileKey,

    #[error("{mechanism} recipient: {reason}")]
    Recipient { mechanism: String, reason: String },

    #[error("no supported recipient found ({} tried)", .causes.len())]
    NoSupportedRecipient { causes: Vec<AgeError> },

    #[error("no recipients configured")]
    NoRecipients,

    #[error("buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} has been destroyed")]
    KeyDestroyed(&'static str),

    #[error("chunk counter exhausted")]
    CounterExhausted,

    #[error("chunk nonce already marked as last chunk")]
    NonceFinalized,

    #[error("cipher initialized for {0}")]
    WrongDirection(&'static str),

    #[error("config error: {0}")]
    Config(String),
}

impl AgeError {
    /// Malformed-input error pointing at `offset` in the header.
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    /// Shorthand for a failure reported by an external recipient mechanism.
    pub fn recipient(mechanism: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Recipient {
            mechanism: mechanism.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the input bytes are not a well-formed header
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedVersion(_)
                | Self::Malformed { .. }
                | Self::InvalidStanza(_)
                | Self::Truncated { .. }
                | Self::HeaderTooLarge { .. }
                | Self::TooManyStanzas { .. }
                | Self::MacNotFound
        )
    }

    /// Returns true if a MAC or AEAD tag did not verify
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::HeaderMacMismatch | Self::DecryptionFailed)
    }

    /// Per-reader failures carried by [`AgeError::NoSupportedRecipient`], in reader order.
    pub fn causes(&self) -> &[AgeError] {
        match self {
            Self::NoSupportedRecipient { causes } => causes,
            _ => &[],
        }
    }
}

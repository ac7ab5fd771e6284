//! A symmetric test recipient: the wrap key is HKDF(secret, salt, "test-wrap")
//! with a fresh salt per file, carried as the second stanza argument.

use agefmt_core::{AgeError, AgeResult};
use agefmt_crypto::{
    derive, unwrap_file_key, wrap_file_key, CipherKey, EncryptedFileKey, FileKey, MacContext,
    MacKey,
};
use agefmt_header::{Stanza, StanzaReader, StanzaWriter};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rand::RngCore;

pub const TAG: &str = "test";

pub struct TestRecipient {
    label: String,
    secret: [u8; 32],
}

impl TestRecipient {
    pub fn new(label: &str, secret: u8) -> Self {
        Self {
            label: label.to_string(),
            secret: [secret; 32],
        }
    }

    fn wrap_key(&self, salt: &[u8]) -> AgeResult<CipherKey> {
        let salt = MacKey::new(MacContext::Salt, salt)?;
        derive(&self.secret, &salt, b"test-wrap")
    }
}

impl StanzaWriter for TestRecipient {
    fn recipient_stanzas(&self, file_key: &FileKey) -> AgeResult<Vec<Stanza>> {
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        let wrapped = wrap_file_key(&self.wrap_key(&salt)?, file_key)?;
        let stanza = Stanza::new(
            TAG,
            vec![self.label.clone(), STANDARD_NO_PAD.encode(salt)],
            wrapped.as_bytes()?.to_vec(),
        )?;
        Ok(vec![stanza])
    }
}

impl StanzaReader for TestRecipient {
    fn file_key(&self, stanzas: &[Stanza]) -> AgeResult<Option<FileKey>> {
        for stanza in stanzas {
            if stanza.tag() != TAG || stanza.args().len() != 2 || stanza.args()[0] != self.label {
                continue;
            }
            let salt = STANDARD_NO_PAD
                .decode(&stanza.args()[1])
                .map_err(|e| AgeError::recipient(TAG, format!("bad salt: {e}")))?;
            let wrapped = EncryptedFileKey::from_slice(stanza.body())?;
            return unwrap_file_key(&self.wrap_key(&salt)?, &wrapped).map(Some);
        }
        Err(AgeError::recipient(
            self.label.as_str(),
            "no matching stanza",
        ))
    }
}

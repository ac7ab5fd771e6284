//! Per-chunk nonce for the payload stream
//!
//! Layout:
//! ```text
//! [11 bytes: big-endian chunk counter][1 byte: last-chunk flag]
//! ```
//!
//! The first chunk uses the all-zero nonce. The counter must never wrap, and
//! once the last-chunk flag is set the nonce is spent.

use agefmt_core::format::{CHUNK_COUNTER_SIZE, CHUNK_NONCE_SIZE};
use agefmt_core::{AgeError, AgeResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkNonce {
    bytes: [u8; CHUNK_NONCE_SIZE],
}

impl ChunkNonce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8; CHUNK_NONCE_SIZE] {
        &self.bytes
    }

    /// Add one to the counter, carrying from byte 10 leftwards.
    ///
    /// Fails without touching the state if the counter is all `0xFF` or the
    /// last-chunk flag is already set.
    pub fn increment(&mut self) -> AgeResult<()> {
        if self.is_last_chunk() {
            return Err(AgeError::NonceFinalized);
        }
        let counter = &mut self.bytes[..CHUNK_COUNTER_SIZE];
        if counter.iter().all(|&b| b == 0xFF) {
            return Err(AgeError::CounterExhausted);
        }
        for byte in counter.iter_mut().rev() {
            let (next, carry) = byte.overflowing_add(1);
            *byte = next;
            if !carry {
                break;
            }
        }
        Ok(())
    }

    /// Mark this nonce as belonging to the final chunk. Allowed once.
    pub fn set_last_chunk_flag(&mut self) -> AgeResult<()> {
        if self.is_last_chunk() {
            return Err(AgeError::NonceFinalized);
        }
        self.bytes[CHUNK_COUNTER_SIZE] = 1;
        Ok(())
    }

    /// True once any counter byte is non-zero.
    pub fn is_not_first_chunk(&self) -> bool {
        self.bytes[..CHUNK_COUNTER_SIZE].iter().any(|&b| b != 0)
    }

    pub fn is_last_chunk(&self) -> bool {
        self.bytes[CHUNK_COUNTER_SIZE] == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_counter(counter: [u8; CHUNK_COUNTER_SIZE]) -> ChunkNonce {
        let mut bytes = [0u8; CHUNK_NONCE_SIZE];
        bytes[..CHUNK_COUNTER_SIZE].copy_from_slice(&counter);
        ChunkNonce { bytes }
    }

    #[test]
    fn test_starts_zeroed() {
        let nonce = ChunkNonce::new();
        assert_eq!(nonce.as_bytes(), &[0u8; 12]);
        assert!(!nonce.is_not_first_chunk());
        assert!(!nonce.is_last_chunk());
    }

    #[test]
    fn test_increment_big_endian() {
        let mut nonce = ChunkNonce::new();
        nonce.increment().unwrap();
        assert_eq!(nonce.as_bytes()[10], 1);
        assert!(nonce.is_not_first_chunk());

        nonce.increment().unwrap();
        assert_eq!(nonce.as_bytes()[10], 2);
        assert_eq!(nonce.as_bytes()[11], 0);
    }

    #[test]
    fn test_increment_carries() {
        let mut counter = [0u8; CHUNK_COUNTER_SIZE];
        counter[9] = 0x01;
        counter[10] = 0xFF;
        let mut nonce = with_counter(counter);

        nonce.increment().unwrap();
        assert_eq!(&nonce.as_bytes()[8..], &[0x00, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_counter_exhausted_does_not_wrap() {
        let mut nonce = with_counter([0xFF; CHUNK_COUNTER_SIZE]);
        assert!(matches!(nonce.increment(), Err(AgeError::CounterExhausted)));
        // state untouched
        assert_eq!(&nonce.as_bytes()[..CHUNK_COUNTER_SIZE], &[0xFF; 11]);
        assert!(nonce.is_not_first_chunk());
    }

    #[test]
    fn test_one_below_max_increments_to_max() {
        let mut counter = [0xFF; CHUNK_COUNTER_SIZE];
        counter[10] = 0xFE;
        let mut nonce = with_counter(counter);

        nonce.increment().unwrap();
        assert!(matches!(nonce.increment(), Err(AgeError::CounterExhausted)));
    }

    #[test]
    fn test_last_chunk_flag() {
        let mut nonce = ChunkNonce::new();
        nonce.increment().unwrap();
        nonce.set_last_chunk_flag().unwrap();

        assert!(nonce.is_last_chunk());
        assert_eq!(nonce.as_bytes()[11], 1);
        assert_eq!(nonce.as_bytes()[10], 1);
    }

    #[test]
    fn test_finalized_nonce_is_spent() {
        let mut nonce = ChunkNonce::new();
        nonce.set_last_chunk_flag().unwrap();

        assert!(matches!(
            nonce.set_last_chunk_flag(),
            Err(AgeError::NonceFinalized)
        ));
        assert!(matches!(nonce.increment(), Err(AgeError::NonceFinalized)));
        // single-chunk file: counter stays zero
        assert!(!nonce.is_not_first_chunk());
    }
}

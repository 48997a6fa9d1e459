//! State Hashing for Verification
//!
//! Provides deterministic fingerprints of a game session for:
//! - Replay validation
//! - Checking that rejected or no-op moves left the session untouched

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for session state.
///
/// Wraps SHA-256 with typed helpers. Order of updates is part of the hash.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for session state.
    pub fn for_session_state() -> Self {
        Self::new(b"TWENTY48_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute the state hash of a session.
///
/// Called by `GameSession::compute_hash()`; the closure adds the
/// session-specific data after the move count and seed.
pub fn compute_state_hash<F>(move_count: u32, seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_session_state();

    hasher.update_u32(move_count);
    hasher.update_u64(seed);

    add_state(&mut hasher);

    hasher.finalize()
}

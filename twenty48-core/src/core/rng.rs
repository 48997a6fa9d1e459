//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ for fast, deterministic randomness.
//! Given the same seed, tile spawns are identical on all platforms,
//! which is what makes recorded games replayable.

use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

/// Deterministic PRNG using the Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use twenty48::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // same on every platform
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// SplitMix64 expands the seed so that small sequential seeds still
    /// produce well-spread initial states.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Xorshift never leaves the all-zero state
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Next raw 64-bit output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    ///
    /// Returns 0 without advancing the state when `max` is 0.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Modulo bias is negligible for the tiny ranges used here
        (self.next_u64() % max as u64) as u32
    }

    /// Return true with the given probability, expressed in percent.
    ///
    /// `0` never fires, `100` (or more) always fires. One value is drawn
    /// from the stream either way.
    #[inline]
    pub fn next_percent_chance(&mut self, percent: u8) -> bool {
        self.next_int(100) < u32::from(percent)
    }

    /// Uniformly pick one element.
    ///
    /// An empty slice yields `None` and leaves the state untouched.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_int(slice.len() as u32) as usize;
            Some(&slice[idx])
        }
    }

    /// Raw generator state, folded into the session hash.
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

/// SplitMix64 step, expands one seed into the two state words.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a session seed from a human-readable label.
///
/// The same `(label, nonce)` pair always yields the same seed, so a player
/// can share "seed: alice/3" instead of a 20-digit number.
pub fn derive_session_seed(label: &[u8], nonce: u64) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"TWENTY48_SEED_V1");
    hasher.update(label);
    hasher.update(nonce.to_le_bytes());

    let hash = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[0..8]);
    u64::from_le_bytes(seed)
}

// =============================================================================
// TESTS
// =============================================================================

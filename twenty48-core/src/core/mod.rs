//! Core deterministic primitives.
//!
//! Randomness and hashing that every replayable session builds on.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, derive_session_seed};
pub use hash::{StateHash, StateHasher, compute_state_hash};

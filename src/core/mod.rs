//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism: an outcome roll replayed with the same seed yields the
//! same result everywhere.

pub mod rng;

pub use rng::{derive_session_seed, DeterministicRng, BPS_SCALE};

//! Golden Eggs Game Server
//!
//! Server-authoritative engine for the egg-cracking game: players buy
//! eggs, crack them against weighted odds, and bank wins by storing or
//! cashing out. All outcome resolution happens server-side from a
//! deterministic per-session RNG.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │            Network Layer            │
//! │   (axum HTTP, sessions, journal)    │
//! ├─────────────────────────────────────┤
//! │             Game Logic              │
//! │  (session machine, resolver, eggs,  │
//! │        store, history ledger)       │
//! ├─────────────────────────────────────┤
//! │          Deterministic Core         │
//! │       (RNG, seed derivation)        │
//! └─────────────────────────────────────┘
//! ```
//!
//! The game layer is pure and synchronous; every side effect (HTTP,
//! journal writes, logging) lives in the network layer around it.

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use game::action::{Action, ActionOutcome, LastOutcome};
pub use game::egg::{Currency, Egg, EggType, EggUid};
pub use game::ledger::{HistoryEntry, HistoryLedger, OutcomeStatus};
pub use game::resolver::{Outcome, ResolverConfig};
pub use game::session::{GameError, GameSession, Mode};
pub use game::store::{EggStore, Source};
pub use network::server::{serve, ServerConfig};

// =============================================================================
// GAME CONSTANTS
// =============================================================================

/// Crack attempts per egg.
pub const MAX_TRIES: u8 = 5;

/// Capacity of the stored-egg pool.
pub const MAX_STORED: usize = 3;

/// Default bonus (2x) win probability, in basis points (1%).
pub const DEFAULT_BONUS_CHANCE_BPS: u32 = 100;

/// Default plain win probability, in basis points (49%).
pub const DEFAULT_WIN_CHANCE_BPS: u32 = 4_900;

/// Balance a fresh session starts with.
pub const STARTING_BALANCE: Currency = 1_000;

/// Ring capacity of the main history ledger.
pub const HISTORY_CAPACITY: usize = 200;

/// Ring capacity of the cashout-only history view.
pub const CASHOUT_HISTORY_CAPACITY: usize = 20;

/// Display currency code.
pub const CURRENCY: &str = "RM";

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Game Logic
//!
//! Pure, deterministic egg-lifecycle logic with no I/O: entities, pools,
//! outcome resolution, history, and the session state machine that ties
//! them together. The network layer drives this module and performs all
//! side effects around it.

pub mod action;
pub mod egg;
pub mod ledger;
pub mod resolver;
pub mod session;
pub mod store;

pub use action::{Action, ActionOutcome, LastOutcome};
pub use egg::{Currency, Egg, EggType, EggUid};
pub use ledger::{HistoryEntry, HistoryLedger, OutcomeStatus};
pub use resolver::{resolve, Outcome, ResolverConfig};
pub use session::{GameError, GameSession, Mode, StagedAction};
pub use store::{EggStore, Source, StoreError};

//! Session State Machine
//!
//! Top-level controller for one player's session: tracks the active egg,
//! the home/play mode, the cooperative lock, and the per-session balance,
//! and orchestrates the resolver, the egg store, and the history ledger
//! in response to actions.
//!
//! Actions run in two phases so a collaborator failure (journal append,
//! response write) never leaves a half-applied transition:
//!
//! 1. `stage(action)` validates every precondition, resolves any random
//!    outcome, and takes the lock. No session state changes.
//! 2. `commit(staged)` applies the mutation and releases the lock, or
//!    `abort(staged)` discards the staged work (restoring the RNG
//!    checkpoint) and releases the lock.
//!
//! `apply(action)` is the stage+commit shorthand for callers with no
//! external I/O between the phases. While an action is staged the session
//! is locked and any further `stage`/`apply` is rejected with `Busy`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::game::action::{Action, ActionOutcome, LastOutcome};
use crate::game::egg::{Currency, Egg, EggType, EggUid};
use crate::game::ledger::{HistoryEntry, HistoryLedger, OutcomeStatus};
use crate::game::resolver::{resolve, Outcome, ResolverConfig};
use crate::game::store::{EggStore, Source, StoreError};
use crate::STARTING_BALANCE;

// =============================================================================
// ERRORS
// =============================================================================

/// Session-level errors. All are detected before any mutation; a failed
/// action leaves the session exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Stored pool is at capacity.
    #[error("storage is full")]
    StorageFull,

    /// The egg is already in the stored pool.
    #[error("egg is already stored")]
    AlreadyStored,

    /// The action requires an active egg and none is selected.
    #[error("no active egg")]
    NoActiveEgg,

    /// The named egg exists in neither pool.
    #[error("egg not found")]
    EggNotFound,

    /// Crack attempted beyond the try cap.
    #[error("egg has reached its try limit")]
    MaxTriesReached,

    /// An action is already staged; the session is locked.
    #[error("session is busy")]
    Busy,

    /// The action names an egg that is not the active one.
    #[error("egg is not the active egg")]
    WrongEgg,

    /// A buy arrived while an egg is already active.
    #[error("an egg is already active")]
    EggAlreadyActive,
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StorageFull => GameError::StorageFull,
            StoreError::AlreadyStored => GameError::AlreadyStored,
            StoreError::NotFound => GameError::EggNotFound,
        }
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Coarse UI mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No active egg; browsing the shop/inventory.
    Home,
    /// An egg is active and playable.
    Play,
}

/// Reference to the currently active egg and the pool that holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEgg {
    pub uid: EggUid,
    pub source: Source,
}

/// A validated action waiting for `commit` or `abort`.
///
/// Holding one of these means the session lock is taken. Not `Clone`:
/// there is at most one staged action per session at a time.
#[derive(Debug)]
pub struct StagedAction {
    action: Action,
    outcome: Option<Outcome>,
    rng_checkpoint: [u64; 2],
}

impl StagedAction {
    /// The staged action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The resolved crack outcome, when the action is a crack.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
}

/// One player's session: egg pools, history, balance, RNG, lock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    mode: Mode,
    store: EggStore,
    ledger: HistoryLedger,
    active: Option<ActiveEgg>,
    locked: bool,
    last_outcome: LastOutcome,
    balance: Currency,
    config: ResolverConfig,
    rng: DeterministicRng,
}

impl GameSession {
    /// Create a fresh session with default odds and the starting balance.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, ResolverConfig::default())
    }

    /// Create a fresh session with explicit odds.
    pub fn with_config(seed: u64, config: ResolverConfig) -> Self {
        Self {
            mode: Mode::Home,
            store: EggStore::new(),
            ledger: HistoryLedger::new(),
            active: None,
            locked: false,
            last_outcome: LastOutcome::None,
            balance: STARTING_BALANCE,
            config,
            rng: DeterministicRng::new(seed),
        }
    }

    // ==== ACCESSORS ====

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn balance(&self) -> Currency {
        self.balance
    }

    pub fn last_outcome(&self) -> LastOutcome {
        self.last_outcome
    }

    pub fn egg_store(&self) -> &EggStore {
        &self.store
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// The active egg reference, if any.
    pub fn active(&self) -> Option<ActiveEgg> {
        self.active
    }

    /// The active egg itself, if any.
    pub fn active_egg(&self) -> Option<&Egg> {
        self.active
            .and_then(|a| self.store.find(a.uid, a.source))
    }

    /// Odds configuration, mutable for force-flag overrides.
    pub fn config_mut(&mut self) -> &mut ResolverConfig {
        &mut self.config
    }

    // ==== TWO-PHASE ACTION API ====

    /// Validate an action and take the session lock.
    ///
    /// For cracks this also draws the outcome roll; the RNG position is
    /// checkpointed so `abort` rewinds it. On any error the session is
    /// untouched and the lock is not taken.
    pub fn stage(&mut self, action: Action) -> Result<StagedAction, GameError> {
        if self.locked {
            return Err(GameError::Busy);
        }

        let rng_checkpoint = self.rng.state();
        let mut outcome = None;

        match action {
            Action::Buy { .. } => {
                // Buy is only valid with no active egg; switching eggs goes
                // through store/cashout/selectTab first.
                if self.active.is_some() {
                    return Err(GameError::EggAlreadyActive);
                }
                if self.store.storage_full() {
                    return Err(GameError::StorageFull);
                }
            }
            Action::Crack { egg_uid } => {
                let egg = self.require_active(egg_uid)?;
                if !egg.can_crack() {
                    return Err(GameError::MaxTriesReached);
                }
                let bet = egg.bet_amount;
                outcome = Some(resolve(bet, &self.config, &mut self.rng));
            }
            Action::Store { egg_uid } => {
                // Idempotence guard first: re-storing a parked egg is its
                // own error even when no egg is active.
                if self.store.locate(egg_uid) == Some(Source::Stored) {
                    return Err(GameError::AlreadyStored);
                }
                self.require_active(egg_uid)?;
                if self.store.storage_full() {
                    return Err(GameError::StorageFull);
                }
            }
            Action::Cashout { egg_uid } | Action::Redeem { egg_uid } => {
                self.require_active(egg_uid)?;
            }
            Action::Retrieve { egg_uid } => {
                let egg = self
                    .store
                    .find(egg_uid, Source::Stored)
                    .ok_or(GameError::EggNotFound)?;
                if egg.maxed_out {
                    return Err(GameError::MaxTriesReached);
                }
                self.ensure_can_park_active()?;
            }
            Action::SelectTab { .. } => {
                self.ensure_can_park_active()?;
            }
        }

        self.locked = true;
        Ok(StagedAction {
            action,
            outcome,
            rng_checkpoint,
        })
    }

    /// Apply a staged action and release the lock.
    pub fn commit(&mut self, staged: StagedAction) -> Result<ActionOutcome, GameError> {
        let result = self.commit_inner(&staged);
        self.locked = false;
        result
    }

    /// Discard a staged action: rewind the RNG and release the lock.
    pub fn abort(&mut self, staged: StagedAction) {
        self.rng.set_state(staged.rng_checkpoint);
        self.locked = false;
        debug!(action = ?staged.action, "staged action aborted");
    }

    /// Stage and commit in one call.
    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome, GameError> {
        let staged = self.stage(action)?;
        self.commit(staged)
    }

    // ==== TRANSITIONS ====

    fn commit_inner(&mut self, staged: &StagedAction) -> Result<ActionOutcome, GameError> {
        match staged.action {
            Action::Buy { egg_type } => self.commit_buy(egg_type),
            Action::Crack { egg_uid } => {
                let outcome = staged.outcome.ok_or(GameError::NoActiveEgg)?;
                self.commit_crack(egg_uid, outcome)
            }
            Action::Store { egg_uid } => self.commit_store(egg_uid),
            Action::Cashout { egg_uid } => {
                self.commit_payout(egg_uid, OutcomeStatus::Redeemed, LastOutcome::Cashout)
                    .map(|(uid, amount)| ActionOutcome::CashedOut { egg_uid: uid, amount })
            }
            Action::Redeem { egg_uid } => {
                self.commit_payout(egg_uid, OutcomeStatus::Redeemed, LastOutcome::Redeemed)
                    .map(|(uid, amount)| ActionOutcome::Redeemed { egg_uid: uid, amount })
            }
            Action::Retrieve { egg_uid } => self.commit_retrieve(egg_uid),
            Action::SelectTab { egg_type } => self.commit_select_tab(egg_type),
        }
    }

    fn commit_buy(&mut self, egg_type: EggType) -> Result<ActionOutcome, GameError> {
        let uid = self.store.create(egg_type);
        self.active = Some(ActiveEgg {
            uid,
            source: Source::Purchased,
        });
        self.mode = Mode::Play;
        debug!(egg = %uid.to_uuid_string(), egg_type = egg_type.as_str(), "egg bought");

        Ok(ActionOutcome::Bought {
            egg_uid: uid,
            egg_type,
        })
    }

    fn commit_crack(&mut self, egg_uid: EggUid, outcome: Outcome) -> Result<ActionOutcome, GameError> {
        let active = self.active.ok_or(GameError::NoActiveEgg)?;
        let egg = self
            .store
            .find_mut(egg_uid, active.source)
            .ok_or(GameError::EggNotFound)?;

        let egg_type = egg.egg_type;
        let bet_wagered = egg.bet_amount;

        let (maxed_out, destroyed) = if outcome.did_win {
            (egg.apply_win(outcome.win_amount), false)
        } else {
            egg.apply_loss();
            (false, true)
        };
        let tries = egg.tries;
        let bet_after = egg.bet_amount;

        // Balance moves by the wager and the payout on every crack,
        // floored at zero.
        self.balance = self
            .balance
            .saturating_add(outcome.win_amount)
            .saturating_sub(bet_wagered);

        let status = if outcome.did_win {
            OutcomeStatus::Success
        } else {
            OutcomeStatus::Fail
        };
        self.ledger.record(HistoryEntry::now(
            status,
            egg_type,
            bet_wagered,
            outcome.win_amount,
        ));

        if destroyed {
            self.store.remove(egg_uid);
            self.active = None;
            self.mode = Mode::Home;
            self.last_outcome = LastOutcome::Lose;
        } else if maxed_out {
            // A maxed egg is retired: parked in storage when there is room,
            // left in the purchased pool otherwise. Deactivated either way.
            if active.source == Source::Purchased {
                match self.store.move_to_stored(egg_uid) {
                    Ok(()) | Err(StoreError::StorageFull) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            self.active = None;
            self.mode = Mode::Home;
            self.last_outcome = LastOutcome::Win;
        } else {
            self.last_outcome = if outcome.did_win {
                LastOutcome::Win
            } else {
                LastOutcome::Lose
            };
        }

        debug!(
            egg = %egg_uid.to_uuid_string(),
            win = outcome.did_win,
            bonus = outcome.is_bonus,
            amount = outcome.win_amount,
            tries,
            "crack resolved"
        );

        Ok(ActionOutcome::Cracked {
            egg_uid,
            egg_type,
            outcome,
            tries,
            level: tries.max(1),
            bet_amount: bet_after,
            destroyed,
            maxed_out,
        })
    }

    fn commit_store(&mut self, egg_uid: EggUid) -> Result<ActionOutcome, GameError> {
        self.store.move_to_stored(egg_uid)?;
        self.active = None;
        self.mode = Mode::Home;
        self.last_outcome = LastOutcome::Stored;
        Ok(ActionOutcome::Stored { egg_uid })
    }

    fn commit_payout(
        &mut self,
        egg_uid: EggUid,
        status: OutcomeStatus,
        last: LastOutcome,
    ) -> Result<(EggUid, Currency), GameError> {
        let active = self.active.ok_or(GameError::NoActiveEgg)?;
        let egg = self
            .store
            .find(egg_uid, active.source)
            .ok_or(GameError::EggNotFound)?;

        // Payout is the egg's current bet value, not its last win.
        let amount = egg.bet_amount;
        let egg_type = egg.egg_type;

        self.balance = self.balance.saturating_add(amount);
        self.ledger
            .record(HistoryEntry::now(status, egg_type, amount, amount));
        self.store.remove(egg_uid);
        self.active = None;
        self.mode = Mode::Home;
        self.last_outcome = last;
        debug!(egg = %egg_uid.to_uuid_string(), amount, "egg redeemed");

        Ok((egg_uid, amount))
    }

    fn commit_retrieve(&mut self, egg_uid: EggUid) -> Result<ActionOutcome, GameError> {
        self.park_active()?;

        if self.store.find(egg_uid, Source::Stored).is_none() {
            return Err(GameError::EggNotFound);
        }
        self.active = Some(ActiveEgg {
            uid: egg_uid,
            source: Source::Stored,
        });
        self.mode = Mode::Play;
        Ok(ActionOutcome::Retrieved { egg_uid })
    }

    fn commit_select_tab(&mut self, egg_type: EggType) -> Result<ActionOutcome, GameError> {
        let stored_egg = self.park_active()?;
        self.mode = Mode::Home;
        Ok(ActionOutcome::TabSelected {
            egg_type,
            stored_egg,
        })
    }

    // ==== HELPERS ====

    /// The active egg, checked against the uid the action names.
    fn require_active(&self, egg_uid: EggUid) -> Result<&Egg, GameError> {
        let active = self.active.ok_or(GameError::NoActiveEgg)?;
        if active.uid != egg_uid {
            return Err(GameError::WrongEgg);
        }
        self.store
            .find(active.uid, active.source)
            .ok_or(GameError::EggNotFound)
    }

    /// Stage-time check that `park_active` cannot fail at commit time.
    fn ensure_can_park_active(&self) -> Result<(), GameError> {
        if let Some(active) = self.active {
            if active.source == Source::Purchased && self.store.storage_full() {
                return Err(GameError::StorageFull);
            }
        }
        Ok(())
    }

    /// Park the active egg in storage (stored-sourced eggs are already
    /// parked) and clear the active reference. Returns the uid that was
    /// moved into storage, if any.
    fn park_active(&mut self) -> Result<Option<EggUid>, GameError> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };
        if active.source == Source::Purchased {
            self.store.move_to_stored(active.uid)?;
            self.last_outcome = LastOutcome::Stored;
            return Ok(Some(active.uid));
        }
        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================

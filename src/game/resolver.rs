//! Outcome Resolver
//!
//! Decides win/lose/bonus and the payout for one crack. Bonus and win are
//! compared against the *same* uniform roll, so the bonus region is always
//! a subset of the win region: a bonus can never land on a losing crack.
//!
//! Each call draws exactly one roll from the injected RNG and keeps no
//! other state, so a session's outcomes replay exactly from its seed.

use serde::{Deserialize, Serialize};

use crate::core::rng::{DeterministicRng, BPS_SCALE};
use crate::game::egg::Currency;
use crate::{DEFAULT_BONUS_CHANCE_BPS, DEFAULT_WIN_CHANCE_BPS};

/// Odds configuration for the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Probability of a bonus (2x) win, in basis points.
    pub bonus_chance_bps: u32,
    /// Probability of a plain win, in basis points. Total win probability
    /// is `bonus_chance_bps + win_chance_bps`.
    pub win_chance_bps: u32,
    /// Force every crack to win (testing/demo override).
    pub force_win: bool,
    /// Force every win to be a bonus (testing/demo override).
    pub force_bonus: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bonus_chance_bps: DEFAULT_BONUS_CHANCE_BPS,
            win_chance_bps: DEFAULT_WIN_CHANCE_BPS,
            force_win: false,
            force_bonus: false,
        }
    }
}

impl ResolverConfig {
    /// Total win probability in basis points, clamped to 100%.
    pub fn total_win_bps(&self) -> u32 {
        (self.bonus_chance_bps + self.win_chance_bps).min(BPS_SCALE)
    }
}

/// Result of resolving one crack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Did the crack pay out at all?
    pub did_win: bool,
    /// Was the 2x bonus multiplier applied? Implies `did_win`.
    pub is_bonus: bool,
    /// Payout: `bet` on a plain win, `2 * bet` on a bonus, 0 on a loss.
    pub win_amount: Currency,
}

impl Outcome {
    /// A losing outcome.
    pub const LOSE: Outcome = Outcome {
        did_win: false,
        is_bonus: false,
        win_amount: 0,
    };
}

/// Resolve one crack against the configured odds.
///
/// Draws a single uniform roll in `[0, BPS_SCALE)`:
/// - win when `roll < bonus + win` (or forced),
/// - bonus when `roll < bonus` (or forced, but never on a loss).
pub fn resolve(bet_amount: Currency, config: &ResolverConfig, rng: &mut DeterministicRng) -> Outcome {
    let roll = rng.roll_bps();

    let did_win = config.force_win || roll < config.total_win_bps();
    let is_bonus = if config.force_bonus {
        did_win
    } else {
        did_win && roll < config.bonus_chance_bps
    };

    let win_amount = if did_win {
        bet_amount.saturating_mul(if is_bonus { 2 } else { 1 })
    } else {
        0
    };

    Outcome {
        did_win,
        is_bonus,
        win_amount,
    }
}

// =============================================================================
// TESTS
// =============================================================================

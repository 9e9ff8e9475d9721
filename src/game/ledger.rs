//! History Ledger
//!
//! Append-only record of completed actions, newest first. The main ledger
//! is a capped ring (oldest entries fall off past `HISTORY_CAPACITY`); a
//! secondary cashout-only view keeps the most recent
//! `CASHOUT_HISTORY_CAPACITY` payouts for display.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::egg::{Currency, EggType};
use crate::{CASHOUT_HISTORY_CAPACITY, HISTORY_CAPACITY};

/// Status code of a completed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutcomeStatus {
    /// Losing crack.
    Fail = 0,
    /// Winning crack.
    Success = 1,
    /// Cashout or redeem.
    Redeemed = 2,
}

impl OutcomeStatus {
    /// Numeric wire code (0/1/2).
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One completed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What happened.
    pub status: OutcomeStatus,
    /// Type of the egg involved.
    pub egg_type: EggType,
    /// Bet at the time of the action.
    pub bet_amount: Currency,
    /// Payout (0 for losses).
    pub win_amount: Currency,
    /// When the action completed.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn now(
        status: OutcomeStatus,
        egg_type: EggType,
        bet_amount: Currency,
        win_amount: Currency,
    ) -> Self {
        Self {
            status,
            egg_type,
            bet_amount,
            win_amount,
            timestamp: Utc::now(),
        }
    }
}

/// Capped, newest-first action history for one session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
    cashouts: VecDeque<HistoryEntry>,
}

impl HistoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed action at the front of the ledger.
    ///
    /// Redeemed entries are mirrored into the cashout view. Both sequences
    /// drop their oldest entry once at capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        if entry.status == OutcomeStatus::Redeemed {
            self.cashouts.push_front(entry.clone());
            self.cashouts.truncate(CASHOUT_HISTORY_CAPACITY);
        }
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// All entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Cashout/redeem entries only, newest first.
    pub fn cashouts(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.cashouts.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: OutcomeStatus, win: Currency) -> HistoryEntry {
        HistoryEntry::now(status, EggType::Gold, 100, win)
    }

    #[test]
    fn test_newest_first() {
        let mut ledger = HistoryLedger::new();
        ledger.record(entry(OutcomeStatus::Fail, 0));
        ledger.record(entry(OutcomeStatus::Success, 100));

        let statuses: Vec<_> = ledger.entries().map(|e| e.status).collect();
        assert_eq!(statuses, vec![OutcomeStatus::Success, OutcomeStatus::Fail]);
    }

    #[test]
    fn test_main_ledger_capped() {
        let mut ledger = HistoryLedger::new();
        for i in 0..(HISTORY_CAPACITY + 50) {
            ledger.record(entry(OutcomeStatus::Success, i as Currency));
        }
        assert_eq!(ledger.len(), HISTORY_CAPACITY);

        // Newest entry survives, oldest fell off
        let newest = ledger.entries().next().unwrap();
        assert_eq!(newest.win_amount, (HISTORY_CAPACITY + 49) as Currency);
    }

    #[test]
    fn test_cashout_view_only_redeems() {
        let mut ledger = HistoryLedger::new();
        ledger.record(entry(OutcomeStatus::Success, 100));
        ledger.record(entry(OutcomeStatus::Redeemed, 400));
        ledger.record(entry(OutcomeStatus::Fail, 0));

        let cashouts: Vec<_> = ledger.cashouts().collect();
        assert_eq!(cashouts.len(), 1);
        assert_eq!(cashouts[0].win_amount, 400);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_cashout_view_capped() {
        let mut ledger = HistoryLedger::new();
        for i in 0..(CASHOUT_HISTORY_CAPACITY + 5) {
            ledger.record(entry(OutcomeStatus::Redeemed, i as Currency));
        }
        assert_eq!(ledger.cashouts().count(), CASHOUT_HISTORY_CAPACITY);
        // Newest first in the view as well
        assert_eq!(
            ledger.cashouts().next().unwrap().win_amount,
            (CASHOUT_HISTORY_CAPACITY + 4) as Currency
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OutcomeStatus::Fail.code(), 0);
        assert_eq!(OutcomeStatus::Success.code(), 1);
        assert_eq!(OutcomeStatus::Redeemed.code(), 2);
    }
}

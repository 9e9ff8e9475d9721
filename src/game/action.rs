//! Session Actions
//!
//! Tagged action requests and their result payloads. Every action names
//! the egg it targets explicitly; there is no positional or duck-typed
//! dispatch path.

use serde::{Deserialize, Serialize};

use crate::game::egg::{Currency, EggType, EggUid};
use crate::game::resolver::Outcome;

/// An action request against the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Buy a fresh egg of the given type and make it active.
    Buy { egg_type: EggType },

    /// Crack the active egg once.
    Crack { egg_uid: EggUid },

    /// Park the active egg in storage.
    Store { egg_uid: EggUid },

    /// Cash the active egg out at its current bet value.
    Cashout { egg_uid: EggUid },

    /// Same as cashout, reported as a redeem.
    Redeem { egg_uid: EggUid },

    /// Make a stored egg active again.
    Retrieve { egg_uid: EggUid },

    /// Switch the shop tab, implicitly storing any active egg first.
    SelectTab { egg_type: EggType },
}

impl Action {
    /// The egg this action targets, if it names one.
    pub fn egg_uid(&self) -> Option<EggUid> {
        match self {
            Action::Crack { egg_uid }
            | Action::Store { egg_uid }
            | Action::Cashout { egg_uid }
            | Action::Redeem { egg_uid }
            | Action::Retrieve { egg_uid } => Some(*egg_uid),
            Action::Buy { .. } | Action::SelectTab { .. } => None,
        }
    }
}

/// Result payload returned to the caller after a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A new egg is active.
    Bought { egg_uid: EggUid, egg_type: EggType },

    /// One crack was resolved.
    Cracked {
        egg_uid: EggUid,
        egg_type: EggType,
        outcome: Outcome,
        /// Tries after this crack.
        tries: u8,
        /// Level that was played (1-based).
        level: u8,
        /// Bet after this crack (doubled on a win).
        bet_amount: Currency,
        /// Loss destroyed the egg.
        destroyed: bool,
        /// Win landed on the final try; the egg is parked and retired.
        maxed_out: bool,
    },

    /// The egg was parked in storage.
    Stored { egg_uid: EggUid },

    /// The egg was converted to balance and destroyed.
    CashedOut { egg_uid: EggUid, amount: Currency },

    /// Same as `CashedOut`, reported as a redeem.
    Redeemed { egg_uid: EggUid, amount: Currency },

    /// A stored egg is active again.
    Retrieved { egg_uid: EggUid },

    /// Tab switched; any previously active egg was stored first.
    TabSelected {
        egg_type: EggType,
        stored_egg: Option<EggUid>,
    },
}

/// The most recently completed outcome, kept on the session for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastOutcome {
    /// Nothing has happened yet.
    #[default]
    None,
    Win,
    Lose,
    Stored,
    Cashout,
    Redeemed,
}

impl LastOutcome {
    /// Wire string for the `result` field.
    pub fn as_str(self) -> &'static str {
        match self {
            LastOutcome::None => "none",
            LastOutcome::Win => "win",
            LastOutcome::Lose => "lose",
            LastOutcome::Stored => "stored",
            LastOutcome::Cashout => "cashout",
            LastOutcome::Redeemed => "redeemed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json_roundtrip() {
        let uid = EggUid::new([3; 16]);
        let actions = vec![
            Action::Buy {
                egg_type: EggType::Premium,
            },
            Action::Crack { egg_uid: uid },
            Action::Store { egg_uid: uid },
            Action::Cashout { egg_uid: uid },
            Action::Redeem { egg_uid: uid },
            Action::Retrieve { egg_uid: uid },
            Action::SelectTab {
                egg_type: EggType::Gold,
            },
        ];

        for action in actions {
            let json = serde_json::to_string(&action).unwrap();
            let parsed: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_action_target() {
        let uid = EggUid::new([9; 16]);
        assert_eq!(Action::Crack { egg_uid: uid }.egg_uid(), Some(uid));
        assert_eq!(
            Action::Buy {
                egg_type: EggType::Gold
            }
            .egg_uid(),
            None
        );
    }

    #[test]
    fn test_last_outcome_wire_strings() {
        assert_eq!(LastOutcome::Win.as_str(), "win");
        assert_eq!(LastOutcome::Redeemed.as_str(), "redeemed");
        assert_eq!(LastOutcome::default(), LastOutcome::None);
    }
}

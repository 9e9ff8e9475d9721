//! Egg Entities
//!
//! The egg is the playable unit: one purchased stake with its own try
//! counter and bet. Uses a `[u8; 16]` uid newtype so eggs sort and compare
//! deterministically while converting cleanly to UUID strings at the wire
//! boundary.

use serde::{Deserialize, Serialize};

use crate::MAX_TRIES;

/// Currency amounts (whole units, no fractional cents in this game).
pub type Currency = u64;

// =============================================================================
// EGG UID
// =============================================================================

/// Unique egg identifier (UUID as bytes).
///
/// Implements Ord for deterministic ordering in collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct EggUid(pub [u8; 16]);

impl EggUid {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh process-unique identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// EGG TYPE
// =============================================================================

/// Egg catalog entry identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EggType {
    /// Entry-level egg, bet 100.
    #[default]
    Gold,
    /// High-stakes egg, bet 1000.
    Premium,
}

impl EggType {
    /// Wire identifier for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            EggType::Gold => "gold",
            EggType::Premium => "premium",
        }
    }

    /// Display label shown in the shop.
    pub fn label(self) -> &'static str {
        match self {
            EggType::Gold => "Gold Egg",
            EggType::Premium => "Premium Egg",
        }
    }

    /// Purchase price, which is also the initial bet.
    pub fn base_bet(self) -> Currency {
        match self {
            EggType::Gold => 100,
            EggType::Premium => 1000,
        }
    }

    /// Parse a wire identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "gold" => Some(EggType::Gold),
            "premium" => Some(EggType::Premium),
            _ => None,
        }
    }

    /// All catalog entries, in display order.
    pub fn catalog() -> [EggType; 2] {
        [EggType::Gold, EggType::Premium]
    }
}

// =============================================================================
// EGG
// =============================================================================

/// A single playable egg instance.
///
/// Invariant: `0 <= tries <= MAX_TRIES`. `maxed_out` becomes true only when
/// a winning crack lands exactly on the try cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egg {
    /// Unique instance identifier.
    pub uid: EggUid,

    /// Catalog type this egg was bought as.
    pub egg_type: EggType,

    /// Current bet. Doubles on every winning crack.
    pub bet_amount: Currency,

    /// Cracks attempted so far.
    pub tries: u8,

    /// Payout of the most recent winning crack (0 if none).
    pub last_win_amount: Currency,

    /// True once a winning crack reached the try cap; the egg can no
    /// longer be played, only cashed out.
    pub maxed_out: bool,
}

impl Egg {
    /// Create a fresh egg of the given type at its base bet.
    pub fn new(egg_type: EggType) -> Self {
        Self {
            uid: EggUid::generate(),
            egg_type,
            bet_amount: egg_type.base_bet(),
            tries: 0,
            last_win_amount: 0,
            maxed_out: false,
        }
    }

    /// Display level for the upcoming (or just-played) crack,
    /// clamped to `[1, MAX_TRIES]`.
    pub fn level(&self) -> u8 {
        (self.tries + 1).min(MAX_TRIES)
    }

    /// Whether another crack is allowed.
    #[inline]
    pub fn can_crack(&self) -> bool {
        !self.maxed_out && self.tries < MAX_TRIES
    }

    /// Apply a winning crack: advance the try counter, record the payout,
    /// and double the bet. Returns true if this win maxed the egg out.
    pub fn apply_win(&mut self, win_amount: Currency) -> bool {
        debug_assert!(self.can_crack());
        self.tries = (self.tries + 1).min(MAX_TRIES);
        self.last_win_amount = win_amount;
        self.bet_amount = self.bet_amount.saturating_mul(2);
        if self.tries == MAX_TRIES {
            self.maxed_out = true;
        }
        self.maxed_out
    }

    /// Apply a losing crack: advance the try counter. The caller destroys
    /// the egg afterwards; the counter still moves so the final history
    /// entry reports the level that was played.
    pub fn apply_loss(&mut self) {
        debug_assert!(self.can_crack());
        self.tries = (self.tries + 1).min(MAX_TRIES);
        self.last_win_amount = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_uuid_roundtrip() {
        let uid = EggUid::generate();
        let s = uid.to_uuid_string();
        assert_eq!(EggUid::from_uuid_str(&s), Some(uid));
    }

    #[test]
    fn test_uid_rejects_garbage() {
        assert_eq!(EggUid::from_uuid_str("not-a-uuid"), None);
    }

    #[test]
    fn test_egg_type_ids() {
        assert_eq!(EggType::from_id("gold"), Some(EggType::Gold));
        assert_eq!(EggType::from_id("premium"), Some(EggType::Premium));
        assert_eq!(EggType::from_id("ruby"), None);

        for t in EggType::catalog() {
            assert_eq!(EggType::from_id(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_new_egg_defaults() {
        let egg = Egg::new(EggType::Gold);
        assert_eq!(egg.bet_amount, 100);
        assert_eq!(egg.tries, 0);
        assert_eq!(egg.last_win_amount, 0);
        assert!(!egg.maxed_out);
        assert!(egg.can_crack());
        assert_eq!(egg.level(), 1);
    }

    #[test]
    fn test_win_doubles_bet() {
        let mut egg = Egg::new(EggType::Premium);
        let maxed = egg.apply_win(1000);
        assert!(!maxed);
        assert_eq!(egg.bet_amount, 2000);
        assert_eq!(egg.last_win_amount, 1000);
        assert_eq!(egg.tries, 1);
    }

    #[test]
    fn test_tries_never_exceed_cap() {
        let mut egg = Egg::new(EggType::Gold);
        for _ in 0..MAX_TRIES {
            assert!(egg.can_crack());
            egg.apply_win(egg.bet_amount);
        }
        assert_eq!(egg.tries, MAX_TRIES);
        assert!(egg.maxed_out);
        assert!(!egg.can_crack());
    }

    #[test]
    fn test_maxed_only_on_final_win() {
        let mut egg = Egg::new(EggType::Gold);
        for i in 1..MAX_TRIES {
            assert!(!egg.apply_win(egg.bet_amount));
            assert_eq!(egg.tries, i);
        }
        assert!(egg.apply_win(egg.bet_amount));
    }

    #[test]
    fn test_level_clamped() {
        let mut egg = Egg::new(EggType::Gold);
        assert_eq!(egg.level(), 1);
        for _ in 0..MAX_TRIES {
            egg.apply_win(egg.bet_amount);
        }
        assert_eq!(egg.level(), MAX_TRIES);
    }

    #[test]
    fn test_loss_clears_last_win() {
        let mut egg = Egg::new(EggType::Gold);
        egg.apply_win(100);
        egg.apply_loss();
        assert_eq!(egg.last_win_amount, 0);
        assert_eq!(egg.tries, 2);
    }
}

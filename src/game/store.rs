//! Egg Entity Store
//!
//! Holds the purchased and stored egg pools for one session, enforces the
//! storage cap, and supports lookup by identifier. An egg belongs to
//! exactly one pool at a time; `move_to_stored` transfers ownership rather
//! than sharing it.
//!
//! All mutating operations are synchronous and immediately visible to
//! subsequent reads; the session owns the store single-threaded.

use serde::{Deserialize, Serialize};

use crate::game::egg::{Egg, EggType, EggUid};
use crate::MAX_STORED;

/// Which pool an egg reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Freshly bought, not yet parked.
    Purchased,
    /// Parked in the capacity-bounded holding area.
    Stored,
}

/// Store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Stored pool is at capacity.
    #[error("storage is full ({max}/{max})", max = MAX_STORED)]
    StorageFull,

    /// Egg is already in the stored pool.
    #[error("egg is already stored")]
    AlreadyStored,

    /// No egg with that uid in either pool.
    #[error("egg not found")]
    NotFound,
}

/// Purchased and stored egg pools for one session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EggStore {
    purchased: Vec<Egg>,
    stored: Vec<Egg>,
}

impl EggStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh egg in the purchased pool and return its uid.
    pub fn create(&mut self, egg_type: EggType) -> EggUid {
        let egg = Egg::new(egg_type);
        let uid = egg.uid;
        self.purchased.push(egg);
        uid
    }

    /// Move an egg from the purchased pool into storage.
    ///
    /// Fails with `StorageFull` when the stored pool already holds
    /// `MAX_STORED` eggs, and with `AlreadyStored` when the uid is already
    /// parked (idempotence guard: no duplicate entries). State is unchanged
    /// on any failure.
    pub fn move_to_stored(&mut self, uid: EggUid) -> Result<(), StoreError> {
        if self.stored.iter().any(|e| e.uid == uid) {
            return Err(StoreError::AlreadyStored);
        }
        if self.stored.len() >= MAX_STORED {
            return Err(StoreError::StorageFull);
        }
        let idx = self
            .purchased
            .iter()
            .position(|e| e.uid == uid)
            .ok_or(StoreError::NotFound)?;
        let egg = self.purchased.remove(idx);
        self.stored.push(egg);
        Ok(())
    }

    /// Delete an egg from whichever pool holds it. No-op if absent.
    pub fn remove(&mut self, uid: EggUid) -> bool {
        let before = self.purchased.len() + self.stored.len();
        self.purchased.retain(|e| e.uid != uid);
        self.stored.retain(|e| e.uid != uid);
        self.purchased.len() + self.stored.len() != before
    }

    /// Look up an egg in the named pool.
    pub fn find(&self, uid: EggUid, source: Source) -> Option<&Egg> {
        self.pool(source).iter().find(|e| e.uid == uid)
    }

    /// Look up an egg mutably in the named pool.
    pub fn find_mut(&mut self, uid: EggUid, source: Source) -> Option<&mut Egg> {
        self.pool_mut(source).iter_mut().find(|e| e.uid == uid)
    }

    /// Which pool holds this uid, if any.
    pub fn locate(&self, uid: EggUid) -> Option<Source> {
        if self.purchased.iter().any(|e| e.uid == uid) {
            Some(Source::Purchased)
        } else if self.stored.iter().any(|e| e.uid == uid) {
            Some(Source::Stored)
        } else {
            None
        }
    }

    /// Look up an egg in either pool.
    pub fn get(&self, uid: EggUid) -> Option<&Egg> {
        self.locate(uid).and_then(|src| self.find(uid, src))
    }

    /// Number of eggs currently parked.
    pub fn stored_count(&self) -> usize {
        self.stored.len()
    }

    /// Whether storage has no free slot left.
    pub fn storage_full(&self) -> bool {
        self.stored.len() >= MAX_STORED
    }

    /// Stored eggs, oldest first.
    pub fn stored_eggs(&self) -> &[Egg] {
        &self.stored
    }

    /// Purchased (unparked) eggs, oldest first.
    pub fn purchased_eggs(&self) -> &[Egg] {
        &self.purchased
    }

    fn pool(&self, source: Source) -> &[Egg] {
        match source {
            Source::Purchased => &self.purchased,
            Source::Stored => &self.stored,
        }
    }

    fn pool_mut(&mut self, source: Source) -> &mut Vec<Egg> {
        match source {
            Source::Purchased => &mut self.purchased,
            Source::Stored => &mut self.stored,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

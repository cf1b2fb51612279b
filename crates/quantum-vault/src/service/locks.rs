//! Per-principal mutual exclusion.
//!
//! Every mutation of a principal's key set or ledger holds that principal's
//! lock from its first read to its commit, so two calls can never both pass
//! the "already used" check for the same key.
//!
//! Entries live only while someone holds or waits on them: the last
//! [`PrincipalGuard`] to drop removes its principal from the map.

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use shared_types::Address;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct PrincipalLocks {
    inner: Mutex<HashMap<Address, Arc<Mutex<()>>>>,
}

/// Exclusive hold on one principal, released on drop.
pub(crate) struct PrincipalGuard<'a> {
    locks: &'a PrincipalLocks,
    principal: Address,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl PrincipalLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Block until `principal` is free and hold it.
    pub(crate) fn lock(&self, principal: &Address) -> PrincipalGuard<'_> {
        // Clones are only handed out under the map lock, which is what
        // makes the strong count check in `Drop` sound.
        let mutex = Arc::clone(self.inner.lock().entry(*principal).or_default());
        PrincipalGuard {
            locks: self,
            principal: *principal,
            guard: Some(mutex.lock_arc()),
        }
    }

    /// Principals with a live lock entry.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

impl Drop for PrincipalGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.locks.inner.lock();
        if map
            .get(&self.principal)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            map.remove(&self.principal);
        }
    }
}

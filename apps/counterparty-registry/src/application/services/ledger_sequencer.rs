//! Per-identity ledger sequencing.
//!
//! Mutations for one identity are submitted strictly one at a time, while
//! different identities proceed in parallel. A caller holds an
//! [`IdentityGuard`] from before its local validation until its repository
//! write, so no second writer can interleave a submission in between.
//!
//! Dropping the guard (including by cancelling the future that holds it)
//! releases the identity. Idle identities are pruned so the lane table only
//! tracks identities with a holder or waiter.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::shared::CounterpartyId;

type Lane = Arc<AsyncMutex<()>>;
type LaneTable = Mutex<HashMap<CounterpartyId, Lane>>;

/// Serializes ledger submissions per counterparty identity.
#[derive(Debug, Default)]
pub struct LedgerSequencer {
    lanes: Arc<LaneTable>,
}

impl LedgerSequencer {
    /// Create a sequencer with no active lanes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `identity`.
    ///
    /// Waiters are served in FIFO order.
    pub async fn acquire(&self, identity: &CounterpartyId) -> IdentityGuard {
        let lane = {
            let mut lanes = self.lanes.lock();
            Arc::clone(lanes.entry(identity.clone()).or_default())
        };
        let guard = lane.lock_owned().await;

        IdentityGuard {
            identity: identity.clone(),
            lanes: Arc::clone(&self.lanes),
            guard,
        }
    }

    /// Number of identities currently held or awaited.
    #[must_use]
    pub fn active_lanes(&self) -> usize {
        self.lanes.lock().len()
    }
}

/// Exclusive hold on one identity.
#[derive(Debug)]
pub struct IdentityGuard {
    identity: CounterpartyId,
    lanes: Arc<LaneTable>,
    guard: OwnedMutexGuard<()>,
}

impl IdentityGuard {
    /// The held identity.
    #[must_use]
    pub const fn identity(&self) -> &CounterpartyId {
        &self.identity
    }
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        let mut lanes = self.lanes.lock();
        let held = OwnedMutexGuard::mutex(&self.guard);
        // table entry + this guard: nobody else is waiting
        let idle = lanes
            .get(&self.identity)
            .is_some_and(|lane| Arc::ptr_eq(lane, held) && Arc::strong_count(lane) == 2);
        if idle {
            lanes.remove(&self.identity);
        }
    }
}

//! In-memory ledger gateway.
//!
//! Simulates the replicated ledger for tests and local operation. Tracks the
//! last applied sequence number per account and rejects mutations that do
//! not extend it by exactly one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{
    Confirmation, GatewayError, GatewayStatus, LedgerGatewayPort, LedgerMutation,
};
use crate::domain::shared::{CounterpartyId, Timestamp, TxReference};

/// Ledger-side view of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccountState {
    last_sequence: u64,
    exposure: u64,
}

/// In-memory implementation of `LedgerGatewayPort`.
#[derive(Debug)]
pub struct InMemoryLedgerGateway {
    endpoint: String,
    latency: Duration,
    connected: AtomicBool,
    fail_next: Mutex<Option<GatewayError>>,
    accounts: Mutex<HashMap<CounterpartyId, AccountState>>,
    submissions: Mutex<Vec<LedgerMutation>>,
}

impl Default for InMemoryLedgerGateway {
    fn default() -> Self {
        Self::new("in-memory", Duration::ZERO)
    }
}

impl InMemoryLedgerGateway {
    /// Create a connected gateway with the given confirmation latency.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, latency: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            latency,
            connected: AtomicBool::new(true),
            fail_next: Mutex::new(None),
            accounts: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Endpoint name reported by connectivity probes.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Toggle connectivity. While disconnected every call fails with `Unavailable`.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make the next submission fail with `error` without applying it.
    pub fn fail_next(&self, error: GatewayError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Every mutation that reached the ledger, applied or rejected, in arrival order.
    #[must_use]
    pub fn submissions(&self) -> Vec<LedgerMutation> {
        self.submissions.lock().clone()
    }

    /// Number of mutations that reached the ledger.
    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }

    /// Ledger-side exposure of an account.
    #[must_use]
    pub fn exposure_of(&self, identity: &CounterpartyId) -> Option<u64> {
        self.accounts.lock().get(identity).map(|a| a.exposure)
    }

    fn ensure_connected(&self) -> Result<(), GatewayError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GatewayError::Unavailable {
                message: format!("{} is not reachable", self.endpoint),
            })
        }
    }

    fn apply(&self, mutation: &LedgerMutation) -> Result<(), GatewayError> {
        let mut accounts = self.accounts.lock();
        match mutation {
            LedgerMutation::Register { sequence, record } => {
                if accounts.contains_key(record.identity()) {
                    return Err(GatewayError::Rejected {
                        reason: format!("account {} already exists", record.identity()),
                    });
                }
                if *sequence != 0 {
                    return Err(GatewayError::Rejected {
                        reason: format!("registration must use sequence 0, got {sequence}"),
                    });
                }
                accounts.insert(
                    record.identity().clone(),
                    AccountState {
                        last_sequence: 0,
                        exposure: record.current_exposure(),
                    },
                );
            }
            LedgerMutation::SetExposure {
                sequence,
                identity,
                new_exposure,
            } => {
                let account = accounts
                    .get_mut(identity)
                    .ok_or_else(|| GatewayError::Rejected {
                        reason: format!("unknown account {identity}"),
                    })?;
                let expected = account.last_sequence + 1;
                if *sequence != expected {
                    return Err(GatewayError::Rejected {
                        reason: format!(
                            "out-of-order sequence for {identity}: expected {expected}, got {sequence}"
                        ),
                    });
                }
                account.last_sequence = *sequence;
                account.exposure = *new_exposure;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGatewayPort for InMemoryLedgerGateway {
    async fn check_connectivity(&self) -> Result<GatewayStatus, GatewayError> {
        self.ensure_connected()?;
        Ok(GatewayStatus {
            connected: true,
            endpoint: self.endpoint.clone(),
        })
    }

    async fn submit(&self, mutation: LedgerMutation) -> Result<Confirmation, GatewayError> {
        self.ensure_connected()?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.submissions.lock().push(mutation.clone());

        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }

        self.apply(&mutation)?;

        Ok(Confirmation {
            reference: TxReference::generate(),
            sequence: mutation.sequence(),
            confirmed_at: Timestamp::now(),
        })
    }
}

//! Application Services
//!
//! Application services coordinate domain logic and infrastructure adapters.
//! They differ from use cases in that they hold shared state across calls.

mod ledger_sequencer;

pub use ledger_sequencer::{IdentityGuard, LedgerSequencer};

//! Ledger gateway adapters.

mod in_memory_gateway;

pub use in_memory_gateway::InMemoryLedgerGateway;

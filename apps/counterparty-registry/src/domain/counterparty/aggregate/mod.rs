//! Counterparty aggregate.

mod counterparty;

pub use counterparty::{CounterpartyRecord, ExposureChange, RegisterCounterpartyCommand};

//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.

mod ledger_gateway_port;

#[cfg(test)]
pub use ledger_gateway_port::MockLedgerGatewayPort;
pub use ledger_gateway_port::{
    Confirmation, GatewayError, GatewayStatus, LedgerGatewayPort, LedgerMutation,
};

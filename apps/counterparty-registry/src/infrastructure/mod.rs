//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: counterparty repository (in-memory)
//!   - `ledger/`: ledger gateway (in-memory simulation)
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!
//! - `config/`: dependency injection container

pub mod config;
pub mod http;
pub mod ledger;
pub mod persistence;

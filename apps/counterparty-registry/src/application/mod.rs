//! Application Layer
//!
//! Orchestrates domain logic behind ports:
//!
//! - `ports`: the driven `LedgerGatewayPort`
//! - `services`: the per-identity `LedgerSequencer`
//! - `use_cases`: register, update exposure, compute risk, query record
//! - `commands`: operator command set and dispatcher
//! - `dto`: boundary data transfer objects

pub mod commands;
pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

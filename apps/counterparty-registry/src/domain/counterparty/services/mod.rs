//! Counterparty Domain Services

mod risk_engine;

pub use risk_engine::RiskEngine;

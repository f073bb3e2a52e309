//! Shared Domain Types
//!
//! Value objects and errors shared across the registry.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{CounterpartyId, Percentage, Timestamp, TxReference};

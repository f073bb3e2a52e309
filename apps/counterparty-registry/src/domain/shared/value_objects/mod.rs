//! Shared Value Objects
//!
//! Immutable domain types compared by value, not identity.

mod identifiers;
mod percentage;
mod timestamp;

pub use identifiers::{CounterpartyId, TxReference, ZERO_ADDRESS};
pub use percentage::Percentage;
pub use timestamp::Timestamp;

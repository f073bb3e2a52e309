//! Operator Commands
//!
//! The closed set of operator commands and the dispatcher that routes them
//! to use cases.

mod dispatcher;
mod operator_command;

pub use dispatcher::CommandDispatcher;
pub use operator_command::{
    COMMAND_TABLE, CommandInfo, CommandKind, CommandOutcome, OperatorCommand,
};

//! Operator command set.

use serde::{Deserialize, Serialize};

use crate::application::dto::{
    CounterpartyRecordDto, ExposureUpdateDto, RegisterCounterpartyDto, RegistrationDto,
    RiskAssessmentDto, UpdateExposureDto,
};

/// Commands an operator can issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// List the available commands.
    Home,
    /// Register a new counterparty.
    Register(RegisterCounterpartyDto),
    /// Replace a counterparty's current exposure.
    UpdateExposure(UpdateExposureDto),
    /// Compute all risk metrics for a counterparty.
    ComputeRisk {
        /// Counterparty identity.
        identity: String,
    },
    /// Show the full record of a counterparty.
    ShowRecord {
        /// Counterparty identity.
        identity: String,
    },
}

impl OperatorCommand {
    /// Kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Home => CommandKind::Home,
            Self::Register(_) => CommandKind::Register,
            Self::UpdateExposure(_) => CommandKind::UpdateExposure,
            Self::ComputeRisk { .. } => CommandKind::ComputeRisk,
            Self::ShowRecord { .. } => CommandKind::ShowRecord,
        }
    }
}

/// Discriminant of [`OperatorCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Home / info.
    Home,
    /// Register.
    Register,
    /// Update exposure.
    UpdateExposure,
    /// Compute risk.
    ComputeRisk,
    /// Show record.
    ShowRecord,
}

impl CommandKind {
    /// The table entry describing this kind.
    #[must_use]
    pub const fn info(self) -> &'static CommandInfo {
        // COMMAND_TABLE is laid out in declaration order
        &COMMAND_TABLE[self as usize]
    }
}

/// Table entry describing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    /// Command kind.
    pub kind: CommandKind,
    /// Short name.
    pub name: &'static str,
    /// One-line summary.
    pub summary: &'static str,
}

/// Every command, in menu order.
///
/// Descriptive only: it names and summarizes each kind for the menu and for
/// dispatch logs. Routing to a handler is the exhaustive `match` in
/// `CommandDispatcher::dispatch`, so a new kind cannot go unhandled.
pub const COMMAND_TABLE: [CommandInfo; 5] = [
    CommandInfo {
        kind: CommandKind::Home,
        name: "home",
        summary: "List the available commands",
    },
    CommandInfo {
        kind: CommandKind::Register,
        name: "register",
        summary: "Register a counterparty with its credit terms",
    },
    CommandInfo {
        kind: CommandKind::UpdateExposure,
        name: "update-exposure",
        summary: "Replace the current exposure of a counterparty",
    },
    CommandInfo {
        kind: CommandKind::ComputeRisk,
        name: "compute-risk",
        summary: "Compute risk score, coverage ratio and expected loss",
    },
    CommandInfo {
        kind: CommandKind::ShowRecord,
        name: "show-record",
        summary: "Show the full record of a counterparty",
    },
];

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Command table.
    Info(Vec<CommandInfo>),
    /// A counterparty was registered.
    Registered(RegistrationDto),
    /// An exposure update was confirmed.
    ExposureUpdated(ExposureUpdateDto),
    /// Risk metrics.
    Risk(RiskAssessmentDto),
    /// A full record.
    Record(CounterpartyRecordDto),
}

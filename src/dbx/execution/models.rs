//! Remote command execution data models

use std::time::Duration;

use crate::config::defaults;

/// Lifecycle state of a remote command, from the `status` response field
///
/// `Queued` and `Running` are the only non-terminal states; anything else,
/// including states this client does not know about, ends the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandState {
    Queued,
    Running,
    Cancelling,
    Finished,
    Cancelled,
    Error,
    Other(String),
}

impl CommandState {
    pub fn parse(status: &str) -> Self {
        match status {
            "Queued" => CommandState::Queued,
            "Running" => CommandState::Running,
            "Cancelling" => CommandState::Cancelling,
            "Finished" => CommandState::Finished,
            "Cancelled" => CommandState::Cancelled,
            "Error" => CommandState::Error,
            other => CommandState::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CommandState::Queued | CommandState::Running)
    }
}

impl std::fmt::Display for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommandState::Queued => "Queued",
            CommandState::Running => "Running",
            CommandState::Cancelling => "Cancelling",
            CommandState::Finished => "Finished",
            CommandState::Cancelled => "Cancelled",
            CommandState::Error => "Error",
            CommandState::Other(s) => s,
        };
        write!(f, "{}", s)
    }
}

/// Polling behavior for the command status loop
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Sleep between status polls
    pub interval: Duration,
    /// Maximum number of status polls before giving up; `None` waits
    /// indefinitely, matching the platform's open-ended command model
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(defaults::POLL_INTERVAL_SECS),
            max_polls: None,
        }
    }
}

//! Remote command execution
//!
//! Commands run inside an execution context bound to one cluster. The
//! lifecycle is Created -> Queued -> Running -> terminal, observed through
//! the status endpoint.

mod api;
mod commands;
mod models;

pub use commands::{run_exec_command, ExecOutcome};
pub use models::{CommandState, PollPolicy};

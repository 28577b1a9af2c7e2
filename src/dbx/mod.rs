//! Databricks API client module
//!
//! Transport, per-call request descriptors, and the resource operations
//! built on top of them.

mod client;
pub mod clusters;
pub mod connection;
pub mod execution;
pub mod helpers;
pub mod identity;
pub mod profile;
pub mod request;

pub use client::SatClient;
pub use clusters::{run_spark_versions_command, SparkVersion};
pub use connection::run_test_command;
pub use execution::{run_exec_command, CommandState, ExecOutcome, PollPolicy};
pub use helpers::{get_key, get_key_str};
pub use identity::run_whoami_command;
pub use profile::{CloudType, ProfileOverrides, ProfileResolver, SatProfile};
pub use request::{ApiTarget, RequestDescriptor};

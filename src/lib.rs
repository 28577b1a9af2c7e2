//! dbxsat - Databricks workspace and accounts API client
//!
//! A credentialed REST client plus a thin CLI. The interesting part is the
//! remote command execution protocol: create an execution context on a
//! cluster, submit a command, poll its status until terminal, and extract
//! the result payload.
//!
//! # Example
//!
//! ```bash
//! # Validate credentials
//! dbxsat test
//!
//! # Who does this token belong to?
//! dbxsat whoami
//!
//! # Run a command on the configured cluster and wait for the result
//! dbxsat exec "print(spark.version)"
//!
//! # Same, against two clusters, bounded to 120 polls
//! dbxsat exec "print(1)" -c 0123-456789-abc -c 0123-456789-def --max-polls 120
//!
//! # Latest mainline Spark runtime
//! dbxsat spark-versions
//! ```

pub mod cli;
pub mod config;
pub mod dbx;
pub mod error;
pub mod ui;

pub use cli::{Cli, Command, ExecArgs, OutputFormat, SparkVersionsArgs};
pub use dbx::{
    get_key, get_key_str, run_exec_command, run_spark_versions_command, run_test_command,
    run_whoami_command, ApiTarget, CloudType, CommandState, ExecOutcome, PollPolicy,
    ProfileOverrides, ProfileResolver, RequestDescriptor, SatClient, SatProfile, SparkVersion,
};
pub use error::{Result, SatError};

//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{defaults, profile};

/// Databricks workspace and accounts API CLI
#[derive(Parser, Debug)]
#[command(name = "dbxsat")]
#[command(version)]
#[command(about = "Explore and exercise Databricks workspace and accounts APIs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Workspace URL, e.g. https://myshard.cloud.databricks.com
    #[arg(short = 'H', long, env = profile::URL_ENV_VAR, global = true)]
    pub url: Option<String>,

    /// API token (overrides the profile file)
    #[arg(short = 't', long, env = profile::TOKEN_ENV_VAR, global = true)]
    pub token: Option<String>,

    /// Databricks account id (accounts API)
    #[arg(long, env = profile::ACCOUNT_ID_ENV_VAR, global = true)]
    pub account_id: Option<String>,

    /// Path to a JSON profile file
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

    /// Use account-level basic auth for workspace calls too
    #[arg(long, global = true)]
    pub use_master_creds: bool,

    /// Account-level username
    #[arg(long, env = profile::MASTER_USER_ENV_VAR, global = true)]
    pub master_user: Option<String>,

    /// Account-level password (prompted for when omitted)
    #[arg(long, env = profile::MASTER_PASSWORD_ENV_VAR, global = true)]
    pub master_password: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = defaults::LOG_LEVEL, global = true)]
    pub log_level: String,

    /// Suppress spinners and prompts
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print CLI documentation as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate credentials with a lightweight API call
    Test {
        /// Test the accounts API instead of the workspace
        #[arg(long)]
        account: bool,
    },
    /// Print the identity the credentials belong to
    Whoami,
    /// Run a command on one or more clusters and wait for the result
    Exec(ExecArgs),
    /// Show available Spark runtime versions
    SparkVersions(SparkVersionsArgs),
}

/// Arguments for the exec command
#[derive(clap::Args, Debug)]
pub struct ExecArgs {
    /// Command text to run remotely
    pub command: Option<String>,

    /// Read the command from a file instead
    #[arg(short, long, conflicts_with = "command")]
    pub file: Option<PathBuf>,

    /// Cluster id to run on (repeatable; defaults to the profile cluster)
    #[arg(short, long = "cluster")]
    pub clusters: Vec<String>,

    /// Give up after this many status polls (default: wait indefinitely)
    #[arg(long)]
    pub max_polls: Option<u32>,

    /// Seconds between status polls
    #[arg(long, default_value_t = defaults::POLL_INTERVAL_SECS)]
    pub interval: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Arguments for the spark-versions command
#[derive(clap::Args, Debug)]
pub struct SparkVersionsArgs {
    /// List every available runtime instead of the latest mainline one
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text or table (default)
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

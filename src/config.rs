/// Configuration constants for the Databricks REST API
pub mod api {
    /// API version segment for most management endpoints
    pub const VERSION_2_0: &str = "2.0";

    /// API version segment for the command execution endpoints
    pub const VERSION_1_2: &str = "1.2";

    /// Base URL for the accounts-service API (all clouds route through AWS host)
    pub const ACCOUNTS_URL: &str = "https://accounts.cloud.databricks.com";

    /// HTTP status codes treated as fatal auth failures on any call
    pub const FATAL_STATUS_CODES: &[u16] = &[401];

    /// Per-request socket timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("dbxsat/", env!("CARGO_PKG_VERSION"));
}

/// Configuration constants for profile resolution
pub mod profile {
    /// Profile file path relative to the user config directory
    pub const FILE_NAME: &str = "dbxsat/profile.json";

    /// Environment variable for the workspace URL
    pub const URL_ENV_VAR: &str = "DATABRICKS_HOST";

    /// Environment variable for the API token
    pub const TOKEN_ENV_VAR: &str = "DATABRICKS_TOKEN";

    /// Environment variable for the account id
    pub const ACCOUNT_ID_ENV_VAR: &str = "DATABRICKS_ACCOUNT_ID";

    /// Environment variables for account-level basic auth
    pub const MASTER_USER_ENV_VAR: &str = "DATABRICKS_USERNAME";
    pub const MASTER_PASSWORD_ENV_VAR: &str = "DATABRICKS_PASSWORD";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Seconds between command status polls
    pub const POLL_INTERVAL_SECS: u64 = 1;

    /// Language for remote execution contexts
    pub const EXECUTION_LANGUAGE: &str = "python";
}

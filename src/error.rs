use std::fmt;

/// Custom error type for Databricks API operations
#[derive(Debug)]
pub enum SatError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Fatal HTTP status (401) on any call
    Auth { status: u16, body: String },
    /// Connection/credential test failed
    Connection(String),
    /// Execution context creation returned no session id
    Session(String),
    /// Expected response field is absent
    MissingField(String),
    /// Poll budget exhausted before the command reached a terminal state
    Timeout { attempts: u32 },
    /// JSON parsing error
    Json(String),
    /// Configuration error
    Config(String),
    /// Failed to resolve credentials or profile
    Credentials(String),
}

impl fmt::Display for SatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SatError::Http(e) => write!(f, "HTTP request failed: {}", e),
            SatError::Auth { status, body } => {
                write!(f, "Authentication failed (status {}): {}", status, body)
            }
            SatError::Connection(msg) => write!(f, "Test connection failed: {}", msg),
            SatError::Session(msg) => write!(f, "Remote session error: {}", msg),
            SatError::MissingField(key) => write!(f, "Unable to find key '{}' in response", key),
            SatError::Timeout { attempts } => {
                write!(f, "Command still running after {} status polls", attempts)
            }
            SatError::Json(msg) => write!(f, "JSON error: {}", msg),
            SatError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SatError::Credentials(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SatError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SatError {
    fn from(err: reqwest::Error) -> Self {
        SatError::Http(err)
    }
}

impl From<serde_json::Error> for SatError {
    fn from(err: serde_json::Error) -> Self {
        SatError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SatError {
    fn from(err: std::io::Error) -> Self {
        SatError::Credentials(err.to_string())
    }
}

impl From<std::env::VarError> for SatError {
    fn from(err: std::env::VarError) -> Self {
        SatError::Config(err.to_string())
    }
}

/// Result type alias for Databricks operations
pub type Result<T> = std::result::Result<T, SatError>;

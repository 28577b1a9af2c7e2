//! Workspace profile and credential resolution

use dialoguer::Password;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::config::profile as profile_config;
use crate::error::{Result, SatError};

/// Cloud flavor a workspace URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudType {
    Azure,
    Aws,
    Gcp,
    Other,
}

impl CloudType {
    /// Derive the cloud type from a workspace URL substring match
    pub fn from_url(url: &str) -> Self {
        // Overlapping matches resolve gcp > aws > azure
        if url.contains("gcp.databricks") {
            CloudType::Gcp
        } else if url.contains("cloud.databricks") {
            CloudType::Aws
        } else if url.contains("azuredatabricks.net") {
            CloudType::Azure
        } else {
            CloudType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudType::Azure => "azure",
            CloudType::Aws => "aws",
            CloudType::Gcp => "gcp",
            CloudType::Other => "",
        }
    }
}

impl std::fmt::Display for CloudType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection settings for one workspace
///
/// Immutable once resolved; the auth header and base URL are recomputed from
/// this profile before every request.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SatProfile {
    /// Workspace URL, e.g. <https://myshard.cloud.databricks.com>
    pub url: String,
    /// Databricks account id (accounts API)
    pub account_id: String,
    /// Workspace id within the account
    pub workspace_id: String,
    /// Default cluster for remote command execution
    pub cluster_id: String,
    /// Bearer token for workspace API calls
    pub token: String,
    /// Use account-level basic auth for workspace calls too
    pub use_master_creds: bool,
    /// Account-level username
    pub master_name: String,
    /// Account-level password
    pub master_password: String,
}

impl SatProfile {
    pub fn cloud_type(&self) -> CloudType {
        CloudType::from_url(&self.url)
    }
}

/// Values taken from CLI flags (or their env fallbacks) that override the
/// profile file
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub profile_path: Option<PathBuf>,
    pub url: Option<String>,
    pub account_id: Option<String>,
    pub cluster_id: Option<String>,
    pub token: Option<String>,
    pub use_master_creds: bool,
    pub master_name: Option<String>,
    pub master_password: Option<String>,
}

/// Profile resolution with fallback logic
pub struct ProfileResolver;

impl ProfileResolver {
    /// Resolve the profile from multiple sources:
    /// 1. Profile file (explicit `--profile` path, or the default location if present)
    /// 2. CLI flags / environment variables override individual fields
    ///
    /// With `prompt` set, a missing master password is read interactively.
    pub fn resolve(overrides: ProfileOverrides, prompt: bool) -> Result<SatProfile> {
        let mut profile = match &overrides.profile_path {
            Some(path) => {
                debug!("Loading profile from: {}", path.display());
                Self::load_file(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    debug!("Loading profile from default location: {}", path.display());
                    Self::load_file(&path)?
                }
                _ => SatProfile::default(),
            },
        };

        if let Some(url) = overrides.url {
            profile.url = url;
        }
        if let Some(account_id) = overrides.account_id {
            profile.account_id = account_id;
        }
        if let Some(cluster_id) = overrides.cluster_id {
            profile.cluster_id = cluster_id;
        }
        if let Some(token) = overrides.token {
            profile.token = token;
        }
        if overrides.use_master_creds {
            profile.use_master_creds = true;
        }
        if let Some(master_name) = overrides.master_name {
            profile.master_name = master_name;
        }
        if let Some(master_password) = overrides.master_password {
            profile.master_password = master_password;
        }

        // Input values may come from files or copy-paste
        profile.url = profile.url.trim().to_string();
        profile.account_id = profile.account_id.trim().to_string();
        profile.workspace_id = profile.workspace_id.trim().to_string();
        profile.cluster_id = profile.cluster_id.trim().to_string();
        profile.token = profile.token.trim().to_string();
        profile.master_name = profile.master_name.trim().to_string();

        Self::validate(&mut profile, prompt)?;
        Ok(profile)
    }

    fn load_file(path: &std::path::Path) -> Result<SatProfile> {
        let content = fs::read_to_string(path).map_err(|e| {
            SatError::Credentials(format!(
                "Could not read profile file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SatError::Credentials(format!(
                "Could not parse profile file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn validate(profile: &mut SatProfile, prompt: bool) -> Result<()> {
        if profile.url.is_empty() {
            return Err(SatError::Credentials(Self::missing_message(
                "workspace URL",
                "--url",
                profile_config::URL_ENV_VAR,
            )));
        }

        if profile.use_master_creds {
            if profile.master_name.is_empty() {
                return Err(SatError::Credentials(Self::missing_message(
                    "account username",
                    "--master-user",
                    profile_config::MASTER_USER_ENV_VAR,
                )));
            }
            if profile.master_password.is_empty() {
                if prompt {
                    profile.master_password = Password::new()
                        .with_prompt(format!("Password for {}", profile.master_name))
                        .interact()
                        .map_err(|e| {
                            SatError::Credentials(format!("Could not read password: {}", e))
                        })?;
                } else {
                    return Err(SatError::Credentials(Self::missing_message(
                        "account password",
                        "--master-password",
                        profile_config::MASTER_PASSWORD_ENV_VAR,
                    )));
                }
            }
        } else if profile.token.is_empty() {
            return Err(SatError::Credentials(Self::missing_message(
                "API token",
                "--token",
                profile_config::TOKEN_ENV_VAR,
            )));
        }

        Ok(())
    }

    /// Generate a helpful error message when a required value is not found
    fn missing_message(what: &str, flag: &str, env_var: &str) -> String {
        let file_info = Self::default_path()
            .map(|p| format!("\n  3. Profile file:     {}", p.display()))
            .unwrap_or_default();
        format!(
            "No {} found. Please provide one using:\n\
             \n\
             1. CLI argument:      dbxsat {} <VALUE>\n\
             2. Environment var:   export {}=<VALUE>{}",
            what, flag, env_var, file_info
        )
    }

    /// Default profile file location under the user config directory
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(profile_config::FILE_NAME))
    }
}

//! Per-call request descriptors
//!
//! Auth header and base URL are a pure function of the profile and the call
//! target, rebuilt before every dispatch. Nothing is cached between calls.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::config::api;
use crate::dbx::profile::SatProfile;

/// Which endpoint family a call is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTarget {
    /// The configured workspace URL
    Workspace,
    /// The fixed accounts-service host
    Accounts,
}

/// Immutable description of how to address and authenticate one request
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub base_url: String,
    pub authorization: String,
}

impl RequestDescriptor {
    /// Build the descriptor for a call against the given target.
    ///
    /// Accounts calls always use HTTP Basic from the master credentials and
    /// the accounts-service host. Workspace calls use the configured URL with
    /// a Bearer token, unless master credentials are enabled for workspace
    /// calls too.
    pub fn build(profile: &SatProfile, target: ApiTarget) -> Self {
        match target {
            ApiTarget::Accounts => RequestDescriptor {
                base_url: api::ACCOUNTS_URL.to_string(),
                authorization: Self::basic_auth(profile),
            },
            ApiTarget::Workspace => RequestDescriptor {
                base_url: profile.url.trim_end_matches('/').to_string(),
                authorization: if profile.use_master_creds {
                    Self::basic_auth(profile)
                } else {
                    format!("Bearer {}", profile.token)
                },
            },
        }
    }

    /// Full URL for a versioned API endpoint
    pub fn endpoint_url(&self, version: &str, endpoint: &str) -> String {
        format!("{}/api/{}{}", self.base_url, version, endpoint)
    }

    fn basic_auth(profile: &SatProfile) -> String {
        let user_pass = BASE64.encode(format!(
            "{}:{}",
            profile.master_name, profile.master_password
        ));
        format!("Basic {}", user_pass)
    }
}

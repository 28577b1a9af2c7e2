//! Databricks HTTP client
//!
//! Thin transport over the REST API: authenticated dispatch, response
//! normalization, and connection testing. Protocol-level operations live in
//! the sibling resource modules.

use log::{debug, info};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::api;
use crate::dbx::profile::{CloudType, SatProfile};
use crate::dbx::request::{ApiTarget, RequestDescriptor};
use crate::error::{Result, SatError};

/// Databricks API client
///
/// Holds no mutable state; the auth header and base URL are recomputed from
/// the profile before every request.
pub struct SatClient {
    client: Client,
    profile: SatProfile,
    /// Custom base URL override (for testing with mock servers)
    base_url_override: Option<String>,
}

impl SatClient {
    /// Create a new client for the given profile
    pub fn new(profile: SatProfile) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            profile,
            base_url_override: None,
        }
    }

    /// Create a client with a custom base URL (for testing with mock servers)
    #[cfg(test)]
    pub fn with_base_url(profile: SatProfile, base_url: String) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            client,
            profile,
            base_url_override: Some(base_url),
        }
    }

    /// The resolved profile this client was built from
    pub fn profile(&self) -> &SatProfile {
        &self.profile
    }

    /// Cloud flavor derived from the workspace URL
    pub fn cloud_type(&self) -> CloudType {
        self.profile.cloud_type()
    }

    /// Build the request descriptor for a call, honoring the test override
    fn descriptor(&self, target: ApiTarget) -> RequestDescriptor {
        let mut desc = RequestDescriptor::build(&self.profile, target);
        if let Some(ref url) = self.base_url_override {
            desc.base_url = url.trim_end_matches('/').to_string();
        }
        desc
    }

    /// Add auth and agent headers to a request builder
    fn with_headers(
        &self,
        builder: reqwest::RequestBuilder,
        desc: &RequestDescriptor,
    ) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", &desc.authorization)
            .header("User-Agent", api::USER_AGENT)
    }

    /// HTTP GET against a versioned endpoint
    ///
    /// Array bodies are wrapped as `{"elements": [...]}` and every result
    /// carries `http_status_code`. Statuses in the fatal set raise
    /// [`SatError::Auth`]; all other non-2xx bodies are passed through to the
    /// caller.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        version: &str,
        target: ApiTarget,
    ) -> Result<Value> {
        let desc = self.descriptor(target);
        let url = desc.endpoint_url(version, endpoint);
        debug!("GET: {}", url);

        let mut builder = self.with_headers(self.client.get(&url), &desc);
        if !params.is_empty() {
            builder = builder.query(params);
        }

        let response = builder.send().await?;
        self.normalize(response).await
    }

    /// HTTP POST/PUT/PATCH against a versioned endpoint
    ///
    /// An empty payload never triggers a network call: the method logs and
    /// returns an empty object. `files` turns the body into a multipart form
    /// (payload fields become text parts) and is only honored for POST.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&Value>,
        version: &str,
        files: Option<Form>,
        target: ApiTarget,
    ) -> Result<Value> {
        let payload = match payload {
            Some(p) if !payload_is_empty(p) => p,
            _ => {
                info!("Must have a payload for {} {}", method, endpoint);
                return Ok(Value::Object(Map::new()));
            }
        };

        let desc = self.descriptor(target);
        let url = desc.endpoint_url(version, endpoint);
        debug!("{}: {}", method, url);

        let builder = self.with_headers(self.client.request(method.clone(), &url), &desc);
        let builder = match files {
            Some(form) if method == Method::POST => {
                let mut form = form;
                if let Value::Object(map) = payload {
                    for (key, value) in map {
                        let text = match value {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        form = form.text(key.clone(), text);
                    }
                }
                builder.multipart(form)
            }
            _ => builder.json(payload),
        };

        let response = builder.send().await?;
        self.normalize(response).await
    }

    /// POST with an optional multipart file form
    pub async fn post(
        &self,
        endpoint: &str,
        payload: Option<&Value>,
        version: &str,
        files: Option<Form>,
        target: ApiTarget,
    ) -> Result<Value> {
        self.request(Method::POST, endpoint, payload, version, files, target)
            .await
    }

    /// PUT with a JSON payload
    pub async fn put(
        &self,
        endpoint: &str,
        payload: Option<&Value>,
        version: &str,
        target: ApiTarget,
    ) -> Result<Value> {
        self.request(Method::PUT, endpoint, payload, version, None, target)
            .await
    }

    /// PATCH with a JSON payload
    pub async fn patch(
        &self,
        endpoint: &str,
        payload: Option<&Value>,
        version: &str,
        target: ApiTarget,
    ) -> Result<Value> {
        self.request(Method::PATCH, endpoint, payload, version, None, target)
            .await
    }

    /// Validate credentials with a lightweight GET
    ///
    /// Lists account workspaces for the accounts target, Spark versions for
    /// the workspace target. Any status other than 200 fails with the remote
    /// reason and body text.
    pub async fn test_connection(&self, target: ApiTarget) -> Result<()> {
        let desc = self.descriptor(target);
        let endpoint = match target {
            ApiTarget::Accounts => format!("/accounts/{}/workspaces", self.profile.account_id),
            ApiTarget::Workspace => "/clusters/spark-versions".to_string(),
        };
        let url = desc.endpoint_url(api::VERSION_2_0, &endpoint);
        debug!("Test connection: {}", url);

        let response = self.with_headers(self.client.get(&url), &desc).send().await?;
        let status = response.status();
        if status.as_u16() != 200 {
            info!("Either the credentials have expired or they don't have proper permissions. Re-verify secrets");
            let reason = status.canonical_reason().unwrap_or("unknown status");
            let text = response.text().await.unwrap_or_default();
            info!("{}", text);
            return Err(SatError::Connection(
                format!("{} {}", reason, text).trim().to_string(),
            ));
        }
        Ok(())
    }

    /// Normalize a response into a uniform JSON object
    async fn normalize(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status().as_u16();
        if api::FATAL_STATUS_CODES.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(SatError::Auth { status, body });
        }

        let body: Value = response.json().await?;
        debug!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let mut map = match body {
            Value::Object(map) => map,
            Value::Array(list) => {
                let mut map = Map::new();
                map.insert("elements".to_string(), Value::Array(list));
                map
            }
            Value::Null => Map::new(),
            other => {
                return Err(SatError::Json(format!(
                    "expected a JSON object or array response, got: {}",
                    other
                )))
            }
        };
        map.insert("http_status_code".to_string(), Value::from(status));
        Ok(Value::Object(map))
    }
}

/// An empty payload means "do not send the request"
fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
impl SatClient {
    /// Create a test client pointed at a mock server
    pub fn test_client(base_url: &str) -> Self {
        let profile = SatProfile {
            url: "https://myshard.cloud.databricks.com".to_string(),
            account_id: "acc-test".to_string(),
            cluster_id: "0123-456789-test".to_string(),
            token: "dapi-test-token".to_string(),
            ..Default::default()
        };
        Self::with_base_url(profile, base_url.to_string())
    }
}

//! Current-identity query

use crate::config::api;
use crate::dbx::helpers::get_key_str;
use crate::dbx::request::ApiTarget;
use crate::dbx::SatClient;
use crate::error::Result;

impl SatClient {
    /// Get the current user name from the SCIM API
    pub async fn whoami(&self) -> Result<String> {
        let response = self
            .get(
                "/preview/scim/v2/Me",
                &[],
                api::VERSION_2_0,
                ApiTarget::Workspace,
            )
            .await?;
        Ok(get_key_str(&response, "userName")?.to_string())
    }
}

/// Run the whoami command
pub async fn run_whoami_command(
    client: &SatClient,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let user_name = client.whoami().await?;
    println!("{}", user_name);
    Ok(())
}

//! Connection test command handler

use log::debug;

use crate::dbx::request::ApiTarget;
use crate::dbx::SatClient;

/// Run the test command
///
/// Validates workspace credentials, or account-level credentials with
/// `account` set.
pub async fn run_test_command(
    client: &SatClient,
    account: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = if account {
        ApiTarget::Accounts
    } else {
        ApiTarget::Workspace
    };
    debug!("Testing connection against {:?}", target);
    client.test_connection(target).await?;

    match target {
        ApiTarget::Workspace => println!(
            "Connection OK: {} (cloud: {})",
            client.profile().url,
            client.cloud_type()
        ),
        ApiTarget::Accounts => println!(
            "Connection OK: accounts API (account {})",
            client.profile().account_id
        ),
    }
    Ok(())
}

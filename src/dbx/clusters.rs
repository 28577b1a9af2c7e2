//! Spark runtime version queries

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, SparkVersionsArgs};
use crate::config::api;
use crate::dbx::helpers::get_key;
use crate::dbx::request::ApiTarget;
use crate::dbx::SatClient;
use crate::error::Result;

/// One available Spark runtime image
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SparkVersion {
    pub key: String,
    pub name: String,
}

impl SparkVersion {
    /// Mainline releases encode the Scala version as the second
    /// hyphen-delimited segment of the key (e.g. `7.3.x-scala2.12`);
    /// specialty images (ML, GPU, photon) are encoded differently.
    pub fn is_mainline(&self) -> bool {
        self.key
            .split('-')
            .nth(1)
            .map(|segment| segment.starts_with("scala"))
            .unwrap_or(false)
    }
}

impl SatClient {
    /// List all Spark runtime versions available to the workspace
    pub async fn spark_versions(&self) -> Result<Vec<SparkVersion>> {
        let response = self
            .get(
                "/clusters/spark-versions",
                &[],
                api::VERSION_2_0,
                ApiTarget::Workspace,
            )
            .await?;
        let versions = get_key(&response, "versions")?.clone();
        Ok(serde_json::from_value(versions)?)
    }

    /// Latest mainline runtime: sort keys descending, take the first
    /// scala-tagged entry
    pub async fn latest_spark_version(&self) -> Result<Option<SparkVersion>> {
        let mut versions = self.spark_versions().await?;
        versions.sort_by(|a, b| b.key.cmp(&a.key));
        debug!("{} runtime versions available", versions.len());
        Ok(versions.into_iter().find(SparkVersion::is_mainline))
    }
}

/// Run the spark-versions command
pub async fn run_spark_versions_command(
    client: &SatClient,
    args: &SparkVersionsArgs,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    if args.all {
        let mut versions = client.spark_versions().await?;
        versions.sort_by(|a, b| b.key.cmp(&a.key));
        print_versions(&versions, args.output)?;
        return Ok(());
    }

    match client.latest_spark_version().await? {
        Some(version) => print_versions(std::slice::from_ref(&version), args.output)?,
        None => return Err("No mainline Spark runtime found".into()),
    }
    Ok(())
}

fn print_versions(
    versions: &[SparkVersion],
    output: OutputFormat,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Text => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_header(vec![Cell::new("Key"), Cell::new("Name")]);
            for version in versions {
                table.add_row(vec![
                    Cell::new(&version.key),
                    Cell::new(&version.name),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(versions)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(versions)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_mainline_detection() {
        let scala = SparkVersion {
            key: "7.3.x-scala2.12".to_string(),
            name: "7.3 LTS".to_string(),
        };
        let photon = SparkVersion {
            key: "8.0.x-photon".to_string(),
            name: "8.0 Photon".to_string(),
        };
        let ml = SparkVersion {
            key: "10.4.x-cpu-ml-scala2.12".to_string(),
            name: "10.4 LTS ML".to_string(),
        };
        let bare = SparkVersion {
            key: "nodash".to_string(),
            name: "odd".to_string(),
        };
        assert!(scala.is_mainline());
        assert!(!photon.is_mainline());
        assert!(!ml.is_mainline());
        assert!(!bare.is_mainline());
    }

    #[tokio::test]
    async fn test_latest_prefers_scala_tagged_over_lexically_greater() {
        let mock_server = MockServer::start().await;
        let client = SatClient::test_client(&mock_server.uri());

        // 8.0.x-photon sorts first lexically but is not a mainline image
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/spark-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "versions": [
                    {"key": "7.3.x-scala2.12", "name": "7.3 LTS"},
                    {"key": "8.0.x-photon", "name": "8.0 Photon"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let latest = client.latest_spark_version().await.unwrap().unwrap();
        assert_eq!(latest.key, "7.3.x-scala2.12");
    }

    #[tokio::test]
    async fn test_latest_is_highest_scala_tagged_after_descending_sort() {
        let mock_server = MockServer::start().await;
        let client = SatClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/spark-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "versions": [
                    {"key": "6.4.x-scala2.11", "name": "6.4"},
                    {"key": "7.3.x-scala2.12", "name": "7.3 LTS"},
                    {"key": "7.3.x-gpu-ml-scala2.12", "name": "7.3 LTS GPU ML"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let latest = client.latest_spark_version().await.unwrap().unwrap();
        assert_eq!(latest.key, "7.3.x-scala2.12");
    }

    #[tokio::test]
    async fn test_latest_none_when_no_mainline_image() {
        let mock_server = MockServer::start().await;
        let client = SatClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/spark-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "versions": [{"key": "8.0.x-photon", "name": "8.0 Photon"}]
            })))
            .mount(&mock_server)
            .await;

        assert!(client.latest_spark_version().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_spark_versions_missing_field() {
        let mock_server = MockServer::start().await;
        let client = SatClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/spark-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        assert!(client.spark_versions().await.is_err());
    }
}

//! Exec command handler
//!
//! Runs a command on one or more clusters, polling each until completion.
//! Multiple clusters are dispatched concurrently; each gets its own
//! execution context.

use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

use futures::future::join_all;
use log::debug;
use serde_json::Value;

use crate::cli::{ExecArgs, OutputFormat};
use crate::dbx::SatClient;
use crate::error::SatError;
use crate::ui::{create_spinner, finish_spinner};

use super::models::PollPolicy;

/// Result of running the command on one cluster
#[derive(Debug)]
pub struct ExecOutcome {
    pub cluster_id: String,
    pub results: Value,
}

impl ExecOutcome {
    /// Whether the remote command reported an in-band failure
    pub fn is_error(&self) -> bool {
        self.results.get("resultType").and_then(Value::as_str) == Some("error")
    }
}

/// Run the exec command
pub async fn run_exec_command(
    client: &SatClient,
    args: &ExecArgs,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let command = load_command(args)?;
    let clusters = resolve_clusters(client, args)?;
    let policy = PollPolicy {
        interval: Duration::from_secs(args.interval),
        max_polls: args.max_polls,
    };

    debug!(
        "Running command on {} cluster(s), poll interval {}s, max polls {:?}",
        clusters.len(),
        args.interval,
        args.max_polls
    );

    let spinner = create_spinner(
        &format!("Running command on {} cluster(s)...", clusters.len()),
        quiet,
    );

    let futures = clusters.iter().map(|cluster_id| {
        let command = &command;
        let policy = &policy;
        async move {
            match client.run_command(cluster_id, command, policy).await {
                Ok(results) => Ok(ExecOutcome {
                    cluster_id: cluster_id.clone(),
                    results,
                }),
                Err(e) => Err((cluster_id.clone(), e)),
            }
        }
    });
    let results = join_all(futures).await;

    let mut outcomes: Vec<ExecOutcome> = Vec::new();
    let mut error_count = 0;
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err((cluster_id, e)) => {
                error_count += 1;
                let msg = format!("Error running command on cluster '{}':\n  {}\n", cluster_id, e);
                if let Some(ref s) = spinner {
                    s.suspend(|| eprintln!("{}", msg));
                } else {
                    eprintln!("{}", msg);
                }
            }
        }
    }

    finish_spinner(spinner, "Done");
    print_outcomes(&outcomes, args.output)?;

    let failed = outcomes.iter().filter(|o| o.is_error()).count() + error_count;
    if failed > 0 {
        return Err(format!(
            "{} of {} cluster(s) did not complete the command successfully",
            failed,
            clusters.len()
        )
        .into());
    }
    Ok(())
}

/// The command text comes from a file or directly from the CLI
fn load_command(args: &ExecArgs) -> Result<String, SatError> {
    match (&args.file, &args.command) {
        (Some(path), _) => fs::read_to_string(path)
            .map_err(|e| SatError::Config(format!("Could not read {}: {}", path.display(), e))),
        (None, Some(command)) => Ok(command.clone()),
        (None, None) => Err(SatError::Config(
            "Provide a command to run, or --file with a script".to_string(),
        )),
    }
}

/// Explicit --cluster flags win over the profile's default cluster
fn resolve_clusters(client: &SatClient, args: &ExecArgs) -> Result<Vec<String>, SatError> {
    if !args.clusters.is_empty() {
        return Ok(args.clusters.clone());
    }
    let default = client.profile().cluster_id.clone();
    if default.is_empty() {
        return Err(SatError::Config(
            "No cluster id configured. Pass --cluster or set cluster_id in the profile"
                .to_string(),
        ));
    }
    Ok(vec![default])
}

fn print_outcomes(
    outcomes: &[ExecOutcome],
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Text => {
            for outcome in outcomes {
                let rendered = outcome
                    .results
                    .get("data")
                    .or_else(|| outcome.results.get("summary"))
                    .map(render_value)
                    .unwrap_or_else(|| outcome.results.to_string());
                println!("[{}] {}", outcome.cluster_id, rendered);
            }
        }
        OutputFormat::Json => {
            let map: BTreeMap<&str, &Value> = outcomes
                .iter()
                .map(|o| (o.cluster_id.as_str(), &o.results))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Yaml => {
            let map: BTreeMap<&str, &Value> = outcomes
                .iter()
                .map(|o| (o.cluster_id.as_str(), &o.results))
                .collect();
            print!("{}", serde_yml::to_string(&map)?);
        }
    }
    Ok(())
}

/// Strings print bare; everything else as JSON
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

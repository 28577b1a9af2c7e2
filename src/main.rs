//! dbxsat - Main entry point

use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::io::IsTerminal;

use dbxsat::{
    run_exec_command, run_spark_versions_command, run_test_command, run_whoami_command, Cli,
    Command, ProfileOverrides, ProfileResolver, SatClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        std::process::exit(2);
    };

    info!("Starting dbxsat v{}", env!("CARGO_PKG_VERSION"));

    let overrides = ProfileOverrides {
        profile_path: cli.profile.clone(),
        url: cli.url.clone(),
        account_id: cli.account_id.clone(),
        cluster_id: None,
        token: cli.token.clone(),
        use_master_creds: cli.use_master_creds,
        master_name: cli.master_user.clone(),
        master_password: cli.master_password.clone(),
    };
    let prompt = !cli.quiet && std::io::stdin().is_terminal();
    let profile = ProfileResolver::resolve(overrides, prompt)?;
    debug!(
        "Resolved profile: url={}, cloud={:?}, cluster={}",
        profile.url,
        profile.cloud_type(),
        profile.cluster_id
    );

    let client = SatClient::new(profile);

    match command {
        Command::Test { account } => run_test_command(&client, account).await?,
        Command::Whoami => run_whoami_command(&client).await?,
        Command::Exec(args) => run_exec_command(&client, &args, cli.quiet).await?,
        Command::SparkVersions(args) => run_spark_versions_command(&client, &args).await?,
    }

    info!("Completed successfully");
    Ok(())
}

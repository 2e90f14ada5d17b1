use clap::Parser as _;
use dotenvy::dotenv;
use replset::cli::{Cli, Commands, InitiateCmd, StatusCmd, ValidateCmd};
use replset::config::{AdminConfig, ConfigBuilder, DEFAULT_CONNECTION_URL};
use replset::core::client::database::mongodb::MongoAdminClient;
use replset::service::{self, InitiateOptions, WaitOptions};
use replset::utils::logging::init_logging;
use replset::{ReplSetError, ReplSetResult};
use std::time::Duration;
use tracing::{debug, error, info, info_span, Instrument};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Validate { validate_command } => {
            debug!("Executing validate command with args: {:?}", validate_command);
            run_validate(validate_command)
        }
        Commands::Initiate { initiate_command } => {
            debug!("Executing initiate command with args: {:?}", initiate_command);
            run_initiate(initiate_command).await
        }
        Commands::Status { status_command } => {
            debug!("Executing status command with args: {:?}", status_command);
            run_status(status_command).await
        }
    };

    if let Err(e) = result {
        error!(error = %e, error_chain = ?e, "replset failed");
        std::process::exit(1);
    }
}

fn run_validate(validate_cmd: &ValidateCmd) -> ReplSetResult<()> {
    let config = ConfigBuilder::new().with_source(&validate_cmd.source)?.build()?;
    let findings = service::check_config(&config, validate_cmd.check.strict)?;

    let payload = serde_json::to_string(&config.replica_set).map_err(anyhow::Error::from)?;
    info!(
        set = %config.replica_set.name,
        findings = findings.len(),
        payload = %payload,
        "Replica set config is valid"
    );
    Ok(())
}

async fn run_initiate(initiate_cmd: &InitiateCmd) -> ReplSetResult<()> {
    let config = ConfigBuilder::new()
        .with_source(&initiate_cmd.source)?
        .with_connection_url(initiate_cmd.mongodb_args.mongodb_connection_url.as_deref())?
        .build()?;

    let options = InitiateOptions {
        strict: initiate_cmd.check.strict,
        allow_existing: initiate_cmd.allow_existing,
        wait_for_primary: initiate_cmd.wait_for_primary.then(|| WaitOptions {
            timeout: Duration::from_secs(initiate_cmd.timeout),
            poll_interval: Duration::from_secs(initiate_cmd.poll_interval),
        }),
    };

    let span = info_span!("initiate", set = %config.replica_set.name);
    async {
        let admin = MongoAdminClient::new(&config.admin).await?;
        let outcome = service::initiate_replica_set(&admin, &config, &options).await?;
        info!(outcome = ?outcome, "Done");
        Ok::<(), ReplSetError>(())
    }
    .instrument(span)
    .await
}

async fn run_status(status_cmd: &StatusCmd) -> ReplSetResult<()> {
    let admin_config = AdminConfig {
        connection_url: status_cmd
            .mongodb_args
            .mongodb_connection_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CONNECTION_URL.to_string()),
        ..AdminConfig::default()
    };
    let admin = MongoAdminClient::new(&admin_config).await?;
    service::replica_set_status(&admin).await?;
    Ok(())
}

use crate::config::presets::PRESET_NAMES;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod database;

fn parse_positive_secs(s: &str) -> Result<u64, String> {
    let value: u64 = s.parse().map_err(|_| format!("'{}' is not a valid number of seconds", s))?;
    if value == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(value)
}

#[derive(Parser, Debug)]
#[command(
    name = "replset",
    version,
    about = "Initialize a MongoDB replica set from a declarative config",
    long_about = "replset builds a replica-set config, checks it locally, and submits it to a mongod with \
    replSetInitiate.\n\n\
    Quick Start:\n  \
    replset initiate --preset local-single\n\n\
    Available Presets:\n  \
    • local-single - one member on localhost:27017 (set name myReplica)\n  \
    • local-three  - three members on localhost:27017-27019 (set name my-mongo-set)",
    after_help = "Examples:\n  \
    replset validate --config-file replset.yaml --strict\n  \
    replset initiate --preset local-three --wait-for-primary\n  \
    replset status --mongodb-connection-url mongodb://localhost:27018"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a replica-set config without contacting any server
    Validate {
        #[command(flatten)]
        validate_command: ValidateCmd,
    },
    /// Submit a replica-set config with replSetInitiate
    #[command(long_about = "Validate the config, cross-check it against the client connection string, and \
        submit it to the admin node with replSetInitiate.\n\n\
        Examples:\n  \
        replset initiate --preset local-single\n  \
        replset initiate --config-file replset.yaml --allow-existing --wait-for-primary")]
    Initiate {
        #[command(flatten)]
        initiate_command: Box<InitiateCmd>,
    },
    /// Show the members and states of an initialized replica set
    Status {
        #[command(flatten)]
        status_command: StatusCmd,
    },
}

/// Where the replica-set config comes from.
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct ConfigSourceArgs {
    /// Path to YAML configuration file
    ///
    /// Example: --config-file /path/to/replset.yaml
    #[arg(env = "REPLSET_CONFIG_FILE", long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Use a built-in preset configuration
    #[arg(
        env = "REPLSET_PRESET",
        long,
        value_name = "NAME",
        value_parser = clap::builder::PossibleValuesParser::new(PRESET_NAMES)
    )]
    pub preset: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Treat every cross-check finding (e.g. a replica set name that differs from the one in the client
    /// connection string) as an error instead of a warning.
    #[arg(env = "REPLSET_STRICT", long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateCmd {
    #[command(flatten)]
    pub source: ConfigSourceArgs,

    #[command(flatten)]
    pub check: CheckArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InitiateCmd {
    #[command(flatten)]
    pub source: ConfigSourceArgs,

    #[command(flatten)]
    pub check: CheckArgs,

    #[command(flatten)]
    pub mongodb_args: database::MongoDBCliArgs,

    /// Succeed when the node already runs a replica set with the same name.
    #[arg(env = "REPLSET_ALLOW_EXISTING", long, default_value_t = false)]
    pub allow_existing: bool,

    /// Poll replSetGetStatus until a member becomes PRIMARY.
    #[arg(env = "REPLSET_WAIT_FOR_PRIMARY", long, default_value_t = false)]
    pub wait_for_primary: bool,

    /// Seconds to wait for a primary before giving up.
    #[arg(env = "REPLSET_TIMEOUT", long, default_value = "60", value_parser = parse_positive_secs)]
    pub timeout: u64,

    /// Seconds between two status polls while waiting for a primary.
    #[arg(env = "REPLSET_POLL_INTERVAL", long, default_value = "2", value_parser = parse_positive_secs)]
    pub poll_interval: u64,
}

#[derive(Args, Debug, Clone)]
pub struct StatusCmd {
    #[command(flatten)]
    pub mongodb_args: database::MongoDBCliArgs,
}

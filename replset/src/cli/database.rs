use clap::Args;

/// Parameters used to reach the node that receives admin commands.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection url of the admin node. Overrides `admin.connection_url` from the config.
    #[arg(env = "REPLSET_MONGODB_CONNECTION_URL", long)]
    pub mongodb_connection_url: Option<String>,
}

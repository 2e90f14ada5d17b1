use super::error::DatabaseError;
use super::ReplicaSetAdmin;
use crate::config::AdminConfig;
use crate::types::{ReplicaSetConfig, ReplicaSetStatus};
use async_trait::async_trait;
use mongodb::bson::{self, doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const ADMIN_DATABASE: &str = "admin";
const APP_NAME: &str = "replset";

/// `ReplicaSetAdmin` backed by the MongoDB driver.
///
/// The client always talks to a single node over a direct connection: before `replSetInitiate` succeeds there is
/// no replica set for the driver to discover.
pub struct MongoAdminClient {
    admin: Database,
}

impl MongoAdminClient {
    pub async fn new(config: &AdminConfig) -> Result<Self, DatabaseError> {
        let mut options = ClientOptions::parse(&config.connection_url).await?;
        if options.hosts.len() > 1 {
            warn!(hosts = options.hosts.len(), "Admin connection string names several hosts, using the first one");
            options.hosts.truncate(1);
        }
        options.direct_connection = Some(true);
        options.repl_set_name = None;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        let admin = client.database(ADMIN_DATABASE);
        Ok(Self { admin })
    }

    async fn run_admin_command(&self, name: &str, command: Document) -> Result<Document, DatabaseError> {
        let start = Instant::now();
        let result = self.admin.run_command(command, None).await;
        let duration = start.elapsed();
        debug!(command = name, duration_ms = %duration.as_millis(), ok = result.is_ok(), "Admin command finished");
        result.map_err(|e| DatabaseError::from_command(name, e))
    }
}

#[async_trait]
impl ReplicaSetAdmin for MongoAdminClient {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.run_admin_command("ping", doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn initiate(&self, config: &ReplicaSetConfig) -> Result<(), DatabaseError> {
        let payload = config.to_document().map_err(|e| DatabaseError::FailedToSerializeDocument(e.to_string()))?;
        self.run_admin_command("replSetInitiate", doc! { "replSetInitiate": payload }).await?;
        Ok(())
    }

    async fn current_config(&self) -> Result<ReplicaSetConfig, DatabaseError> {
        let response = self.run_admin_command("replSetGetConfig", doc! { "replSetGetConfig": 1 }).await?;
        let config = response.get_document("config").map_err(|e| DatabaseError::UnexpectedResponse {
            command: "replSetGetConfig".to_string(),
            reason: e.to_string(),
        })?;
        Ok(bson::from_document(config.clone())?)
    }

    async fn status(&self) -> Result<ReplicaSetStatus, DatabaseError> {
        let response = self.run_admin_command("replSetGetStatus", doc! { "replSetGetStatus": 1 }).await?;
        Ok(bson::from_document(response)?)
    }
}

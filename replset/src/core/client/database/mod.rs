pub mod error;
pub mod mongodb;

use crate::types::{ReplicaSetConfig, ReplicaSetStatus};
use async_trait::async_trait;
pub use error::DatabaseError;

/// Administrative operations the tool needs from a database node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplicaSetAdmin: Send + Sync {
    /// ping - Check that the node answers commands
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// initiate - Submit `config` with `replSetInitiate`
    async fn initiate(&self, config: &ReplicaSetConfig) -> Result<(), DatabaseError>;

    /// current_config - The config the node has adopted, via `replSetGetConfig`
    async fn current_config(&self) -> Result<ReplicaSetConfig, DatabaseError>;

    /// status - Membership and member states, via `replSetGetStatus`
    async fn status(&self) -> Result<ReplicaSetStatus, DatabaseError>;
}

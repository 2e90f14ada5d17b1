use crate::core::client::database::DatabaseError;
use crate::types::{ConnectionStringError, Finding, ValidationError};
use thiserror::Error;

/// Result type for replset operations
pub type ReplSetResult<T> = Result<T, ReplSetError>;

/// Error types for the replset tool
#[derive(Error, Debug)]
pub enum ReplSetError {
    #[error("Invalid replica set config: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Invalid client connection string: {0}")]
    ConnectionStringError(#[from] ConnectionStringError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Cross-check findings under `--strict`
    #[error("Config does not match the client connection string: {}", display_findings(.0))]
    CrossCheckFailed(Vec<Finding>),

    /// The node runs a different replica set than the one requested
    #[error("Node already runs replica set '{existing}', refusing to treat it as '{requested}'")]
    ExistingReplicaSetMismatch { existing: String, requested: String },

    #[error("No primary elected in replica set '{set}' after {waited_secs}s")]
    WaitForPrimaryTimeout { set: String, waited_secs: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] anyhow::Error),
}

fn display_findings(findings: &[Finding]) -> String {
    findings.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

use mongodb::bson;
use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

/// Server error codes the admin commands are expected to return.
pub mod codes {
    pub const ALREADY_INITIALIZED: i32 = 23;
    pub const NODE_NOT_FOUND: i32 = 74;
    pub const NO_REPLICATION_ENABLED: i32 = 76;
    pub const INVALID_REPLICA_SET_CONFIG: i32 = 93;
    pub const NOT_YET_INITIALIZED: i32 = 94;
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Replica set is already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Replica set config was rejected by the server: {0}")]
    InvalidReplicaSetConfig(String),

    #[error("Member host could not be reached or does not map to this node: {0}")]
    NodeNotFound(String),

    #[error("Server is not running with --replSet: {0}")]
    NoReplicationEnabled(String),

    #[error("Replica set is not yet initialized: {0}")]
    NotYetInitialized(String),

    #[error("Command {command} failed with {code_name} ({code}): {message}")]
    CommandFailed { command: String, code: i32, code_name: String, message: String },

    #[error("Mongo error: {0}")]
    MongoError(#[from] MongoError),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Unexpected response to {command}: {reason}")]
    UnexpectedResponse { command: String, reason: String },

    #[error("Failed to deserialize document: {0}")]
    FailedToDeserializeDocument(#[from] bson::de::Error),
}

impl DatabaseError {
    /// Turns a driver error for `command` into the variant matching the server's error code.
    pub fn from_command(command: &str, err: MongoError) -> Self {
        let ErrorKind::Command(cmd) = err.kind.as_ref() else {
            return DatabaseError::MongoError(err);
        };
        Self::from_server_code(command, cmd.code, &cmd.code_name, &cmd.message)
    }

    pub fn from_server_code(command: &str, code: i32, code_name: &str, message: &str) -> Self {
        let message = message.to_string();
        match code {
            codes::ALREADY_INITIALIZED => DatabaseError::AlreadyInitialized(message),
            codes::INVALID_REPLICA_SET_CONFIG => DatabaseError::InvalidReplicaSetConfig(message),
            codes::NODE_NOT_FOUND => DatabaseError::NodeNotFound(message),
            codes::NO_REPLICATION_ENABLED => DatabaseError::NoReplicationEnabled(message),
            codes::NOT_YET_INITIALIZED => DatabaseError::NotYetInitialized(message),
            code => DatabaseError::CommandFailed {
                command: command.to_string(),
                code,
                code_name: code_name.to_string(),
                message,
            },
        }
    }
}

use crate::types::host::HostAddress;
use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Highest member `_id` the server accepts.
pub const MAX_MEMBER_ID: i32 = 255;
/// Highest member priority the server accepts.
pub const MAX_MEMBER_PRIORITY: f64 = 1000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Replica set name must not be empty")]
    EmptySetName,

    #[error("Replica set name '{0}' must not contain '/' or whitespace")]
    InvalidSetName(String),

    #[error("Replica set '{0}' has no members")]
    NoMembers(String),

    #[error("Member _id {0} is out of range 0..={max}", max = MAX_MEMBER_ID)]
    MemberIdOutOfRange(i32),

    #[error("Member _id {0} is used more than once")]
    DuplicateMemberId(i32),

    #[error("Host {0} is listed by more than one member")]
    DuplicateHost(String),

    #[error("Member {id} has invalid votes {votes}, expected 0 or 1")]
    InvalidVotes { id: i32, votes: i32 },

    #[error("Member {id} has invalid priority {priority}")]
    InvalidPriority { id: i32, priority: f64 },

    #[error("Arbiter member {0} must have priority 0")]
    ArbiterWithPriority(i32),

    #[error("Failed to serialize replica set config: {0}")]
    Serialization(String),
}

/// One participating server of a replica set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberConfig {
    #[serde(rename = "_id")]
    pub id: i32,
    pub host: HostAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i32>,
    #[serde(default, rename = "arbiterOnly", skip_serializing_if = "Option::is_none")]
    pub arbiter_only: Option<bool>,
}

impl MemberConfig {
    pub fn new(id: i32, host: HostAddress) -> Self {
        Self { id, host, priority: None, votes: None, arbiter_only: None }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=MAX_MEMBER_ID).contains(&self.id) {
            return Err(ValidationError::MemberIdOutOfRange(self.id));
        }
        if let Some(votes) = self.votes {
            if votes != 0 && votes != 1 {
                return Err(ValidationError::InvalidVotes { id: self.id, votes });
            }
        }
        if let Some(priority) = self.priority {
            if !priority.is_finite() || !(0.0..=MAX_MEMBER_PRIORITY).contains(&priority) {
                return Err(ValidationError::InvalidPriority { id: self.id, priority });
            }
            if self.arbiter_only == Some(true) && priority != 0.0 {
                return Err(ValidationError::ArbiterWithPriority(self.id));
            }
        }
        Ok(())
    }
}

/// The document submitted with `replSetInitiate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
    #[serde(rename = "_id")]
    pub name: String,
    pub members: Vec<MemberConfig>,
}

impl ReplicaSetConfig {
    pub fn new(name: impl Into<String>, members: Vec<MemberConfig>) -> Self {
        Self { name: name.into(), members }
    }

    /// Checks the invariants the server would otherwise reject the config for.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptySetName);
        }
        if self.name.chars().any(|c| c == '/' || c.is_whitespace()) {
            return Err(ValidationError::InvalidSetName(self.name.clone()));
        }
        if self.members.is_empty() {
            return Err(ValidationError::NoMembers(self.name.clone()));
        }

        let mut ids = HashSet::with_capacity(self.members.len());
        let mut hosts = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            member.validate()?;
            if !ids.insert(member.id) {
                return Err(ValidationError::DuplicateMemberId(member.id));
            }
            if !hosts.insert(&member.host) {
                return Err(ValidationError::DuplicateHost(member.host.to_string()));
            }
        }
        Ok(())
    }

    pub fn hosts(&self) -> impl Iterator<Item = &HostAddress> {
        self.members.iter().map(|m| &m.host)
    }

    /// BSON form of the config, as sent to the server.
    pub fn to_document(&self) -> Result<Document, ValidationError> {
        match bson::to_bson(self).map_err(|e| ValidationError::Serialization(e.to_string()))? {
            Bson::Document(doc) => Ok(doc),
            other => Err(ValidationError::Serialization(format!("expected a document, got {}", other))),
        }
    }
}

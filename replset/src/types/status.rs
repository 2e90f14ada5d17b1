use serde::{Deserialize, Serialize};
use std::fmt;

/// Member state as reported by `replSetGetStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    Startup,
    Primary,
    Secondary,
    Recovering,
    #[strum(serialize = "STARTUP2")]
    Startup2,
    Unknown,
    Arbiter,
    Down,
    Rollback,
    Removed,
}

impl MemberState {
    /// Maps the numeric `state` field. Unassigned codes read as `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => MemberState::Startup,
            1 => MemberState::Primary,
            2 => MemberState::Secondary,
            3 => MemberState::Recovering,
            5 => MemberState::Startup2,
            7 => MemberState::Arbiter,
            8 => MemberState::Down,
            9 => MemberState::Rollback,
            10 => MemberState::Removed,
            _ => MemberState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatus {
    #[serde(rename = "_id")]
    pub id: i32,
    pub name: String,
    #[serde(rename = "state")]
    pub state_code: i32,
    #[serde(rename = "stateStr", default)]
    pub state_str: Option<String>,
    #[serde(default)]
    pub health: Option<f64>,
}

impl MemberStatus {
    pub fn state(&self) -> MemberState {
        MemberState::from_code(self.state_code)
    }

    pub fn is_healthy(&self) -> bool {
        self.health.map(|h| h >= 1.0).unwrap_or(false)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.id, self.name, self.state())
    }
}

/// The subset of `replSetGetStatus` output this tool reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    pub set: String,
    #[serde(default)]
    pub members: Vec<MemberStatus>,
}

impl ReplicaSetStatus {
    pub fn primary(&self) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.state() == MemberState::Primary)
    }
}

//! The replica-set workflows behind each subcommand.
//!
//! Every function takes the admin client as `&dyn ReplicaSetAdmin` so the flows can be driven by a mock in tests.

use crate::config::BootstrapConfig;
use crate::core::client::database::{DatabaseError, ReplicaSetAdmin};
use crate::error::{ReplSetError, ReplSetResult};
use crate::types::{cross_check, Finding, HostAddress, MemberStatus, ReplicaSetConfig, ReplicaSetStatus};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What `initiate_replica_set` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiateOutcome {
    /// The node accepted the config.
    Initiated,
    /// The node already ran a replica set with the requested name.
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitiateOptions {
    pub strict: bool,
    pub allow_existing: bool,
    pub wait_for_primary: Option<WaitOptions>,
}

/// Validate the replica-set config and cross-check it against the client connection string.
///
/// Findings are logged and returned. With `strict`, any finding fails the check.
pub fn check_config(config: &BootstrapConfig, strict: bool) -> ReplSetResult<Vec<Finding>> {
    config.replica_set.validate()?;

    let findings = match config.client_connection_string()? {
        Some(uri) => cross_check(&config.replica_set, &uri),
        None => {
            debug!("No client connection string configured, skipping cross-check");
            Vec::new()
        }
    };

    for finding in &findings {
        warn!(set = %config.replica_set.name, finding = %finding, "Replica set config cross-check");
    }

    if strict && !findings.is_empty() {
        return Err(ReplSetError::CrossCheckFailed(findings));
    }
    Ok(findings)
}

/// Submit the config with `replSetInitiate`.
///
/// Local checks run first, so a malformed config never reaches the server.
pub async fn initiate_replica_set(
    admin: &dyn ReplicaSetAdmin,
    config: &BootstrapConfig,
    options: &InitiateOptions,
) -> ReplSetResult<InitiateOutcome> {
    let replica_set = &config.replica_set;
    check_config(config, options.strict)?;

    admin.ping().await?;
    debug!("Admin node answered ping");

    info!(set = %replica_set.name, members = replica_set.members.len(), "Initiating replica set");
    let outcome = match admin.initiate(replica_set).await {
        Ok(()) => {
            info!(set = %replica_set.name, "Replica set initiated");
            InitiateOutcome::Initiated
        }
        Err(DatabaseError::AlreadyInitialized(message)) if options.allow_existing => {
            let existing = admin.current_config().await?;
            if existing.name != replica_set.name {
                return Err(ReplSetError::ExistingReplicaSetMismatch {
                    existing: existing.name,
                    requested: replica_set.name.clone(),
                });
            }
            if membership(&existing) != membership(replica_set) {
                warn!(set = %existing.name, "Existing replica set has different members, leaving them untouched");
            }
            info!(set = %existing.name, reason = %message, "Replica set already initialized");
            InitiateOutcome::AlreadyInitialized
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(wait) = options.wait_for_primary {
        wait_for_primary(admin, &replica_set.name, wait).await?;
    }

    Ok(outcome)
}

fn membership(config: &ReplicaSetConfig) -> Vec<(i32, &HostAddress)> {
    config.members.iter().map(|m| (m.id, &m.host)).collect()
}

/// Poll `replSetGetStatus` until some member reports PRIMARY.
///
/// `NotYetInitialized` answers are expected right after `replSetInitiate` and are retried; other errors abort.
pub async fn wait_for_primary(
    admin: &dyn ReplicaSetAdmin,
    set: &str,
    options: WaitOptions,
) -> ReplSetResult<MemberStatus> {
    let start = Instant::now();
    info!(set = %set, timeout_secs = options.timeout.as_secs(), "Waiting for a primary");

    loop {
        match admin.status().await {
            Ok(status) => {
                if let Some(primary) = status.primary() {
                    let waited_ms = start.elapsed().as_millis();
                    info!(set = %set, primary = %primary.name, waited_ms = %waited_ms, "Primary elected");
                    return Ok(primary.clone());
                }
                debug!(set = %set, members = status.members.len(), "No primary yet");
            }
            Err(DatabaseError::NotYetInitialized(message)) => {
                debug!(set = %set, reason = %message, "Replica set config not yet applied");
            }
            Err(e) => return Err(e.into()),
        }

        if start.elapsed() >= options.timeout {
            return Err(ReplSetError::WaitForPrimaryTimeout {
                set: set.to_string(),
                waited_secs: options.timeout.as_secs(),
            });
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

/// Fetch and log the state of every member.
pub async fn replica_set_status(admin: &dyn ReplicaSetAdmin) -> ReplSetResult<ReplicaSetStatus> {
    let status = admin.status().await?;
    info!(set = %status.set, members = status.members.len(), "Replica set status");
    for member in &status.members {
        info!(
            id = member.id,
            host = %member.name,
            state = %member.state(),
            healthy = member.is_healthy(),
            "Member"
        );
    }
    if status.primary().is_none() {
        warn!(set = %status.set, "Replica set has no primary");
    }
    Ok(status)
}

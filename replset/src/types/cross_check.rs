use crate::types::connection_string::ConnectionString;
use crate::types::host::HostAddress;
use crate::types::replica_set::ReplicaSetConfig;
use std::fmt;

/// A disagreement between a replica-set config and the connection string clients will use to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The connection string has no `replicaSet` option, so clients will not discover the set.
    MissingReplicaSetOption,
    /// The set name clients ask for is not the one being initiated.
    NameMismatch { config: String, connection_string: String },
    /// A configured member that clients will not use as a seed.
    MemberNotInSeedList(HostAddress),
    /// A seed host that is not a member of the configured set.
    SeedNotInMembers(HostAddress),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingReplicaSetOption => write!(f, "connection string has no replicaSet option"),
            Finding::NameMismatch { config, connection_string } => write!(
                f,
                "replica set name '{}' does not match replicaSet '{}' in the connection string",
                config, connection_string
            ),
            Finding::MemberNotInSeedList(host) => write!(f, "member {} is not in the connection string", host),
            Finding::SeedNotInMembers(host) => {
                write!(f, "connection string host {} is not a member of the replica set", host)
            }
        }
    }
}

/// Compares `config` against `uri` and returns every disagreement, in a stable order: name first, then members
/// missing from the seed list, then seeds that are not members.
///
/// SRV strings resolve their hosts through DNS, so host comparison is skipped for them.
pub fn cross_check(config: &ReplicaSetConfig, uri: &ConnectionString) -> Vec<Finding> {
    let mut findings = Vec::new();

    match uri.replica_set() {
        None => findings.push(Finding::MissingReplicaSetOption),
        Some(name) if name != config.name => findings.push(Finding::NameMismatch {
            config: config.name.clone(),
            connection_string: name.to_string(),
        }),
        Some(_) => {}
    }

    if uri.is_srv() {
        return findings;
    }

    findings.extend(
        config.hosts().filter(|host| !uri.hosts().contains(*host)).cloned().map(Finding::MemberNotInSeedList),
    );
    findings.extend(
        uri.hosts()
            .iter()
            .filter(|seed| !config.hosts().any(|host| host == *seed))
            .cloned()
            .map(Finding::SeedNotInMembers),
    );

    findings
}

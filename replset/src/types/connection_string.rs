use crate::types::host::{HostAddress, HostAddressError};
use percent_encoding::percent_decode_str;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SCHEME: &str = "mongodb://";
const SRV_SCHEME: &str = "mongodb+srv://";
const REPLICA_SET_OPTION: &str = "replicaset";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("Connection string must start with 'mongodb://' or 'mongodb+srv://'")]
    InvalidScheme,

    #[error("Connection string names no hosts")]
    NoHosts,

    #[error("Invalid host in connection string: {0}")]
    InvalidHost(#[from] HostAddressError),

    #[error("SRV connection string must name exactly one host")]
    SrvWithMultipleHosts,

    #[error("Connection string option '{0}' has no value")]
    MissingOptionValue(String),
}

/// A parsed client connection string.
///
/// Only the parts needed to reason about replica-set membership are kept. The password itself is dropped, only
/// its presence is remembered so that `Display` can mask it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    srv: bool,
    username: Option<String>,
    has_password: bool,
    hosts: Vec<HostAddress>,
    default_database: Option<String>,
    options: Vec<(String, String)>,
}

impl ConnectionString {
    pub fn is_srv(&self) -> bool {
        self.srv
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn hosts(&self) -> &[HostAddress] {
        &self.hosts
    }

    pub fn default_database(&self) -> Option<&str> {
        self.default_database.as_deref()
    }

    /// Looks an option up by name. Option names are case-insensitive.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    /// The replica set the client expects to find, if the string names one.
    pub fn replica_set(&self) -> Option<&str> {
        self.option(REPLICA_SET_OPTION)
    }
}

impl FromStr for ConnectionString {
    type Err = ConnectionStringError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (srv, rest) = if let Some(rest) = input.strip_prefix(SRV_SCHEME) {
            (true, rest)
        } else if let Some(rest) = input.strip_prefix(SCHEME) {
            (false, rest)
        } else {
            return Err(ConnectionStringError::InvalidScheme);
        };

        let (before_query, query) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = match before_query.split_once('/') {
            Some((authority, path)) => (authority, Some(path)),
            None => (before_query, None),
        };

        // Passwords may contain '@' only when percent-encoded, so the last '@' ends the userinfo.
        let (userinfo, host_list) = match authority.rsplit_once('@') {
            Some((userinfo, hosts)) => (Some(userinfo), hosts),
            None => (None, authority),
        };
        let (username, has_password) = match userinfo {
            Some(info) => match info.split_once(':') {
                Some((user, _)) => (Some(decode(user)), true),
                None => (Some(decode(info)), false),
            },
            None => (None, false),
        };

        if host_list.is_empty() {
            return Err(ConnectionStringError::NoHosts);
        }
        let hosts = host_list.split(',').map(HostAddress::from_str).collect::<Result<Vec<_>, _>>()?;
        if srv && hosts.len() != 1 {
            return Err(ConnectionStringError::SrvWithMultipleHosts);
        }

        let default_database = path.filter(|p| !p.is_empty()).map(decode);

        let mut options = Vec::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                match pair.split_once('=') {
                    Some((key, value)) if !value.is_empty() => {
                        options.push((decode(key), decode(value)));
                    }
                    Some((key, _)) => return Err(ConnectionStringError::MissingOptionValue(decode(key))),
                    None => return Err(ConnectionStringError::MissingOptionValue(decode(pair))),
                }
            }
        }

        Ok(Self { srv, username, has_password, hosts, default_database, options })
    }
}

// RFC 3986 percent-decoding: unlike form encoding, '+' stays a literal plus.
fn decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.srv { SRV_SCHEME } else { SCHEME })?;
        if let Some(user) = &self.username {
            write!(f, "{}", user)?;
            if self.has_password {
                f.write_str(":****")?;
            }
            f.write_str("@")?;
        }
        let hosts: Vec<String> = self.hosts.iter().map(ToString::to_string).collect();
        f.write_str(&hosts.join(","))?;
        if self.default_database.is_some() || !self.options.is_empty() {
            f.write_str("/")?;
        }
        if let Some(db) = &self.default_database {
            f.write_str(db)?;
        }
        if !self.options.is_empty() {
            let query: Vec<String> = self.options.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            write!(f, "?{}", query.join("&"))?;
        }
        Ok(())
    }
}

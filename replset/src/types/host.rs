use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Port a mongod listens on when none is given.
pub const DEFAULT_PORT: u16 = 27017;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostAddressError {
    #[error("Host address is empty")]
    Empty,

    #[error("Invalid port in host address '{0}'")]
    InvalidPort(String),

    #[error("Unterminated IPv6 literal in host address '{0}'")]
    UnterminatedIpv6(String),

    #[error("Invalid character in host address '{0}'")]
    InvalidCharacter(String),
}

/// A network address of a replica-set member, normalized to `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct HostAddress {
    host: String,
    port: u16,
}

impl HostAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }
}

fn parse_port(port: &str, input: &str) -> Result<u16, HostAddressError> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(HostAddressError::InvalidPort(input.to_string())),
        Ok(port) => Ok(port),
    }
}

impl FromStr for HostAddress {
    type Err = HostAddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(HostAddressError::Empty);
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == '/' || c == ',' || c == '@') {
            return Err(HostAddressError::InvalidCharacter(input.to_string()));
        }

        // [::1]:27017
        if let Some(rest) = trimmed.strip_prefix('[') {
            let (host, after) =
                rest.split_once(']').ok_or_else(|| HostAddressError::UnterminatedIpv6(input.to_string()))?;
            if host.is_empty() {
                return Err(HostAddressError::Empty);
            }
            let port = match after {
                "" => DEFAULT_PORT,
                p => parse_port(
                    p.strip_prefix(':').ok_or_else(|| HostAddressError::InvalidCharacter(input.to_string()))?,
                    input,
                )?,
            };
            return Ok(Self::new(host.to_lowercase(), port));
        }

        match trimmed.rsplit_once(':') {
            Some((host, _)) if host.contains(':') => Err(HostAddressError::InvalidCharacter(input.to_string())),
            Some(("", _)) => Err(HostAddressError::Empty),
            Some((host, port)) => Ok(Self::new(host.to_lowercase(), parse_port(port, input)?)),
            None => Ok(Self::new(trimmed.to_lowercase(), DEFAULT_PORT)),
        }
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

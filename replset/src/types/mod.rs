pub mod connection_string;
pub mod cross_check;
pub mod host;
pub mod replica_set;
pub mod status;

pub use connection_string::{ConnectionString, ConnectionStringError};
pub use cross_check::{cross_check, Finding};
pub use host::{HostAddress, HostAddressError};
pub use replica_set::{MemberConfig, ReplicaSetConfig, ValidationError};
pub use status::{MemberState, MemberStatus, ReplicaSetStatus};

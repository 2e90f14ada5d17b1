//! Properties of the built-in `local-single` preset: the set it initiates and the connection string clients
//! are expected to use.

use crate::config::presets::PresetRegistry;
use crate::config::BootstrapConfig;
use crate::types::{cross_check, ConnectionString, Finding, HostAddress};
use rstest::*;
use std::collections::HashSet;

#[fixture]
fn local_single() -> BootstrapConfig {
    PresetRegistry::default().load_preset("local-single").expect("local-single preset must load")
}

#[fixture]
fn client_uri(local_single: BootstrapConfig) -> ConnectionString {
    local_single.client_connection_string().unwrap().expect("local-single names a client connection string")
}

#[rstest]
fn members_hold_exactly_one_localhost_descriptor(local_single: BootstrapConfig) {
    let members = &local_single.replica_set.members;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, 0);
    assert_eq!(members[0].host.to_string(), "localhost:27017");
}

#[rstest]
fn replica_set_identifier_is_my_replica(local_single: BootstrapConfig) {
    assert_eq!(local_single.replica_set.name, "myReplica");
}

#[rstest]
fn payload_is_the_literal_initiate_document(local_single: BootstrapConfig) {
    let payload = serde_json::to_value(&local_single.replica_set).unwrap();
    let expected = serde_json::json!({ "_id": "myReplica", "members": [{ "_id": 0, "host": "localhost:27017" }] });
    assert_eq!(payload, expected);
}

#[rstest]
fn connection_string_names_three_distinct_hosts(client_uri: ConnectionString) {
    let expected: Vec<HostAddress> =
        ["localhost:27017", "localhost:27018", "localhost:27019"].iter().map(|h| h.parse().unwrap()).collect();
    assert_eq!(client_uri.hosts(), expected.as_slice());

    let distinct: HashSet<_> = client_uri.hosts().iter().collect();
    assert_eq!(distinct.len(), 3);
}

#[rstest]
fn connection_string_names_my_mongo_set(client_uri: ConnectionString) {
    assert_eq!(client_uri.replica_set(), Some("my-mongo-set"));
    assert_eq!(client_uri.default_database(), Some("test"));
}

/// The set being initiated and the set clients ask for disagree. The check must surface this rather than
/// assume either name is the intended one.
#[rstest]
fn cross_check_surfaces_the_name_mismatch(local_single: BootstrapConfig, client_uri: ConnectionString) {
    let findings = cross_check(&local_single.replica_set, &client_uri);
    assert_eq!(
        findings.first(),
        Some(&Finding::NameMismatch { config: "myReplica".to_string(), connection_string: "my-mongo-set".to_string() })
    );
}

#[rstest]
fn three_member_preset_agrees_with_its_connection_string() {
    let config = PresetRegistry::default().load_preset("local-three").unwrap();
    let uri = config.client_connection_string().unwrap().unwrap();
    assert!(cross_check(&config.replica_set, &uri).is_empty());
}

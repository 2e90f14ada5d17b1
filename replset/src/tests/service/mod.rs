use crate::core::client::database::{DatabaseError, MockReplicaSetAdmin};
use crate::error::ReplSetError;
use crate::service::{
    check_config, initiate_replica_set, replica_set_status, wait_for_primary, InitiateOptions, InitiateOutcome,
    WaitOptions,
};
use crate::tests::common::{bootstrap_config, reachable_admin, status_with_states};
use crate::types::{Finding, ValidationError};
use assert_matches::assert_matches;
use mockall::predicate::always;
use mockall::Sequence;
use rstest::*;
use std::time::Duration;

const SINGLE_URI: &str = "mongodb://localhost:27017/?replicaSet=rs0";

fn wait_options() -> WaitOptions {
    WaitOptions { timeout: Duration::from_secs(10), poll_interval: Duration::from_secs(1) }
}

#[rstest]
fn check_config_returns_findings_as_warnings() {
    let config = bootstrap_config(
        "myReplica",
        &["localhost:27017"],
        Some("mongodb://localhost:27017,localhost:27018,localhost:27019/test?replicaSet=my-mongo-set"),
    );
    let findings = check_config(&config, false).unwrap();
    assert_eq!(findings.len(), 3);
    assert_matches!(findings[0], Finding::NameMismatch { .. });
}

#[rstest]
fn check_config_without_connection_string_has_nothing_to_compare() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    assert!(check_config(&config, true).unwrap().is_empty());
}

#[rstest]
fn check_config_rejects_unparsable_connection_string() {
    let config = bootstrap_config("rs0", &["localhost:27017"], Some("localhost:27017"));
    assert_matches!(check_config(&config, false), Err(ReplSetError::ConnectionStringError(_)));
}

#[rstest]
#[tokio::test]
async fn initiate_submits_the_config() {
    let config = bootstrap_config("rs0", &["localhost:27017"], Some(SINGLE_URI));
    let mut admin = reachable_admin();
    admin
        .expect_initiate()
        .withf(|c| c.name == "rs0" && c.members.len() == 1 && c.members[0].host.to_string() == "localhost:27017")
        .times(1)
        .returning(|_| Ok(()));

    let outcome = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await.unwrap();
    assert_eq!(outcome, InitiateOutcome::Initiated);
}

#[rstest]
#[tokio::test]
async fn initiate_with_mismatched_name_warns_but_proceeds() {
    let config = bootstrap_config("myReplica", &["localhost:27017"], Some("mongodb://localhost:27017/?replicaSet=x"));
    let mut admin = reachable_admin();
    admin.expect_initiate().times(1).returning(|_| Ok(()));

    let outcome = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await.unwrap();
    assert_eq!(outcome, InitiateOutcome::Initiated);
}

#[rstest]
#[tokio::test]
async fn strict_initiate_stops_before_contacting_the_server() {
    let config = bootstrap_config("myReplica", &["localhost:27017"], Some("mongodb://localhost:27017/?replicaSet=x"));
    // no expectations: any call panics
    let admin = MockReplicaSetAdmin::new();

    let options = InitiateOptions { strict: true, ..Default::default() };
    let result = initiate_replica_set(&admin, &config, &options).await;
    assert_matches!(result, Err(ReplSetError::CrossCheckFailed(findings)) if findings.len() == 1);
}

#[rstest]
#[case::no_members(&[], ValidationError::NoMembers("rs0".to_string()))]
#[case::duplicate_hosts(&["a:27017", "a"], ValidationError::DuplicateHost("a:27017".to_string()))]
#[tokio::test]
async fn invalid_config_never_reaches_the_server(#[case] hosts: &[&str], #[case] expected: ValidationError) {
    let config = bootstrap_config("rs0", hosts, None);
    let admin = MockReplicaSetAdmin::new();

    let result = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await;
    assert_matches!(result, Err(ReplSetError::ValidationError(e)) if e == expected);
}

#[rstest]
#[tokio::test]
async fn duplicate_member_ids_are_rejected() {
    let mut config = bootstrap_config("rs0", &["a:27017", "b:27017"], None);
    config.replica_set.members[1].id = 0;
    let admin = MockReplicaSetAdmin::new();

    let result = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await;
    assert_matches!(result, Err(ReplSetError::ValidationError(ValidationError::DuplicateMemberId(0))));
}

#[rstest]
#[tokio::test]
async fn unreachable_admin_node_fails_before_initiate() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    let mut admin = MockReplicaSetAdmin::new();
    admin.expect_ping().times(1).returning(|| {
        Err(DatabaseError::CommandFailed {
            command: "ping".to_string(),
            code: 13,
            code_name: "Unauthorized".to_string(),
            message: "command ping requires authentication".to_string(),
        })
    });
    admin.expect_initiate().never();

    let result = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await;
    assert_matches!(result, Err(ReplSetError::DatabaseError(DatabaseError::CommandFailed { code: 13, .. })));
}

#[rstest]
#[tokio::test]
async fn server_faults_are_surfaced_as_is() {
    let config = bootstrap_config("rs0", &["localhost:27017", "localhost:27018"], None);
    let mut admin = reachable_admin();
    admin.expect_initiate().with(always()).returning(|_| {
        Err(DatabaseError::NodeNotFound("replSetInitiate quorum check failed".to_string()))
    });

    let result = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await;
    assert_matches!(result, Err(ReplSetError::DatabaseError(DatabaseError::NodeNotFound(_))));
}

#[rstest]
#[tokio::test]
async fn already_initialized_is_an_error_by_default() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    let mut admin = reachable_admin();
    admin.expect_initiate().returning(|_| Err(DatabaseError::AlreadyInitialized("already initialized".to_string())));
    admin.expect_current_config().never();

    let result = initiate_replica_set(&admin, &config, &InitiateOptions::default()).await;
    assert_matches!(result, Err(ReplSetError::DatabaseError(DatabaseError::AlreadyInitialized(_))));
}

#[rstest]
#[tokio::test]
async fn already_initialized_with_same_name_is_accepted_when_allowed() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    let existing = config.replica_set.clone();
    let mut admin = reachable_admin();
    admin.expect_initiate().returning(|_| Err(DatabaseError::AlreadyInitialized("already initialized".to_string())));
    admin.expect_current_config().times(1).returning(move || Ok(existing.clone()));

    let options = InitiateOptions { allow_existing: true, ..Default::default() };
    let outcome = initiate_replica_set(&admin, &config, &options).await.unwrap();
    assert_eq!(outcome, InitiateOutcome::AlreadyInitialized);
}

#[rstest]
#[tokio::test]
async fn already_initialized_with_other_name_is_refused() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    let existing = bootstrap_config("legacy", &["localhost:27017"], None).replica_set;
    let mut admin = reachable_admin();
    admin.expect_initiate().returning(|_| Err(DatabaseError::AlreadyInitialized("already initialized".to_string())));
    admin.expect_current_config().returning(move || Ok(existing.clone()));

    let options = InitiateOptions { allow_existing: true, ..Default::default() };
    let result = initiate_replica_set(&admin, &config, &options).await;
    assert_matches!(
        result,
        Err(ReplSetError::ExistingReplicaSetMismatch { existing, requested })
            if existing == "legacy" && requested == "rs0"
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn initiate_waits_for_a_primary() {
    let config = bootstrap_config("rs0", &["localhost:27017"], None);
    let mut admin = reachable_admin();
    let mut seq = Sequence::new();
    admin.expect_initiate().times(1).in_sequence(&mut seq).returning(|_| Ok(()));
    admin
        .expect_status()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(DatabaseError::NotYetInitialized("no replset config has been received".to_string())));
    // STARTUP2, then SECONDARY, then PRIMARY
    admin.expect_status().times(1).in_sequence(&mut seq).returning(|| Ok(status_with_states("rs0", &[5])));
    admin.expect_status().times(1).in_sequence(&mut seq).returning(|| Ok(status_with_states("rs0", &[2])));
    admin.expect_status().times(1).in_sequence(&mut seq).returning(|| Ok(status_with_states("rs0", &[1])));

    let options = InitiateOptions { wait_for_primary: Some(wait_options()), ..Default::default() };
    let outcome = initiate_replica_set(&admin, &config, &options).await.unwrap();
    assert_eq!(outcome, InitiateOutcome::Initiated);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_for_primary_returns_the_primary_member() {
    let mut admin = MockReplicaSetAdmin::new();
    admin.expect_status().returning(|| Ok(status_with_states("rs0", &[2, 1, 2])));

    let primary = wait_for_primary(&admin, "rs0", wait_options()).await.unwrap();
    assert_eq!(primary.id, 1);
    assert_eq!(primary.name, "localhost:27018");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_for_primary_times_out() {
    let mut admin = MockReplicaSetAdmin::new();
    admin.expect_status().returning(|| Ok(status_with_states("rs0", &[2, 2])));

    let result = wait_for_primary(&admin, "rs0", wait_options()).await;
    assert_matches!(result, Err(ReplSetError::WaitForPrimaryTimeout { waited_secs: 10, .. }));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_for_primary_stops_on_unexpected_errors() {
    let mut admin = MockReplicaSetAdmin::new();
    admin
        .expect_status()
        .times(1)
        .returning(|| Err(DatabaseError::NoReplicationEnabled("not running with --replSet".into())));

    let result = wait_for_primary(&admin, "rs0", wait_options()).await;
    assert_matches!(result, Err(ReplSetError::DatabaseError(DatabaseError::NoReplicationEnabled(_))));
}

#[rstest]
#[tokio::test]
async fn status_reports_every_member() {
    let mut admin = MockReplicaSetAdmin::new();
    admin.expect_status().times(1).returning(|| Ok(status_with_states("rs0", &[1, 2, 7])));

    let status = replica_set_status(&admin).await.unwrap();
    assert_eq!(status.set, "rs0");
    assert_eq!(status.members.len(), 3);
    assert_eq!(status.primary().map(|m| m.id), Some(0));
}

#[rstest]
#[tokio::test]
async fn status_of_uninitialized_node_is_an_error() {
    let mut admin = MockReplicaSetAdmin::new();
    admin.expect_status().returning(|| Err(DatabaseError::NotYetInitialized("no replset config".into())));

    assert_matches!(
        replica_set_status(&admin).await,
        Err(ReplSetError::DatabaseError(DatabaseError::NotYetInitialized(_)))
    );
}

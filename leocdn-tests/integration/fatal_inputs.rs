//! Malformed inputs and configuration end the run.

use leocdn_core::{InputError, LeocdnError};
use leocdn_sim::{SimError, StrategyError, run_workload};

use crate::fixture::WorkloadFixture;

#[tokio::test]
async fn test_size_without_decimal_suffix_is_fatal() {
    let fixture = WorkloadFixture::new(1, 87, "");
    fixture.write_tables(&[(1, 500)], &[50]);
    fixture.write_step(0, "1,500.5,-1|20|30\n");

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(
        err,
        SimError::Input(InputError::MissingDecimalSuffix { .. })
    ));
}

#[tokio::test]
async fn test_single_node_path_is_fatal() {
    let fixture = WorkloadFixture::new(1, 87, "");
    fixture.write_tables(&[(1, 500)], &[50]);
    fixture.write_step(0, "1,500.0,-1\n");

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(
        err,
        SimError::Input(InputError::PathTooShort { item: 1, length: 1 })
    ));
}

#[tokio::test]
async fn test_missing_step_file_is_fatal() {
    let fixture = WorkloadFixture::new(2, 87, "");
    fixture.write_tables(&[(1, 500)], &[50]);
    fixture.write_step(0, "1,500.0,-1|20|30\n");

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(err, SimError::Input(InputError::Open { .. })));
}

#[tokio::test]
async fn test_replica_offset_too_small_is_fatal() {
    let fixture = WorkloadFixture::new(
        1,
        87,
        "ground_station_capacities = [10]\nreplica_id_offset = 5",
    );
    fixture.write_tables(&[(1, 500)], &[100]);
    fixture.write_step(0, "1,500.0,-1|20|30\n");

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(
        err,
        SimError::Strategy(StrategyError::ReplicaOffsetTooSmall { replicas: 10, .. })
    ));
}

#[tokio::test]
async fn test_missing_tables_fail_before_any_step() {
    let fixture = WorkloadFixture::new(1, 87, "");
    fixture.write_step(0, "1,500.0,-1|20|30\n");

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(
        err,
        SimError::Load(LeocdnError::Input(InputError::Open { .. }))
    ));
    assert!(!fixture.root().join("cache").exists());
}

#[tokio::test]
async fn test_unwritable_output_dir_reports_artifact_error() {
    let fixture = WorkloadFixture::new(3, 87, "");
    fixture.write_tables(&[(1, 500)], &[50]);
    for time in [0, 87, 174] {
        fixture.write_step(time, "1,500.0,-1|20|30\n");
    }
    std::fs::write(fixture.root().join("cache"), "").unwrap();

    let err = run_workload(&fixture.run_config().await).await.unwrap_err();

    assert!(matches!(err, SimError::Artifact { .. }), "{err}");
}

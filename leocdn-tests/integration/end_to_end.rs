//! Full runs checked against hand-computed artifacts.

use leocdn_core::OutputMode;
use leocdn_sim::run_workload;

use crate::fixture::WorkloadFixture;

const SATELLITES: f64 = 66.0 * 24.0;

/// Two 87 s steps, each requesting item 1 (500 bytes) from ground station -1 via 20 and 30.
fn repeated_request() -> WorkloadFixture {
    let fixture = WorkloadFixture::new(2, 87, "ground_station_capacities = [100]");
    fixture.write_tables(&[(1, 500)], &[50]);
    fixture.write_step(0, "1,500.0,-1|20|30\n");
    fixture.write_step(87, "1,500.0,-1|20|30\n");
    fixture
}

#[tokio::test]
async fn test_run_reports_every_step_and_strategy() {
    let fixture = repeated_request();

    let report = run_workload(&fixture.run_config().await).await.unwrap();

    assert_eq!(report.steps_completed, 2);
    assert_eq!(report.write_sets_processed, 10);
    let names: Vec<_> = report.strategies.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "NONE",
            "GROUND-STATION-100",
            "SATELLITE",
            "SATELLITE-TIMEOUT",
            "SATELLITE-VIRTUAL",
        ]
    );
}

#[tokio::test]
async fn test_no_cache_charges_full_path() {
    let fixture = repeated_request();
    run_workload(&fixture.run_config().await).await.unwrap();

    for time in [0, 87] {
        let tx = fixture.summary(time, "NONE", "tx");
        assert_eq!(tx.raw("total"), "1000");
        assert_eq!(tx.raw("max"), "1000");
        assert_eq!(tx.raw("min"), "500");
        assert_eq!(tx.raw("avg"), "750");
        tx.assert_close("median", 750.0);

        let cache = fixture.artifact(time, "NONE", "cache");
        assert_eq!(cache, "ratio,0\nnum_requests,1\n");

        let hops = fixture.summary(time, "NONE", "hops");
        assert_eq!(hops.raw("total"), "2");

        let store = fixture.summary(time, "NONE", "store");
        assert_eq!(store.raw("total"), "0");
        assert_eq!(store.raw("numnodes"), "0");
        assert_eq!(store.raw("numnostorenodes"), "0");
    }
}

#[tokio::test]
async fn test_satellite_cache_hits_on_second_step() {
    let fixture = repeated_request();
    run_workload(&fixture.run_config().await).await.unwrap();

    let first = fixture.summary(0, "SATELLITE", "store");
    assert_eq!(first.raw("total"), "500");
    first.assert_close("numnodes", SATELLITES);
    first.assert_close("numnostorenodes", SATELLITES - 1.0);
    assert_eq!(fixture.summary(0, "SATELLITE", "cache").raw("ratio"), "0");

    assert_eq!(fixture.summary(87, "SATELLITE", "cache").raw("ratio"), "1");
    let tx = fixture.summary(87, "SATELLITE", "tx");
    assert_eq!(tx.raw("total"), "500");
    assert_eq!(fixture.summary(87, "SATELLITE", "hops").raw("total"), "1");
}

#[tokio::test]
async fn test_timeout_cache_misses_after_invalidation() {
    let fixture = repeated_request();
    run_workload(&fixture.run_config().await).await.unwrap();

    assert_eq!(fixture.summary(87, "SATELLITE-TIMEOUT", "cache").raw("ratio"), "0");
    assert_eq!(fixture.summary(87, "SATELLITE-TIMEOUT", "tx").raw("total"), "1000");
    assert_eq!(fixture.summary(87, "SATELLITE-TIMEOUT", "store").raw("total"), "500");
}

#[tokio::test]
async fn test_ground_station_storage_is_cumulative() {
    let fixture = repeated_request();
    run_workload(&fixture.run_config().await).await.unwrap();

    let first = fixture.summary(0, "GROUND-STATION-100", "store");
    assert_eq!(first.raw("total"), "500");
    assert_eq!(first.raw("numnodes"), "1");
    assert_eq!(first.raw("numnostorenodes"), "0");

    // Hit at the replica: nothing crosses the network, storage is carried over
    let second = fixture.summary(87, "GROUND-STATION-100", "store");
    assert_eq!(second.raw("total"), "500");
    assert_eq!(fixture.summary(87, "GROUND-STATION-100", "cache").raw("ratio"), "1");
    assert_eq!(fixture.summary(87, "GROUND-STATION-100", "tx").raw("total"), "0");
    assert_eq!(fixture.summary(87, "GROUND-STATION-100", "hops").raw("total"), "0");
}

#[tokio::test]
async fn test_virtual_cache_moves_content_before_serving() {
    let fixture = repeated_request();
    run_workload(&fixture.run_config().await).await.unwrap();

    // Item 1 moved from 20 to 19 at t=87, so the request at 20 misses and
    // both satellites hold it afterwards.
    assert_eq!(fixture.summary(87, "SATELLITE-VIRTUAL", "cache").raw("ratio"), "0");
    assert_eq!(fixture.summary(87, "SATELLITE-VIRTUAL", "tx").raw("total"), "1500");

    let store = fixture.summary(87, "SATELLITE-VIRTUAL", "store");
    assert_eq!(store.raw("total"), "1000");
    store.assert_close("numnostorenodes", SATELLITES - 2.0);
}

#[tokio::test]
async fn test_step_without_requests_yields_undefined_ratios() {
    let fixture = WorkloadFixture::new(1, 87, "ground_station_capacities = [100]");
    fixture.write_tables(&[(1, 500)], &[50]);
    fixture.write_step(0, "");

    run_workload(&fixture.run_config().await).await.unwrap();

    assert_eq!(fixture.artifact(0, "SATELLITE", "cache"), "ratio,NaN\nnum_requests,0\n");
    let hops = fixture.summary(0, "SATELLITE", "hops");
    assert_eq!(hops.raw("avg"), "NaN");
    assert_eq!(hops.raw("median"), "NaN");
    let tx = fixture.summary(0, "SATELLITE", "tx");
    assert_eq!(tx.raw("total"), "0");
    assert_eq!(tx.raw("avg"), "0");
}

#[tokio::test]
async fn test_raw_output_mode() {
    let fixture = repeated_request();
    let mut run = fixture.run_config().await;
    run.simulation.output_mode = OutputMode::Raw;

    run_workload(&run).await.unwrap();

    assert_eq!(
        fixture.artifact(0, "NONE", "tx"),
        "source,target,bandwidth\n-1,20,500\n20,30,500\n"
    );
    assert_eq!(fixture.artifact(0, "SATELLITE", "store"), "node,item\n20,1\n");
    assert_eq!(
        fixture.artifact(87, "SATELLITE", "cache"),
        "item,success\n1,true\n"
    );
    assert_eq!(
        fixture.artifact(87, "GROUND-STATION-100", "hops"),
        "item,hops\n1,0\n"
    );
    // Incremental reporting: nothing new was stored at t=87
    assert_eq!(
        fixture.artifact(87, "GROUND-STATION-100", "store"),
        "node,item\n"
    );
}

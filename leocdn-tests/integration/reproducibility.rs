//! Same workload and seed, same artifacts.

use leocdn_sim::run_workload;

use crate::fixture::WorkloadFixture;

const STRATEGIES: [&str; 5] = [
    "NONE",
    "GROUND-STATION-10",
    "SATELLITE",
    "SATELLITE-TIMEOUT",
    "SATELLITE-VIRTUAL",
];

fn busy_workload(seed: u64) -> WorkloadFixture {
    let fixture = WorkloadFixture::new(
        3,
        87,
        &format!("ground_station_capacities = [10]\nrng_seed = {seed}"),
    );
    fixture.write_tables(&[(1, 100), (2, 200), (3, 300), (4, 400)], &[45, 12]);

    let mut requests = String::new();
    for item in 1..=4 {
        requests.push_str(&format!("{item},{}.0,-1|20|30|40\n", item * 100));
        requests.push_str(&format!("{item},{}.0,-2|86|87\n", item * 100));
    }
    for time in [0, 87, 174] {
        fixture.write_step(time, &requests);
    }
    fixture
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_identical_runs_write_identical_artifacts() {
    let first = busy_workload(7);
    let second = busy_workload(7);

    run_workload(&first.run_config().await).await.unwrap();
    run_workload(&second.run_config().await).await.unwrap();

    for time in [0, 87, 174] {
        for strategy in STRATEGIES {
            for kind in ["tx", "store", "cache", "hops"] {
                assert_eq!(
                    first.artifact(time, strategy, kind),
                    second.artifact(time, strategy, kind),
                    "t={time} {strategy} {kind}"
                );
            }
        }
    }
}

#[tokio::test]
async fn test_replica_count_follows_population() {
    let fixture = busy_workload(0);

    let report = run_workload(&fixture.run_config().await).await.unwrap();

    // 45 clients -> 5 replicas, 12 clients -> 2 replicas
    let ground = report
        .strategies
        .iter()
        .find(|p| p.name == "GROUND-STATION-10")
        .unwrap();
    assert_eq!(ground.store_nodes, 7);
    assert_eq!(
        fixture.summary(0, "GROUND-STATION-10", "store").raw("numnodes"),
        "7"
    );
}

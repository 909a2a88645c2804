//! Temporary workload directories laid out like generated workloads.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use leocdn_core::RunConfig;
use tempfile::TempDir;

pub struct WorkloadFixture {
    dir: TempDir,
}

impl WorkloadFixture {
    /// Creates workload `demo` with the given run length and `[simulation]` overrides.
    pub fn new(steps: i64, step_length: i64, simulation: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let fixture = Self { dir };

        fs::create_dir_all(fixture.root().join("results")).unwrap();
        fs::write(
            fixture.root().join("config.toml"),
            format!(
                "steps = {steps}\nstep_length = {step_length}\nrequestamount = 16\n\
                 loadfile = \"load.csv\"\ncities = \"cities.csv\"\n"
            ),
        )
        .unwrap();
        fs::write(
            fixture.run_file(),
            format!(
                "name = \"demo\"\nworkloads_dir = \"{}\"\n\n[simulation]\n{simulation}\n",
                fixture.dir.path().join("workloads").display()
            ),
        )
        .unwrap();

        fixture
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("workloads").join("demo")
    }

    pub fn run_file(&self) -> PathBuf {
        self.dir.path().join("run.toml")
    }

    pub async fn run_config(&self) -> RunConfig {
        RunConfig::load(&self.run_file()).await.unwrap()
    }

    /// Writes the item size and population tables.
    pub fn write_tables(&self, item_sizes: &[(i64, u64)], populations: &[u64]) {
        let mut load = String::from("id,name,kind,size\n");
        for (item, size) in item_sizes {
            load.push_str(&format!("{item},item{item},video,{size}.0\n"));
        }
        fs::write(self.root().join("load.csv"), load).unwrap();

        let mut cities = String::from("name,population\n");
        for (i, population) in populations.iter().enumerate() {
            cities.push_str(&format!("city{i},{population}\n"));
        }
        fs::write(self.root().join("cities.csv"), cities).unwrap();
    }

    /// Writes a step's request trace (without header) and a minimal topology.
    pub fn write_step(&self, time: i64, requests: &str) {
        let results = self.root().join("results");
        fs::write(
            results.join(format!("r.csv{time}shortest_sat_paths")),
            "source,target,distance,path\n20,30,1200,20|30\n",
        )
        .unwrap();
        fs::write(
            results.join(format!("r.csv{time}gnd_sat_links")),
            "gst,sat,distance\n-1,20,600\n",
        )
        .unwrap();
        fs::write(
            results.join(format!("r.csv{time}paths")),
            format!("item,size,path\n{requests}"),
        )
        .unwrap();
    }

    pub fn artifact(&self, time: i64, strategy: &str, kind: &str) -> String {
        let path = self
            .root()
            .join("cache")
            .join(format!("c.csv{time}{strategy}{kind}"));
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("missing artifact {}: {e}", path.display()))
    }

    /// Reads a summary artifact as a key/value table.
    pub fn summary(&self, time: i64, strategy: &str, kind: &str) -> Summary {
        let values = self
            .artifact(time, strategy, kind)
            .lines()
            .filter_map(|line| line.split_once(','))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Summary { values }
    }
}

pub struct Summary {
    values: HashMap<String, String>,
}

impl Summary {
    pub fn raw(&self, key: &str) -> &str {
        self.values
            .get(key)
            .unwrap_or_else(|| panic!("missing key {key}"))
    }

    pub fn number(&self, key: &str) -> f64 {
        self.raw(key).parse().unwrap()
    }

    pub fn assert_close(&self, key: &str, expected: f64) {
        let actual = self.number(key);
        assert!(
            (actual - expected).abs() < 1e-6,
            "{key}: expected {expected}, got {actual}"
        );
    }
}

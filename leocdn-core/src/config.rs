//! Centralized configuration for a simulation run.
//!
//! A run is described by a small run file naming the workload, the workload's
//! own `config.toml`, and the simulation tunables. Constellation constants and
//! propagation intervals live here instead of being scattered through the
//! strategies.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Top-level run file passed on the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Workload directory name under `workloads_dir`
    pub name: String,
    /// Directory holding all workloads
    #[serde(default = "default_workloads_dir")]
    pub workloads_dir: PathBuf,
    /// Simulation tunables
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_workloads_dir() -> PathBuf {
    PathBuf::from("workloads")
}

impl RunConfig {
    /// Loads and validates a run file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Read` - File cannot be read
    /// - `ConfigError::Parse` - File is not valid TOML for this schema
    /// - `ConfigError::Invalid` - A simulation value is out of range
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load_toml(path).await?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Directory layout of the configured workload.
    pub fn layout(&self) -> WorkloadLayout {
        WorkloadLayout::new(self.workloads_dir.join(&self.name))
    }
}

/// Per-workload parameters written by the workload generator.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Number of simulated steps
    pub steps: i64,
    /// Seconds between steps
    pub step_length: i64,
    /// Expected requests per step, used as a capacity hint
    pub requestamount: usize,
    /// Item size table, relative to the workload directory
    pub loadfile: String,
    /// Ground-station population table, relative to the workload directory
    pub cities: String,
}

impl WorkloadConfig {
    /// Loads and validates a workload's `config.toml`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Read` - File cannot be read
    /// - `ConfigError::Parse` - File is not valid TOML for this schema
    /// - `ConfigError::Invalid` - Steps or step length are out of range
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load_toml(path).await?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the run length is well-formed.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Invalid` - Negative step count or non-positive step length
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps < 0 {
            return Err(ConfigError::Invalid {
                reason: format!("steps must not be negative, got {}", self.steps),
            });
        }
        if self.step_length <= 0 {
            return Err(ConfigError::Invalid {
                reason: format!("step_length must be positive, got {}", self.step_length),
            });
        }
        Ok(())
    }

    /// Step start times of the run: 0, step_length, ... below steps * step_length.
    pub fn step_times(&self) -> impl Iterator<Item = i64> + use<> {
        let step_length = self.step_length;
        (0..self.steps).map(move |step| step * step_length)
    }
}

/// Which artifacts the aggregator writes per step and strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Key/value summary statistics
    #[default]
    Summary,
    /// Every raw record, one CSV row each
    Raw,
}

/// Simulation tunables with the defaults of the reference constellation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Satellites in each orbital plane
    pub sats_per_plane: i64,
    /// Number of orbital planes
    pub num_planes: i64,
    /// Seconds between full invalidations of the timeout cache
    pub timeout_interval: i64,
    /// Seconds between intra-plane backward propagation passes
    pub intra_plane_interval: i64,
    /// Seconds between cross-plane forward propagation passes
    pub cross_plane_interval: i64,
    /// Clients per replica, one ground-station strategy instance per entry
    pub ground_station_capacities: Vec<u64>,
    /// Spacing of synthetic replica ids below each ground-station id
    pub replica_id_offset: i64,
    /// Seed for replica selection
    pub rng_seed: u64,
    /// Write sets buffered between strategies and the aggregator
    pub channel_capacity: usize,
    /// Artifact format
    pub output_mode: OutputMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sats_per_plane: 66,
            num_planes: 24,
            timeout_interval: 87, // 5730 s orbital period / 66 satellites per plane
            intra_plane_interval: 87,
            cross_plane_interval: 3600,
            ground_station_capacities: vec![10_000, 100, 10],
            replica_id_offset: 1_000_000,
            rng_seed: 0,
            channel_capacity: 64,
            output_mode: OutputMode::Summary,
        }
    }
}

impl SimulationConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Invalid` - Any count, interval or capacity is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sats_per_plane", self.sats_per_plane),
            ("num_planes", self.num_planes),
            ("timeout_interval", self.timeout_interval),
            ("intra_plane_interval", self.intra_plane_interval),
            ("cross_plane_interval", self.cross_plane_interval),
            ("replica_id_offset", self.replica_id_offset),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if self.ground_station_capacities.contains(&0) {
            return Err(ConfigError::Invalid {
                reason: "ground_station_capacities must not contain 0".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "channel_capacity must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Total number of satellites in the constellation.
    pub fn satellite_count(&self) -> i64 {
        self.sats_per_plane * self.num_planes
    }
}

/// Per-step input table kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFile {
    ShortestSatPaths,
    GndSatLinks,
    Requests,
}

impl StepFile {
    fn suffix(self) -> &'static str {
        match self {
            StepFile::ShortestSatPaths => "shortest_sat_paths",
            StepFile::GndSatLinks => "gnd_sat_links",
            StepFile::Requests => "paths",
        }
    }
}

/// File naming inside one workload directory.
///
/// Per-step files are addressed by concatenating a prefix, the step time and
/// a suffix, e.g. `results/r.csv174paths` and `cache/c.csv174SATELLITEtx`.
#[derive(Debug, Clone)]
pub struct WorkloadLayout {
    root: PathBuf,
}

impl WorkloadLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Output directory for per-step artifacts.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Path of one per-step input table.
    pub fn step_file(&self, time: i64, kind: StepFile) -> PathBuf {
        self.root
            .join("results")
            .join(format!("r.csv{time}{}", kind.suffix()))
    }

    /// Resolves a file named in the workload config.
    pub fn workload_file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Artifact path inside an output directory.
pub fn artifact_path(dir: &Path, time: i64, strategy: &str, kind: &str) -> PathBuf {
    dir.join(format!("c.csv{time}{strategy}{kind}"))
}

async fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

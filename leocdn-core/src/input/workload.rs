//! Step input sources backed by a workload directory.

use std::sync::Arc;

use async_trait::async_trait;

use super::{InputError, read_gnd_sat_links, read_requests, read_shortest_sat_paths};
use crate::config::{StepFile, WorkloadLayout};
use crate::model::{SimTime, StepInput, Topology};

/// Producer of per-step topology and request batches.
///
/// Implementations are read-only: loading a step never changes what a later
/// load of the same step returns.
#[async_trait]
pub trait StepInputSource: Send + Sync {
    /// Loads topology and requests for the step starting at `time`.
    ///
    /// # Errors
    ///
    /// - `InputError` - Any required file is missing or malformed
    async fn load_step(&self, time: SimTime) -> Result<StepInput, InputError>;
}

#[async_trait]
impl<T: StepInputSource + ?Sized> StepInputSource for Arc<T> {
    async fn load_step(&self, time: SimTime) -> Result<StepInput, InputError> {
        (**self).load_step(time).await
    }
}

/// Reads per-step inputs from `results/r.csv<time><kind>` files.
#[derive(Debug, Clone)]
pub struct WorkloadFiles {
    layout: WorkloadLayout,
    expected_requests: usize,
}

impl WorkloadFiles {
    /// Creates a source over a workload directory.
    pub fn new(layout: WorkloadLayout, expected_requests: usize) -> Self {
        Self {
            layout,
            expected_requests,
        }
    }
}

#[async_trait]
impl StepInputSource for WorkloadFiles {
    async fn load_step(&self, time: SimTime) -> Result<StepInput, InputError> {
        let paths_file = self.layout.step_file(time, StepFile::ShortestSatPaths);
        let links_file = self.layout.step_file(time, StepFile::GndSatLinks);
        let requests_file = self.layout.step_file(time, StepFile::Requests);

        let (shortest_sat_paths, gnd_sat_links, requests) = tokio::try_join!(
            read_shortest_sat_paths(&paths_file),
            read_gnd_sat_links(&links_file),
            read_requests(&requests_file, self.expected_requests),
        )?;

        Ok(StepInput {
            topology: Topology {
                shortest_sat_paths,
                gnd_sat_links,
            },
            requests,
        })
    }
}

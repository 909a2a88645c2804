//! Step driver fanning each step out to every strategy.
//!
//! Each strategy is moved into a blocking worker for one step and handed back
//! when the step completes, so a strategy's `step(t + 1)` can only start after
//! its `step(t)` returned. The next step's inputs are loaded while the previous
//! step still computes; the barrier is awaited only before fanning out again.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use leocdn_core::{SimTime, StepInput, StepInputSource, WriteSet};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::SimError;
use crate::aggregator::AggregatorMessage;
use crate::strategy::{CacheStrategy, Strategy};

/// Outcome of a completed run.
#[derive(Debug)]
pub struct OrchestratorReport {
    /// Steps every strategy finished
    pub steps_completed: usize,
    /// Strategies in roster order with their final cache state
    pub strategies: Vec<Strategy>,
}

type StepTask = JoinHandle<Result<Strategy, SimError>>;

/// Drives a roster of strategies across a fixed sequence of steps.
pub struct Orchestrator<S> {
    source: S,
    sender: mpsc::Sender<AggregatorMessage>,
}

impl<S: StepInputSource> Orchestrator<S> {
    /// Creates an orchestrator reading inputs from `source` and reporting to `sender`.
    pub fn new(source: S, sender: mpsc::Sender<AggregatorMessage>) -> Self {
        Self { source, sender }
    }

    /// Runs every step, then tells the aggregator that no more results follow.
    ///
    /// # Errors
    ///
    /// - `SimError::Input` - A step's inputs cannot be loaded
    /// - `SimError::TaskFailed` - A strategy panicked during a step
    /// - `SimError::AggregatorClosed` - The aggregator stopped accepting results
    pub async fn run(
        self,
        strategies: Vec<Strategy>,
        times: impl IntoIterator<Item = SimTime>,
    ) -> Result<OrchestratorReport, SimError> {
        let mut idle = strategies;
        let mut in_flight: Vec<StepTask> = Vec::new();
        let mut steps_completed = 0;

        tracing::info!(
            "Running strategies: {:?}",
            idle.iter().map(|s| s.name()).collect::<Vec<_>>()
        );

        for time in times {
            let input = Arc::new(self.source.load_step(time).await?);

            if !in_flight.is_empty() {
                idle = barrier(std::mem::take(&mut in_flight)).await?;
                steps_completed += 1;
            }

            tracing::info!(
                "Step t={time}: {} requests, {} strategies",
                input.requests.len(),
                idle.len()
            );

            in_flight = idle
                .drain(..)
                .map(|strategy| spawn_step(strategy, time, Arc::clone(&input), self.sender.clone()))
                .collect();
        }

        if !in_flight.is_empty() {
            idle = barrier(in_flight).await?;
            steps_completed += 1;
        }

        self.sender
            .send(AggregatorMessage::Shutdown)
            .await
            .map_err(|_| SimError::AggregatorClosed)?;

        tracing::info!("Completed {steps_completed} steps");

        Ok(OrchestratorReport {
            steps_completed,
            strategies: idle,
        })
    }
}

/// Runs one strategy's step off the async workers and forwards its write set.
fn spawn_step(
    mut strategy: Strategy,
    time: SimTime,
    input: Arc<StepInput>,
    sender: mpsc::Sender<AggregatorMessage>,
) -> StepTask {
    tokio::spawn(async move {
        let (strategy, result) = tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let result = strategy.step(time, &input.topology, &input.requests);
            tracing::debug!(
                "{} t={time}: {}/{} hits in {:?}",
                strategy.name(),
                result.hit_count(),
                result.cache_records.len(),
                started.elapsed()
            );
            (strategy, result)
        })
        .await
        .map_err(|e| SimError::TaskFailed {
            reason: format!("strategy step at t={time}: {e}"),
        })?;

        let write_set = WriteSet {
            time,
            strategy: strategy.name().to_string(),
            result,
        };
        sender
            .send(AggregatorMessage::Write(write_set))
            .await
            .map_err(|_| SimError::AggregatorClosed)?;

        Ok(strategy)
    })
}

/// Waits for every strategy of a step and returns them in roster order.
async fn barrier(tasks: Vec<StepTask>) -> Result<Vec<Strategy>, SimError> {
    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| {
            joined.map_err(|e| SimError::TaskFailed {
                reason: e.to_string(),
            })?
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use leocdn_core::{InputError, Request, StoreRecord, Topology};

    use super::*;
    use crate::constellation::Constellation;
    use crate::strategy::{NoCache, SatelliteCache, SatelliteTimeoutCache};

    /// Serves the same requests at every step and records load order.
    struct FixedSource {
        requests: Vec<Request>,
        loaded: Mutex<Vec<SimTime>>,
    }

    impl FixedSource {
        fn new(requests: Vec<Request>) -> Self {
            Self {
                requests,
                loaded: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StepInputSource for FixedSource {
        async fn load_step(&self, time: SimTime) -> Result<StepInput, InputError> {
            self.loaded.lock().unwrap().push(time);
            Ok(StepInput {
                topology: Topology::default(),
                requests: self.requests.clone(),
            })
        }
    }

    struct FailingSource;

    #[async_trait]
    impl StepInputSource for FailingSource {
        async fn load_step(&self, _time: SimTime) -> Result<StepInput, InputError> {
            Err(InputError::MissingHeader {
                path: "r.csv0paths".into(),
            })
        }
    }

    fn roster() -> Vec<Strategy> {
        let constellation = Constellation::new(66, 24);
        vec![
            Strategy::None(NoCache::new()),
            Strategy::Satellite(SatelliteCache::new(constellation)),
            Strategy::SatelliteTimeout(SatelliteTimeoutCache::new(constellation, 87)),
        ]
    }

    async fn drain(mut receiver: mpsc::Receiver<AggregatorMessage>) -> (Vec<WriteSet>, bool) {
        let mut write_sets = Vec::new();
        while let Some(message) = receiver.recv().await {
            match message {
                AggregatorMessage::Write(write_set) => write_sets.push(write_set),
                AggregatorMessage::Shutdown => return (write_sets, true),
            }
        }
        (write_sets, false)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_every_strategy_runs_every_step() {
        let request = Request::new(1, 500, vec![10, 20, 30]).unwrap();
        let (sender, receiver) = mpsc::channel(2);
        let collector = tokio::spawn(drain(receiver));
        let source = FixedSource::new(vec![request]);

        let report = Orchestrator::new(source, sender)
            .run(roster(), [0, 87, 174])
            .await
            .unwrap();
        let (write_sets, shut_down) = collector.await.unwrap();

        assert!(shut_down);
        assert_eq!(report.steps_completed, 3);
        assert_eq!(write_sets.len(), 9);

        let names: Vec<_> = report.strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["NONE", "SATELLITE", "SATELLITE-TIMEOUT"]);

        let tagged: BTreeSet<_> = write_sets
            .iter()
            .map(|w| (w.time, w.strategy.clone()))
            .collect();
        assert_eq!(tagged.len(), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cache_state_carries_across_steps() {
        let request = Request::new(1, 500, vec![10, 20, 30]).unwrap();
        let (sender, receiver) = mpsc::channel(16);
        let collector = tokio::spawn(drain(receiver));

        Orchestrator::new(FixedSource::new(vec![request]), sender)
            .run(roster(), [0, 87, 174])
            .await
            .unwrap();
        let (write_sets, _) = collector.await.unwrap();

        let hits = |strategy: &str, time: SimTime| {
            write_sets
                .iter()
                .find(|w| w.strategy == strategy && w.time == time)
                .map(|w| w.result.hit_count())
                .unwrap()
        };

        assert_eq!(hits("NONE", 87), 0);
        assert_eq!(hits("SATELLITE", 0), 0);
        assert_eq!(hits("SATELLITE", 87), 1);
        assert_eq!(hits("SATELLITE", 174), 1);
        // Invalidated at the start of every 87 s step
        assert_eq!(hits("SATELLITE-TIMEOUT", 87), 0);
        assert_eq!(hits("SATELLITE-TIMEOUT", 174), 0);

        let satellite = write_sets
            .iter()
            .find(|w| w.strategy == "SATELLITE" && w.time == 0)
            .unwrap();
        assert_eq!(
            satellite.result.store_records,
            vec![StoreRecord { node: 20, item: 1 }]
        );
    }

    #[tokio::test]
    async fn test_inputs_load_in_step_order() {
        let (sender, receiver) = mpsc::channel(16);
        let collector = tokio::spawn(drain(receiver));
        let source = Arc::new(FixedSource::new(Vec::new()));

        Orchestrator::new(Arc::clone(&source), sender)
            .run(roster(), [0, 87, 174, 261])
            .await
            .unwrap();
        collector.await.unwrap();

        assert_eq!(*source.loaded.lock().unwrap(), vec![0, 87, 174, 261]);
    }

    #[tokio::test]
    async fn test_no_steps_still_shuts_down_aggregator() {
        let (sender, receiver) = mpsc::channel(1);
        let collector = tokio::spawn(drain(receiver));

        let report = Orchestrator::new(FixedSource::new(Vec::new()), sender)
            .run(roster(), std::iter::empty())
            .await
            .unwrap();
        let (write_sets, shut_down) = collector.await.unwrap();

        assert_eq!(report.steps_completed, 0);
        assert_eq!(report.strategies.len(), 3);
        assert!(write_sets.is_empty());
        assert!(shut_down);
    }

    #[tokio::test]
    async fn test_input_failure_is_fatal() {
        let (sender, _receiver) = mpsc::channel(1);

        let err = Orchestrator::new(FailingSource, sender)
            .run(roster(), [0])
            .await
            .unwrap_err();

        assert!(matches!(err, SimError::Input(_)));
    }

    #[tokio::test]
    async fn test_closed_aggregator_is_reported() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);

        let err = Orchestrator::new(FixedSource::new(Vec::new()), sender)
            .run(roster(), [0])
            .await
            .unwrap_err();

        assert!(matches!(err, SimError::AggregatorClosed));
    }
}

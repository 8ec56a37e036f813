//! Shot engine construction and the default entry point.

use std::num::NonZeroUsize;
use std::thread;

use qloom_hal::{Counts, HalResult, Runner, RunnerRegistry};
use qloom_ir::Circuit;

use crate::error::EngineError;

/// Shots executed when the caller does not say otherwise.
pub const DEFAULT_SHOTS: usize = 1024;

/// Options accepted by [`ShotEngine::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Number of shots; zero selects [`DEFAULT_SHOTS`].
    pub shots: usize,
    /// Worker count for the parallel strategies; zero selects the hardware
    /// parallelism. Never exceeds the shot count.
    pub workers: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            workers: 0,
        }
    }
}

/// Executes a circuit for many shots against one backend.
///
/// Each shot calls the backend's `run_once`; the backend builds a fresh
/// kernel per shot, so no simulation state crosses shots or workers. All
/// strategies share one return contract: the histogram of successful shots
/// plus at most the first error observed.
pub struct ShotEngine {
    shots: usize,
    workers: usize,
    runner: Box<dyn Runner>,
}

impl ShotEngine {
    /// Create an engine, normalizing the options.
    pub fn new(runner: Box<dyn Runner>, options: EngineOptions) -> Self {
        let shots = if options.shots == 0 {
            DEFAULT_SHOTS
        } else {
            options.shots
        };
        let workers = if options.workers == 0 {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            options.workers
        };
        Self {
            shots,
            workers: workers.min(shots),
            runner,
        }
    }

    /// Create an engine around a backend resolved from a registry.
    pub fn from_registry(
        registry: &RunnerRegistry,
        name: &str,
        options: EngineOptions,
    ) -> HalResult<Self> {
        Ok(Self::new(registry.create(name)?, options))
    }

    /// Number of shots this engine will execute.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Number of parallel workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The backend driven by this engine.
    pub fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }

    /// Execute with the default strategy.
    ///
    /// Delegates to [`ShotEngine::run_parallel_static`]: per-shot work is
    /// nearly constant, so the static partition's lower scheduling overhead
    /// wins over a job channel.
    pub fn run(&self, circuit: &Circuit) -> RunOutcome {
        self.run_parallel_static(circuit)
    }
}

/// Histogram plus at most one error.
///
/// The histogram always holds the successful shots accumulated before any
/// failure, so partial results stay displayable.
#[derive(Debug)]
pub struct RunOutcome {
    /// Counts of successful shot outcomes.
    pub histogram: Counts,
    /// First error observed, if any shot failed.
    pub error: Option<EngineError>,
}

impl RunOutcome {
    /// Whether every shot succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, discarding the partial histogram on error.
    pub fn into_result(self) -> Result<Counts, EngineError> {
        match self.error {
            None => Ok(self.histogram),
            Some(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qloom_hal::HalResult;

    struct ZeroRunner;

    impl Runner for ZeroRunner {
        fn run_once(&self, _circuit: &Circuit) -> HalResult<String> {
            Ok("0".into())
        }
    }

    #[test]
    fn test_options_normalization() {
        let engine = ShotEngine::new(Box::new(ZeroRunner), EngineOptions::default());
        assert_eq!(engine.shots(), DEFAULT_SHOTS);
        assert!(engine.workers() >= 1);

        let engine = ShotEngine::new(
            Box::new(ZeroRunner),
            EngineOptions {
                shots: 0,
                workers: 3,
            },
        );
        assert_eq!(engine.shots(), DEFAULT_SHOTS);
        assert_eq!(engine.workers(), 3);
    }

    #[test]
    fn test_workers_capped_at_shots() {
        let engine = ShotEngine::new(
            Box::new(ZeroRunner),
            EngineOptions {
                shots: 2,
                workers: 64,
            },
        );
        assert_eq!(engine.workers(), 2);
    }

    #[test]
    fn test_outcome_into_result() {
        let mut histogram = Counts::new();
        histogram.add("0", 3);
        let outcome = RunOutcome {
            histogram,
            error: None,
        };
        assert!(outcome.is_ok());
        assert_eq!(outcome.into_result().unwrap().get("0"), 3);
    }
}

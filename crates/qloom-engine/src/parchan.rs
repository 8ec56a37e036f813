//! Job-channel strategy: workers drain a pre-filled queue of shot jobs.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use tracing::{error, info, warn};

use qloom_hal::Counts;
use qloom_ir::Circuit;

use crate::engine::{RunOutcome, ShotEngine};
use crate::error::EngineError;

impl ShotEngine {
    /// Execute the shots through a shared job channel.
    ///
    /// The channel is pre-filled with one sentinel job per shot and closed;
    /// workers pop jobs until the queue drains. A worker stops consuming on
    /// its first error; its peers keep going, so every remaining shot
    /// still runs. Errors are deduplicated to the first observed via a
    /// bounded channel with non-blocking sends.
    pub fn run_parallel_chan(&self, circuit: &Circuit) -> RunOutcome {
        info!(
            shots = self.shots(),
            workers = self.workers(),
            qubits = circuit.qubits(),
            clbits = circuit.clbits(),
            depth = circuit.depth(),
            "starting job-channel run"
        );

        let (job_tx, job_rx) = mpsc::sync_channel::<()>(self.shots());
        for _ in 0..self.shots() {
            // Capacity equals the shot count, so pre-filling cannot block.
            let _ = job_tx.send(());
        }
        drop(job_tx);
        let jobs = Arc::new(Mutex::new(job_rx));

        let histogram = Mutex::new(Counts::new());
        let (err_tx, err_rx) = mpsc::sync_channel::<EngineError>(self.workers());
        let runner = self.runner();

        thread::scope(|scope| {
            for worker in 0..self.workers() {
                let jobs = Arc::clone(&jobs);
                let err_tx = err_tx.clone();
                let histogram = &histogram;
                scope.spawn(move || {
                    loop {
                        // The sender is gone, so a non-Ok pop means drained.
                        let job = jobs
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner)
                            .try_recv();
                        if job.is_err() {
                            break;
                        }

                        match runner.run_once(circuit) {
                            Ok(outcome) => histogram
                                .lock()
                                .unwrap_or_else(std::sync::PoisonError::into_inner)
                                .record(&outcome),
                            Err(e) => {
                                let err = EngineError::WorkerFailed { worker, source: e };
                                error!(worker, %err, "job-channel shot failed");
                                if err_tx.try_send(err).is_err() {
                                    warn!(worker, "error channel full, dropping error");
                                }
                                break;
                            }
                        }
                    }
                });
            }
        });
        drop(err_tx);

        let mut first_error = None;
        let mut error_count = 0usize;
        while let Ok(err) = err_rx.try_recv() {
            error_count += 1;
            if first_error.is_none() {
                first_error = Some(err);
            } else {
                warn!(%err, error_count, "additional worker error");
            }
        }

        if error_count > 0 {
            warn!(error_count, "job-channel run finished with errors");
        } else {
            info!(shots = self.shots(), "job-channel run finished");
        }

        RunOutcome {
            histogram: histogram
                .into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
            error: first_error,
        }
    }
}

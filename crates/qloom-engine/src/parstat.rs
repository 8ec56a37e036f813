//! Static-partition strategy: contiguous shot ranges per worker.

use std::sync::{Mutex, mpsc};
use std::thread;

use tracing::{error, info, warn};

use qloom_hal::Counts;
use qloom_ir::Circuit;

use crate::engine::{RunOutcome, ShotEngine};
use crate::error::EngineError;

impl ShotEngine {
    /// Execute the shots over a deterministic partition.
    ///
    /// The shot count is split into `workers` contiguous chunks; the first
    /// `shots % workers` workers take one extra. A worker returns on its
    /// first error while the others run their share to completion. The
    /// first error observed is reported with its global 1-based shot
    /// ordinal.
    pub fn run_parallel_static(&self, circuit: &Circuit) -> RunOutcome {
        let per = self.shots() / self.workers();
        let extra = self.shots() % self.workers();

        info!(
            shots = self.shots(),
            workers = self.workers(),
            qubits = circuit.qubits(),
            clbits = circuit.clbits(),
            depth = circuit.depth(),
            "starting static-partition run"
        );

        let histogram = Mutex::new(Counts::new());
        let (err_tx, err_rx) = mpsc::sync_channel::<EngineError>(1);
        let runner = self.runner();

        thread::scope(|scope| {
            for worker in 0..self.workers() {
                let count = per + usize::from(worker < extra);
                let first_shot = worker * per + worker.min(extra);
                let err_tx = err_tx.clone();
                let histogram = &histogram;
                scope.spawn(move || {
                    for i in 0..count {
                        match runner.run_once(circuit) {
                            Ok(outcome) => histogram
                                .lock()
                                .unwrap_or_else(std::sync::PoisonError::into_inner)
                                .record(&outcome),
                            Err(e) => {
                                let err = EngineError::ShotFailed {
                                    shot: first_shot + i + 1,
                                    source: e,
                                };
                                error!(worker, %err, "static-partition shot failed");
                                let _ = err_tx.try_send(err);
                                return;
                            }
                        }
                    }
                });
            }
        });
        drop(err_tx);

        let first_error = err_rx.try_recv().ok();
        match &first_error {
            Some(err) => warn!(%err, "static-partition run finished with errors"),
            None => info!(shots = self.shots(), "static-partition run finished"),
        }

        RunOutcome {
            histogram: histogram
                .into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
            error: first_error,
        }
    }
}

//! Serial strategy: one loop, first error aborts.

use tracing::{error, info};

use qloom_hal::Counts;
use qloom_ir::Circuit;

use crate::engine::{RunOutcome, ShotEngine};
use crate::error::EngineError;

impl ShotEngine {
    /// Execute every shot on the calling thread.
    ///
    /// The first backend error stops the loop; the histogram accumulated so
    /// far is returned with the error wrapped in its 1-based shot ordinal.
    /// With a seeded backend this strategy is fully deterministic.
    pub fn run_serial(&self, circuit: &Circuit) -> RunOutcome {
        info!(
            shots = self.shots(),
            qubits = circuit.qubits(),
            clbits = circuit.clbits(),
            depth = circuit.depth(),
            "starting serial run"
        );

        let mut histogram = Counts::new();
        for shot in 0..self.shots() {
            match self.runner().run_once(circuit) {
                Ok(outcome) => histogram.record(&outcome),
                Err(e) => {
                    let err = EngineError::ShotFailed {
                        shot: shot + 1,
                        source: e,
                    };
                    error!(shot = shot + 1, %err, "serial shot failed");
                    return RunOutcome {
                        histogram,
                        error: Some(err),
                    };
                }
            }
        }

        info!(shots = self.shots(), "serial run finished");
        RunOutcome {
            histogram,
            error: None,
        }
    }
}

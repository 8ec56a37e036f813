//! The `qsim` statevector backend.
//!
//! Implements the full capability surface of the HAL: cancellation, batch
//! execution, runtime configuration, pre-flight validation, metrics, and
//! backend metadata. Every shot builds a fresh [`Statevector`]; kernels are
//! never pooled or reused across shots.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use qloom_hal::{
    BackendInfo, BackendProvider, BatchRunner, CancelToken, CancellableRunner, ConfigurableRunner,
    ExecutionMetrics, HalError, HalResult, MetricsCollector, ResettableRunner, Runner,
    RunnerMetrics, RunnerRegistry, ValidatingRunner,
};
use qloom_ir::Circuit;

use crate::error::SimError;
use crate::statevector::Statevector;

/// Largest circuit `validate` accepts; 2^20 amplitudes ≈ 16 MiB.
pub const MAX_QUBITS: usize = 20;

/// Deepest circuit `validate` accepts.
pub const MAX_DEPTH: usize = 1000;

/// Gate names this backend executes.
const SUPPORTED_GATES: [&str; 11] = [
    "H", "X", "Y", "Z", "S", "CNOT", "CZ", "SWAP", "TOFFOLI", "FREDKIN", "MEASURE",
];

/// The statevector reference backend.
///
/// Measurements draw from the process RNG unless a `seed` was configured,
/// in which case a per-backend deterministic RNG takes over.
pub struct QsimRunner {
    config: Mutex<Map<String, Value>>,
    rng: Mutex<Option<StdRng>>,
    metrics: RunnerMetrics,
    verbose: AtomicBool,
}

impl QsimRunner {
    /// Create a backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Mutex::new(Map::new()),
            rng: Mutex::new(None),
            metrics: RunnerMetrics::new(),
            verbose: AtomicBool::new(false),
        }
    }

    #[instrument(skip(self, circuit, cancel))]
    fn execute(&self, circuit: &Circuit, cancel: Option<&CancelToken>) -> HalResult<String> {
        let start = Instant::now();
        self.metrics.begin();

        match self.run_internal(circuit, cancel) {
            Ok(outcome) => {
                self.metrics.success(start.elapsed());
                if self.verbose.load(Ordering::Relaxed) {
                    debug!(%outcome, "circuit executed");
                }
                Ok(outcome)
            }
            Err(e) => {
                self.metrics.failure(start.elapsed(), &e.to_string());
                Err(e)
            }
        }
    }

    fn run_internal(&self, circuit: &Circuit, cancel: Option<&CancelToken>) -> HalResult<String> {
        if cancelled(cancel) {
            return Err(HalError::Cancelled);
        }

        let mut state = Statevector::new(circuit.qubits(), circuit.clbits());

        for (index, op) in circuit.operations().iter().enumerate() {
            if cancelled(cancel) {
                return Err(HalError::Cancelled);
            }

            if op.gate.is_measure() {
                let outcome = self
                    .sample_measurement(&mut state, op.qubits[0])
                    .map_err(|e| op_error(index, e))?;
                if let Some(clbit) = op.clbit {
                    state
                        .set_classical(clbit, outcome)
                        .map_err(|e| op_error(index, e))?;
                }
            } else {
                state
                    .apply(op.gate, &op.qubits)
                    .map_err(|e| op_error(index, e))?;
            }
        }

        Ok(state.outcome_string())
    }

    fn sample_measurement(&self, state: &mut Statevector, qubit: usize) -> Result<bool, SimError> {
        let mut seeded = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match seeded.as_mut() {
            Some(rng) => state.measure(qubit, rng),
            None => state.measure(qubit, &mut rand::thread_rng()),
        }
    }

    /// Theoretical outcome probabilities of the circuit, measurements
    /// skipped: applies every unitary to a fresh state and reports each
    /// basis state with probability above 1e-10, keyed by its bit-string
    /// (qubit `Q-1` leftmost).
    pub fn result_probabilities(&self, circuit: &Circuit) -> HalResult<FxHashMap<String, f64>> {
        let mut state = Statevector::new(circuit.qubits(), circuit.clbits());
        for (index, op) in circuit.operations().iter().enumerate() {
            if op.gate.is_measure() {
                continue;
            }
            state
                .apply(op.gate, &op.qubits)
                .map_err(|e| op_error(index, e))?;
        }

        let width = circuit.qubits();
        let mut result = FxHashMap::default();
        for (i, p) in state.probabilities().into_iter().enumerate() {
            if p > 1e-10 {
                result.insert(format!("{i:0width$b}"), p);
            }
        }
        Ok(result)
    }
}

impl Default for QsimRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn cancelled(cancel: Option<&CancelToken>) -> bool {
    cancel.is_some_and(CancelToken::is_cancelled)
}

fn op_error(index: usize, err: SimError) -> HalError {
    match err {
        SimError::UnsupportedGate(name) => HalError::UnsupportedGate(name.to_string()),
        other => HalError::InvalidCircuit(format!("operation {index}: {other}")),
    }
}

impl Runner for QsimRunner {
    fn run_once(&self, circuit: &Circuit) -> HalResult<String> {
        self.execute(circuit, None)
    }

    fn as_cancellable(&self) -> Option<&dyn CancellableRunner> {
        Some(self)
    }

    fn as_batch(&self) -> Option<&dyn BatchRunner> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableRunner> {
        Some(self)
    }

    fn as_validating(&self) -> Option<&dyn ValidatingRunner> {
        Some(self)
    }

    fn as_metrics(&self) -> Option<&dyn MetricsCollector> {
        Some(self)
    }

    fn as_provider(&self) -> Option<&dyn BackendProvider> {
        Some(self)
    }

    fn as_resettable(&self) -> Option<&dyn ResettableRunner> {
        Some(self)
    }
}

impl CancellableRunner for QsimRunner {
    fn run_once_with_cancel(&self, circuit: &Circuit, cancel: &CancelToken) -> HalResult<String> {
        self.execute(circuit, Some(cancel))
    }
}

impl BatchRunner for QsimRunner {
    fn run_batch(&self, circuit: &Circuit, shots: usize) -> HalResult<Vec<String>> {
        if shots == 0 {
            return Err(HalError::Backend("shots must be positive".into()));
        }
        let mut outcomes = Vec::with_capacity(shots);
        for shot in 0..shots {
            let outcome = self
                .run_once(circuit)
                .map_err(|e| HalError::Backend(format!("shot {} failed: {e}", shot + 1)))?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

impl ConfigurableRunner for QsimRunner {
    fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    fn configure(&self, options: &Map<String, Value>) -> HalResult<()> {
        let mut config = self
            .config
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        for (key, value) in options {
            match key.as_str() {
                "verbose" => {
                    let Some(verbose) = value.as_bool() else {
                        return Err(HalError::Configuration {
                            key: key.clone(),
                            expected: "bool",
                        });
                    };
                    self.verbose.store(verbose, Ordering::Relaxed);
                }
                "log_level" => {
                    if !value.is_string() {
                        return Err(HalError::Configuration {
                            key: key.clone(),
                            expected: "string",
                        });
                    }
                }
                "seed" => {
                    let Some(seed) = value.as_i64() else {
                        return Err(HalError::Configuration {
                            key: key.clone(),
                            expected: "int64",
                        });
                    };
                    *self
                        .rng
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner) =
                        Some(StdRng::seed_from_u64(seed as u64));
                }
                // Unknown keys are stored as-is.
                _ => {}
            }
            config.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn configuration(&self) -> Map<String, Value> {
        self.config
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ValidatingRunner for QsimRunner {
    fn validate(&self, circuit: &Circuit) -> HalResult<()> {
        if circuit.qubits() > MAX_QUBITS {
            return Err(HalError::CircuitTooLarge(format!(
                "{} qubits (max {MAX_QUBITS})",
                circuit.qubits()
            )));
        }
        if circuit.depth() > MAX_DEPTH {
            return Err(HalError::CircuitTooLarge(format!(
                "{} layers (max {MAX_DEPTH})",
                circuit.depth()
            )));
        }

        for (index, op) in circuit.operations().iter().enumerate() {
            if !SUPPORTED_GATES.contains(&op.gate.name()) {
                return Err(HalError::UnsupportedGate(op.gate.name().to_string()));
            }
            for &q in &op.qubits {
                if q >= circuit.qubits() {
                    return Err(HalError::InvalidCircuit(format!(
                        "operation {index}: qubit {q} out of range for {}-qubit circuit",
                        circuit.qubits()
                    )));
                }
            }
            if let Some(clbit) = op.clbit {
                if clbit >= circuit.clbits() {
                    return Err(HalError::InvalidCircuit(format!(
                        "operation {index}: classical bit {clbit} out of range for {}-bit register",
                        circuit.clbits()
                    )));
                }
            }
        }
        Ok(())
    }

    fn supported_gates(&self) -> Vec<&'static str> {
        SUPPORTED_GATES.to_vec()
    }
}

impl MetricsCollector for QsimRunner {
    fn metrics(&self) -> ExecutionMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl BackendProvider for QsimRunner {
    fn backend_info(&self) -> BackendInfo {
        BackendInfo::new("qsim statevector simulator", env!("CARGO_PKG_VERSION"))
            .with_description("dense statevector simulator for the fixed qloom gate set")
            .with_vendor("qloom")
            .with_capability("cancellation", true)
            .with_capability("batch_execution", true)
            .with_capability("circuit_validation", true)
            .with_capability("metrics_collection", true)
            .with_capability("configuration", true)
            .with_capability("reset", true)
            .with_metadata("backend_type", "statevector_simulator")
            .with_metadata("max_qubits", MAX_QUBITS.to_string())
    }
}

impl ResettableRunner for QsimRunner {
    fn reset(&self) {
        self.metrics.reset();
    }
}

/// Install the built-in backends into a registry.
///
/// The statevector backend registers under `qsim` and as the `default`
/// alias. Call once from process initialization.
pub fn register_runners(registry: &RunnerRegistry) -> HalResult<()> {
    registry.register("qsim", || Box::new(QsimRunner::new()))?;
    registry.register("default", || Box::new(QsimRunner::new()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qloom_ir::CircuitBuilder;
    use serde_json::json;

    #[test]
    fn test_bell_outcomes_are_correlated() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();

        for _ in 0..200 {
            let outcome = runner.run_once(&circuit).unwrap();
            assert!(outcome == "00" || outcome == "11", "got {outcome}");
        }
    }

    #[test]
    fn test_no_measure_yields_zero_string() {
        let runner = QsimRunner::new();
        let mut builder = CircuitBuilder::with_size(2, 0);
        builder.h(0).h(1);
        let circuit = builder.build_circuit().unwrap();
        assert_eq!(runner.run_once(&circuit).unwrap(), "0");

        let mut builder = CircuitBuilder::with_size(2, 3);
        builder.h(0);
        let circuit = builder.build_circuit().unwrap();
        assert_eq!(runner.run_once(&circuit).unwrap(), "000");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let circuit = CircuitBuilder::bell().unwrap();
        let seed = json!({ "seed": 42 }).as_object().cloned().unwrap();

        let run = |options: &Map<String, Value>| {
            let runner = QsimRunner::new();
            runner.configure(options).unwrap();
            (0..64)
                .map(|_| runner.run_once(&circuit).unwrap())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(&seed), run(&seed));
    }

    #[test]
    fn test_configure_type_checking() {
        let runner = QsimRunner::new();

        let bad = json!({ "verbose": "yes" }).as_object().cloned().unwrap();
        assert!(matches!(
            runner.configure(&bad),
            Err(HalError::Configuration { key, expected: "bool" }) if key == "verbose"
        ));

        let bad = json!({ "seed": "42" }).as_object().cloned().unwrap();
        assert!(matches!(
            runner.configure(&bad),
            Err(HalError::Configuration { key, expected: "int64" }) if key == "seed"
        ));

        let bad = json!({ "log_level": 3 }).as_object().cloned().unwrap();
        assert!(matches!(
            runner.configure(&bad),
            Err(HalError::Configuration { key, expected: "string" }) if key == "log_level"
        ));
    }

    #[test]
    fn test_unknown_keys_are_stored() {
        let runner = QsimRunner::new();
        let options = json!({ "custom": [1, 2, 3], "verbose": true })
            .as_object()
            .cloned()
            .unwrap();
        runner.configure(&options).unwrap();

        let config = runner.configuration();
        assert_eq!(config.get("custom"), Some(&json!([1, 2, 3])));
        assert_eq!(config.get("verbose"), Some(&json!(true)));
    }

    #[test]
    fn test_validate_rejects_oversized_circuit() {
        let runner = QsimRunner::new();
        let mut builder = CircuitBuilder::with_size(MAX_QUBITS + 1, 0);
        let circuit = builder.build_circuit().unwrap();
        assert!(matches!(
            runner.validate(&circuit),
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[test]
    fn test_validate_rejects_deep_circuit() {
        let runner = QsimRunner::new();
        let mut builder = CircuitBuilder::with_size(1, 0);
        for _ in 0..=MAX_DEPTH {
            builder.x(0);
        }
        let circuit = builder.build_circuit().unwrap();
        assert!(matches!(
            runner.validate(&circuit),
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[test]
    fn test_validate_accepts_bell() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();
        runner.validate(&circuit).unwrap();
    }

    #[test]
    fn test_supported_gates() {
        let runner = QsimRunner::new();
        let gates = runner.supported_gates();
        assert_eq!(gates.len(), 11);
        assert!(gates.contains(&"CNOT"));
        assert!(gates.contains(&"MEASURE"));
    }

    #[test]
    fn test_metrics_count_runs() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();
        for _ in 0..10 {
            runner.run_once(&circuit).unwrap();
        }

        let metrics = runner.metrics();
        assert_eq!(metrics.total_executions, 10);
        assert_eq!(metrics.successful_runs, 10);
        assert_eq!(metrics.failed_runs, 0);
        assert!(metrics.last_run_time.is_some());

        runner.reset_metrics();
        assert_eq!(runner.metrics().total_executions, 0);
    }

    #[test]
    fn test_batch_returns_one_outcome_per_shot() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();
        let outcomes = runner.run_batch(&circuit, 32).unwrap();
        assert_eq!(outcomes.len(), 32);
        assert!(runner.run_batch(&circuit, 0).is_err());
    }

    #[test]
    fn test_cancel_before_start() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(
            runner.run_once_with_cancel(&circuit, &token),
            Err(HalError::Cancelled)
        ));
        assert_eq!(runner.metrics().failed_runs, 1);
    }

    #[test]
    fn test_result_probabilities_bell() {
        let runner = QsimRunner::new();
        let circuit = CircuitBuilder::bell().unwrap();
        let probs = runner.result_probabilities(&circuit).unwrap();

        assert_eq!(probs.len(), 2);
        assert!((probs["00"] - 0.5).abs() < 1e-10);
        assert!((probs["11"] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_backend_info() {
        let runner = QsimRunner::new();
        let info = runner.backend_info();
        assert_eq!(info.vendor, "qloom");
        assert_eq!(info.capabilities.get("batch_execution"), Some(&true));
    }

    #[test]
    fn test_register_runners() {
        let registry = RunnerRegistry::new();
        register_runners(&registry).unwrap();
        assert_eq!(registry.list(), vec!["default", "qsim"]);

        let runner = registry.create("qsim").unwrap();
        let circuit = CircuitBuilder::bell().unwrap();
        let outcome = runner.run_once(&circuit).unwrap();
        assert_eq!(outcome.len(), 2);
    }
}

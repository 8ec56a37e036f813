//! Laid-out circuit façade.
//!
//! A [`Circuit`] is the immutable, renderer- and simulator-friendly view of
//! a validated DAG: every operation carries its absolute qubits, classical
//! target, assigned time-step, and primary wire, and the published order is
//! fully deterministic.

use serde::{Deserialize, Serialize};

use crate::dag::Dag;
use crate::error::IrResult;
use crate::gate::Gate;

/// One operation with its layout assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The gate being applied.
    pub gate: Gate,
    /// Absolute qubit indices.
    pub qubits: Vec<usize>,
    /// Classical target for measurements, `None` otherwise.
    pub clbit: Option<usize>,
    /// Parallel layer: one past the deepest parent, zero for roots.
    pub time_step: usize,
    /// Primary wire: the minimum absolute qubit index.
    pub line: usize,
}

/// Immutable laid-out circuit.
///
/// The published operation order is a stable sort of the topological order
/// by `(time_step, line)`, so identical input programs always enumerate
/// identically; operations with equal keys keep their creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    qubits: usize,
    clbits: usize,
    ops: Vec<Operation>,
    max_step: i64,
}

impl Circuit {
    /// Lay out a DAG, validating it first if needed.
    pub fn from_dag(dag: &mut Dag) -> IrResult<Self> {
        dag.validate()?;
        let order = dag.operations().unwrap_or(&[]);

        let mut level = vec![0usize; dag.num_ops()];
        let mut ops = Vec::with_capacity(order.len());
        let mut max_step: i64 = -1;

        for &node in order {
            let step = dag
                .parents(node)
                .iter()
                .map(|p| level[p.index()] + 1)
                .max()
                .unwrap_or(0);
            level[node.index()] = step;
            max_step = max_step.max(step as i64);

            let Some(op) = dag.node(node) else { continue };
            let line = op.qubits.iter().copied().min().unwrap_or(0);
            ops.push(Operation {
                gate: op.gate,
                qubits: op.qubits.clone(),
                clbit: op.clbit,
                time_step: step,
                line,
            });
        }

        // sort_by is stable, so equal (time_step, line) keys keep topological
        // (= creation) order.
        ops.sort_by(|a, b| (a.time_step, a.line).cmp(&(b.time_step, b.line)));

        Ok(Self {
            qubits: dag.qubits(),
            clbits: dag.clbits(),
            ops,
            max_step,
        })
    }

    /// Number of qubits.
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Number of classical bits.
    pub fn clbits(&self) -> usize {
        self.clbits
    }

    /// Laid-out operations in published order.
    ///
    /// The slice borrows the cached layout; callers cannot mutate it.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of operations.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Whether the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of parallel layers; zero for an empty circuit.
    pub fn depth(&self) -> usize {
        (self.max_step + 1) as usize
    }

    /// Highest assigned time-step, or `-1` for an empty circuit.
    pub fn max_step(&self) -> i64 {
        self.max_step
    }
}

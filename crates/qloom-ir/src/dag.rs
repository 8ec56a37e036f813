//! Dependency-DAG circuit representation.
//!
//! Each operation becomes a node; edges run from the previous operation on
//! every touched wire to the new node (the "last writer" rule). Control and
//! target wires both count as data dependencies, so no commutation analysis
//! happens here. The DAG is mutable until [`Dag::validate`] freezes it and
//! caches the topological order and depth.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// One gate or measurement application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpNode {
    /// The gate being applied.
    pub gate: Gate,
    /// Absolute qubit indices, length equal to the gate span.
    pub qubits: Vec<usize>,
    /// Classical target for measurements, `None` otherwise.
    pub clbit: Option<usize>,
}

/// Dependency DAG over gate applications.
///
/// Edges carry the qubit wire that induced them. A node acquires one edge
/// per *distinct* last writer of its wires, so parent sets never contain
/// duplicates even when a multi-qubit gate follows another on several wires.
#[derive(Debug, Clone)]
pub struct Dag {
    graph: DiGraph<OpNode, usize>,
    qubits: usize,
    clbits: usize,
    /// Most recent node touching each wire.
    last_writer: Vec<Option<NodeIndex>>,
    /// Per-wire chronological log of node additions.
    wire_log: Vec<Vec<NodeIndex>>,
    frozen: bool,
    topo: Vec<NodeIndex>,
    depth: usize,
}

impl Dag {
    /// Create an empty DAG over `qubits` wires and `clbits` classical bits.
    pub fn new(qubits: usize, clbits: usize) -> Self {
        Self {
            graph: DiGraph::default(),
            qubits,
            clbits,
            last_writer: vec![None; qubits],
            wire_log: vec![Vec::new(); qubits],
            frozen: false,
            topo: Vec::new(),
            depth: 0,
        }
    }

    /// Number of qubits.
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Number of classical bits.
    pub fn clbits(&self) -> usize {
        self.clbits
    }

    /// Number of operation nodes.
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether [`Dag::validate`] has frozen this DAG.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Append a gate application on the given absolute qubits.
    pub fn add_gate(&mut self, gate: Gate, qubits: &[usize]) -> IrResult<NodeIndex> {
        if self.frozen {
            return Err(IrError::Frozen);
        }
        self.check_gate(gate, qubits)?;
        Ok(self.insert(gate, qubits.to_vec(), None))
    }

    /// Append a measurement of `qubit` into classical bit `clbit`.
    pub fn add_measure(&mut self, qubit: usize, clbit: usize) -> IrResult<NodeIndex> {
        if self.frozen {
            return Err(IrError::Frozen);
        }
        if qubit >= self.qubits {
            return Err(IrError::BadQubit {
                qubit,
                qubits: self.qubits,
            });
        }
        if clbit >= self.clbits {
            return Err(IrError::BadClbit {
                clbit,
                clbits: self.clbits,
            });
        }
        Ok(self.insert(Gate::Measure, vec![qubit], Some(clbit)))
    }

    /// Freeze the DAG: cycle-check, then cache topological order and depth.
    ///
    /// Idempotent; a second call on a frozen DAG is a no-op. The last-writer
    /// construction cannot create a cycle, so an [`IrError::Cycle`] here
    /// means an internal bug.
    pub fn validate(&mut self) -> IrResult<()> {
        if self.frozen {
            return Ok(());
        }
        self.check_acyclic()?;
        self.topo = self.topo_order();
        self.depth = self.longest_path();
        self.frozen = true;
        Ok(())
    }

    /// Cached topological order, or `None` before validation.
    pub fn operations(&self) -> Option<&[NodeIndex]> {
        if self.frozen { Some(&self.topo) } else { None }
    }

    /// Longest-path depth of the DAG. Zero until validated.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The operation stored at `node`, if it exists.
    pub fn node(&self, node: NodeIndex) -> Option<&OpNode> {
        self.graph.node_weight(node)
    }

    /// Distinct parents of `node` (order is not significant).
    pub fn parents(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .collect()
    }

    /// Distinct children of `node` (order is not significant).
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect()
    }

    /// Chronological list of operations that touched wire `qubit`.
    pub fn wire_ops(&self, qubit: usize) -> &[NodeIndex] {
        self.wire_log.get(qubit).map_or(&[], Vec::as_slice)
    }

    fn check_gate(&self, gate: Gate, qubits: &[usize]) -> IrResult<()> {
        if qubits.len() != gate.span() {
            return Err(IrError::SpanMismatch {
                gate: gate.name(),
                expected: gate.span(),
                got: qubits.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for &q in qubits {
            if q >= self.qubits {
                return Err(IrError::BadQubit {
                    qubit: q,
                    qubits: self.qubits,
                });
            }
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate: gate.name(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, gate: Gate, qubits: Vec<usize>, clbit: Option<usize>) -> NodeIndex {
        let node = self.graph.add_node(OpNode {
            gate,
            qubits: qubits.clone(),
            clbit,
        });
        let mut parents = FxHashSet::default();
        for &q in &qubits {
            if let Some(prev) = self.last_writer[q] {
                // One edge per distinct parent, tagged with the first wire
                // that induced it.
                if parents.insert(prev) {
                    self.graph.add_edge(prev, node, q);
                }
            }
            self.last_writer[q] = Some(node);
            self.wire_log[q].push(node);
        }
        node
    }

    /// Iterative three-color DFS over the child adjacency.
    fn check_acyclic(&self) -> IrResult<()> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        let mut state = vec![WHITE; self.graph.node_count()];
        let mut stack: Vec<NodeIndex> = Vec::new();

        for start in self.graph.node_indices() {
            if state[start.index()] != WHITE {
                continue;
            }
            stack.push(start);
            while let Some(&top) = stack.last() {
                if state[top.index()] == WHITE {
                    state[top.index()] = GRAY;
                    for child in self.graph.neighbors_directed(top, Direction::Outgoing) {
                        match state[child.index()] {
                            GRAY => {
                                return Err(IrError::Cycle {
                                    node: child.index(),
                                });
                            }
                            WHITE => stack.push(child),
                            _ => {}
                        }
                    }
                } else {
                    if state[top.index()] == GRAY {
                        state[top.index()] = BLACK;
                    }
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    /// Kahn's algorithm; ties drained in node insertion order.
    fn topo_order(&self) -> Vec<NodeIndex> {
        let mut in_deg = vec![0usize; self.graph.node_count()];
        for node in self.graph.node_indices() {
            in_deg[node.index()] = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .count();
        }

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|n| in_deg[n.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for child in self.graph.neighbors_directed(node, Direction::Outgoing) {
                in_deg[child.index()] -= 1;
                if in_deg[child.index()] == 0 {
                    ready.push(Reverse(child));
                }
            }
        }

        debug_assert_eq!(order.len(), self.graph.node_count());
        order
    }

    /// Longest path length: each node sits one layer below its deepest parent.
    fn longest_path(&self) -> usize {
        if self.topo.is_empty() {
            return 0;
        }
        let mut level = vec![0usize; self.graph.node_count()];
        let mut max = 0;
        for &node in &self.topo {
            let step = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|p| level[p.index()] + 1)
                .max()
                .unwrap_or(0);
            level[node.index()] = step;
            max = max.max(step);
        }
        max + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dag() {
        let mut dag = Dag::new(2, 0);
        assert_eq!(dag.num_ops(), 0);
        dag.validate().unwrap();
        assert_eq!(dag.depth(), 0);
        assert!(dag.operations().unwrap().is_empty());
    }

    #[test]
    fn test_last_writer_edges() {
        let mut dag = Dag::new(2, 0);
        let h = dag.add_gate(Gate::H, &[0]).unwrap();
        let cx = dag.add_gate(Gate::Cnot, &[0, 1]).unwrap();
        let x = dag.add_gate(Gate::X, &[1]).unwrap();

        assert!(dag.parents(h).is_empty());
        assert_eq!(dag.parents(cx), vec![h]);
        assert_eq!(dag.parents(x), vec![cx]);
        assert_eq!(dag.children(h), vec![cx]);
    }

    #[test]
    fn test_shared_parent_is_deduplicated() {
        // CNOT(0,1) writes both wires; a following SWAP(0,1) must get a
        // single parent edge, not two.
        let mut dag = Dag::new(2, 0);
        let cx = dag.add_gate(Gate::Cnot, &[0, 1]).unwrap();
        let sw = dag.add_gate(Gate::Swap, &[0, 1]).unwrap();
        assert_eq!(dag.parents(sw), vec![cx]);
        assert_eq!(dag.children(cx), vec![sw]);
    }

    #[test]
    fn test_add_gate_errors() {
        let mut dag = Dag::new(2, 1);

        assert_eq!(
            dag.add_gate(Gate::Cnot, &[0]),
            Err(IrError::SpanMismatch {
                gate: "CNOT",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            dag.add_gate(Gate::H, &[2]),
            Err(IrError::BadQubit {
                qubit: 2,
                qubits: 2
            })
        );
        assert_eq!(
            dag.add_gate(Gate::Cnot, &[1, 1]),
            Err(IrError::DuplicateQubit {
                qubit: 1,
                gate: "CNOT"
            })
        );
        // Failed additions must not leave nodes behind.
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_add_measure_errors() {
        let mut dag = Dag::new(1, 1);
        assert_eq!(
            dag.add_measure(3, 0),
            Err(IrError::BadQubit {
                qubit: 3,
                qubits: 1
            })
        );
        assert_eq!(
            dag.add_measure(0, 1),
            Err(IrError::BadClbit {
                clbit: 1,
                clbits: 1
            })
        );
        dag.add_measure(0, 0).unwrap();
    }

    #[test]
    fn test_frozen_rejects_mutation() {
        let mut dag = Dag::new(2, 1);
        dag.add_gate(Gate::H, &[0]).unwrap();
        dag.validate().unwrap();

        assert_eq!(dag.add_gate(Gate::X, &[0]), Err(IrError::Frozen));
        assert_eq!(dag.add_measure(0, 0), Err(IrError::Frozen));
    }

    #[test]
    fn test_validate_idempotent() {
        let mut dag = Dag::new(2, 0);
        dag.add_gate(Gate::H, &[0]).unwrap();
        dag.add_gate(Gate::Cnot, &[0, 1]).unwrap();

        dag.validate().unwrap();
        let order = dag.operations().unwrap().to_vec();
        let depth = dag.depth();

        dag.validate().unwrap();
        assert_eq!(dag.operations().unwrap(), order.as_slice());
        assert_eq!(dag.depth(), depth);
    }

    #[test]
    fn test_depth_counts_layers() {
        let mut dag = Dag::new(2, 0);
        dag.add_gate(Gate::H, &[0]).unwrap();
        dag.add_gate(Gate::H, &[1]).unwrap();
        dag.add_gate(Gate::Cnot, &[0, 1]).unwrap();
        dag.validate().unwrap();
        // Two parallel H's share a layer, CNOT sits below both.
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_topo_order_respects_parents() {
        let mut dag = Dag::new(3, 0);
        dag.add_gate(Gate::H, &[0]).unwrap();
        dag.add_gate(Gate::H, &[1]).unwrap();
        dag.add_gate(Gate::Cnot, &[0, 2]).unwrap();
        dag.add_gate(Gate::X, &[1]).unwrap();
        dag.add_gate(Gate::Cz, &[0, 1]).unwrap();
        dag.validate().unwrap();

        let order = dag.operations().unwrap();
        let pos = |n: NodeIndex| order.iter().position(|&m| m == n).unwrap();
        for &node in order {
            for parent in dag.parents(node) {
                assert!(pos(parent) < pos(node));
            }
        }
    }

    #[test]
    fn test_wire_log_is_chronological() {
        let mut dag = Dag::new(2, 1);
        let h = dag.add_gate(Gate::H, &[0]).unwrap();
        let cx = dag.add_gate(Gate::Cnot, &[0, 1]).unwrap();
        let m = dag.add_measure(0, 0).unwrap();

        assert_eq!(dag.wire_ops(0), &[h, cx, m]);
        assert_eq!(dag.wire_ops(1), &[cx]);
        assert!(dag.wire_ops(7).is_empty());
    }
}

// src/operations/mod.rs

//! Gate-level operations a circuit is made of.
//!
//! This is the whole instruction set a `Backend` has to understand to run
//! phase estimation: Hadamard, bit flip, swap, controlled phase, a controlled
//! permutation of a multi-qubit register (the modular-exponentiation block)
//! and measurement into a classical bit.

use crate::core::QubitId;

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)] // f64 angles rule out Eq
pub enum Operation {
    /// Hadamard gate.
    Hadamard {
        /// Qubit the gate acts on.
        target: QubitId,
    },

    /// Bit flip (Pauli X).
    PauliX {
        /// Qubit the gate acts on.
        target: QubitId,
    },

    /// Exchanges the states of two qubits.
    Swap {
        /// First qubit.
        qubit1: QubitId,
        /// Second qubit.
        qubit2: QubitId,
    },

    /// Multiplies the `|11>` component of `(control, target)` by `e^(iθ)`.
    /// Symmetric in its two qubits.
    ControlledPhase {
        /// Control qubit.
        control: QubitId,
        /// Target qubit.
        target: QubitId,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Permutes the basis states of the `targets` register when `control` is `|1>`.
    ///
    /// `targets[i]` is bit `i` of the register value `v`; the block maps
    /// `|v>` to `|table[v]>`. `table` must be a bijection on `0..2^targets.len()`.
    ControlledPermutation {
        /// Control qubit.
        control: QubitId,
        /// Register the permutation acts on, least significant qubit first.
        targets: Vec<QubitId>,
        /// Image of every register value.
        table: Vec<usize>,
        /// Display name, e.g. `"7^4 mod 15"`.
        label: String,
    },

    /// Projective measurement of `qubit` in the computational basis,
    /// written into classical bit `clbit`.
    Measure {
        /// Qubit measured.
        qubit: QubitId,
        /// Classical bit receiving the outcome.
        clbit: usize,
    },
}

impl Operation {
    /// Every qubit the operation touches, controls first.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Hadamard { target } | Operation::PauliX { target } => vec![*target],
            Operation::Swap { qubit1, qubit2 } => vec![*qubit1, *qubit2],
            Operation::ControlledPhase { control, target, .. } => vec![*control, *target],
            Operation::ControlledPermutation { control, targets, .. } => {
                let mut qubits = Vec::with_capacity(targets.len() + 1);
                qubits.push(*control);
                qubits.extend(targets.iter().copied());
                qubits
            }
            Operation::Measure { qubit, .. } => vec![*qubit],
        }
    }

    /// Classical bit written by the operation, if any.
    pub fn clbit(&self) -> Option<usize> {
        match self {
            Operation::Measure { clbit, .. } => Some(*clbit),
            _ => None,
        }
    }

    /// Returns a copy with every qubit `q` replaced by `f(q)`.
    pub fn map_qubits<F>(&self, f: F) -> Operation
    where
        F: Fn(QubitId) -> QubitId,
    {
        match self {
            Operation::Hadamard { target } => Operation::Hadamard { target: f(*target) },
            Operation::PauliX { target } => Operation::PauliX { target: f(*target) },
            Operation::Swap { qubit1, qubit2 } => Operation::Swap { qubit1: f(*qubit1), qubit2: f(*qubit2) },
            Operation::ControlledPhase { control, target, theta } => Operation::ControlledPhase {
                control: f(*control),
                target: f(*target),
                theta: *theta,
            },
            Operation::ControlledPermutation { control, targets, table, label } => Operation::ControlledPermutation {
                control: f(*control),
                targets: targets.iter().map(|q| f(*q)).collect(),
                table: table.clone(),
                label: label.clone(),
            },
            Operation::Measure { qubit, clbit } => Operation::Measure { qubit: f(*qubit), clbit: *clbit },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controlled_permutation_lists_control_first() {
        let op = Operation::ControlledPermutation {
            control: QubitId(0),
            targets: vec![QubitId(8), QubitId(9)],
            table: vec![0, 2, 1, 3],
            label: "swap".to_string(),
        };
        assert_eq!(op.involved_qubits(), vec![QubitId(0), QubitId(8), QubitId(9)]);
        assert_eq!(op.clbit(), None);
    }

    #[test]
    fn map_qubits_keeps_parameters() {
        let op = Operation::ControlledPhase { control: QubitId(0), target: QubitId(1), theta: 0.5 };
        let shifted = op.map_qubits(|q| QubitId(q.0 + 4));
        assert_eq!(shifted, Operation::ControlledPhase { control: QubitId(4), target: QubitId(5), theta: 0.5 });

        let measure = Operation::Measure { qubit: QubitId(2), clbit: 2 };
        assert_eq!(measure.map_qubits(|q| QubitId(q.0 + 1)).clbit(), Some(2));
    }
}

// src/simulation/engine.rs
use crate::core::constants::MAX_SIMULATED_QUBITS;
use crate::core::{QubitId, ShorError, StateVector};
use crate::operations::Operation;
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

/// State-vector engine for a single shot: the amplitudes of all qubits plus
/// the classical bits written by measurements so far.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    state: StateVector,
    num_qubits: usize,
    clbits: Vec<u8>,
}

impl SimulationEngine {
    /// Initializes `|0...0>` over `num_qubits` qubits with `num_clbits` zeroed classical bits.
    pub(crate) fn init(num_qubits: usize, num_clbits: usize) -> Result<Self, ShorError> {
        if num_qubits == 0 {
            return Err(ShorError::InvalidOperation { message: "Cannot initialize simulation engine with zero qubits".to_string() });
        }
        if num_qubits > MAX_SIMULATED_QUBITS {
            return Err(ShorError::SimulationError {
                message: format!("{} qubits exceed the simulator limit of {}", num_qubits, MAX_SIMULATED_QUBITS),
            });
        }
        Ok(Self {
            state: StateVector::basis(num_qubits, 0)?,
            num_qubits,
            clbits: vec![0; num_clbits],
        })
    }

    /// Starts from a prepared state instead of `|0...0>`.
    pub(crate) fn from_state(state: StateVector, num_clbits: usize) -> Self {
        Self {
            num_qubits: state.num_qubits(),
            state,
            clbits: vec![0; num_clbits],
        }
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn into_state(self) -> StateVector {
        self.state
    }

    /// Classical register, most significant bit first.
    pub(crate) fn bitstring(&self) -> String {
        self.clbits.iter().rev().map(|b| if *b == 1 { '1' } else { '0' }).collect()
    }

    /// Rejects operations that do not fit this engine's registers.
    pub(crate) fn check_operation(&self, op: &Operation) -> Result<(), ShorError> {
        let qubits = op.involved_qubits();
        for q in &qubits {
            if q.0 >= self.num_qubits {
                return Err(ShorError::InvalidOperation {
                    message: format!("{} is outside the {}-qubit register", q, self.num_qubits),
                });
            }
        }
        let mut distinct = qubits.clone();
        distinct.sort();
        distinct.dedup();
        if distinct.len() != qubits.len() {
            return Err(ShorError::InvalidOperation { message: format!("Operation {:?} uses a qubit twice", op) });
        }
        if let Some(clbit) = op.clbit() {
            if clbit >= self.clbits.len() {
                return Err(ShorError::InvalidOperation {
                    message: format!("Classical bit {} is outside the {}-bit register", clbit, self.clbits.len()),
                });
            }
        }
        if let Operation::ControlledPermutation { targets, table, label, .. } = op {
            check_permutation(targets.len(), table)
                .map_err(|message| ShorError::InvalidOperation { message: format!("Block '{}': {}", label, message) })?;
        }
        Ok(())
    }

    /// Applies one operation; measurements draw from `rng`.
    pub(crate) fn apply_operation<R: Rng + ?Sized>(&mut self, op: &Operation, rng: &mut R) -> Result<(), ShorError> {
        match op {
            Operation::Measure { qubit, clbit } => {
                self.check_operation(op)?;
                self.measure(*qubit, *clbit, rng);
                Ok(())
            }
            _ => self.apply_unitary(op),
        }
    }

    /// Applies a non-measurement operation.
    pub(crate) fn apply_unitary(&mut self, op: &Operation) -> Result<(), ShorError> {
        self.check_operation(op)?;
        match op {
            Operation::Hadamard { target } => {
                let h = Complex::new(FRAC_1_SQRT_2, 0.0);
                self.apply_single_qubit_gate(*target, &[[h, h], [h, -h]]);
            }
            Operation::PauliX { target } => {
                let mask = 1usize << target.0;
                let amplitudes = self.state.vector_mut();
                for i in 0..amplitudes.len() {
                    if i & mask == 0 {
                        amplitudes.swap(i, i | mask);
                    }
                }
            }
            Operation::Swap { qubit1, qubit2 } => {
                let m1 = 1usize << qubit1.0;
                let m2 = 1usize << qubit2.0;
                let amplitudes = self.state.vector_mut();
                for i in 0..amplitudes.len() {
                    // visit each |..1..0..> / |..0..1..> pair once
                    if i & m1 != 0 && i & m2 == 0 {
                        amplitudes.swap(i, (i & !m1) | m2);
                    }
                }
            }
            Operation::ControlledPhase { control, target, theta } => {
                let mask = (1usize << control.0) | (1usize << target.0);
                let phase = Complex::from_polar(1.0, *theta);
                for (i, amp) in self.state.vector_mut().iter_mut().enumerate() {
                    if i & mask == mask {
                        *amp *= phase;
                    }
                }
            }
            Operation::ControlledPermutation { control, targets, table, .. } => {
                self.apply_controlled_permutation(*control, targets, table);
            }
            Operation::Measure { .. } => {
                return Err(ShorError::InvalidOperation {
                    message: "Measure cannot be applied as a unitary".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Projective measurement: samples the qubit's value with Born probabilities,
    /// collapses and renormalizes the state and records the outcome.
    fn measure<R: Rng + ?Sized>(&mut self, qubit: QubitId, clbit: usize, rng: &mut R) {
        let mask = 1usize << qubit.0;
        let (mut p0, mut p1) = (0.0, 0.0);
        for (i, amp) in self.state.vector().iter().enumerate() {
            if i & mask == 0 {
                p0 += amp.norm_sqr();
            } else {
                p1 += amp.norm_sqr();
            }
        }
        let sample: f64 = rng.random::<f64>();
        let outcome = usize::from(sample * (p0 + p1) < p1);
        let kept = if outcome == 1 { p1 } else { p0 };
        let scale = 1.0 / kept.sqrt();
        for (i, amp) in self.state.vector_mut().iter_mut().enumerate() {
            if ((i & mask) != 0) as usize == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        self.clbits[clbit] = outcome as u8;
    }

    /// Applies a 2x2 matrix to one qubit.
    fn apply_single_qubit_gate(&mut self, target: QubitId, matrix: &[[Complex<f64>; 2]; 2]) {
        let k_mask = 1usize << target.0;
        let lower_mask = k_mask - 1;
        let upper_mask = !((k_mask << 1) - 1);

        let amplitudes = self.state.vector_mut();
        // Iterate over pairs of basis states differing only at the target bit
        for i in 0..amplitudes.len() / 2 {
            let i0 = ((i << 1) & upper_mask) | (i & lower_mask);
            let i1 = i0 | k_mask;
            let psi_0 = amplitudes[i0];
            let psi_1 = amplitudes[i1];
            amplitudes[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amplitudes[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    fn apply_controlled_permutation(&mut self, control: QubitId, targets: &[QubitId], table: &[usize]) {
        let control_mask = 1usize << control.0;
        let target_mask: usize = targets.iter().map(|q| 1usize << q.0).sum();
        let old = self.state.vector();
        let mut new_vec = old.to_vec();
        for (i, amp) in old.iter().enumerate() {
            if i & control_mask == 0 {
                continue;
            }
            let value = targets
                .iter()
                .enumerate()
                .fold(0usize, |acc, (bit, q)| acc | (((i >> q.0) & 1) << bit));
            let image = table[value];
            let scattered = targets
                .iter()
                .enumerate()
                .fold(0usize, |acc, (bit, q)| acc | (((image >> bit) & 1) << q.0));
            new_vec[(i & !target_mask) | scattered] = *amp;
        }
        self.state.replace(new_vec);
    }
}

/// Checks that `table` is a bijection on `0..2^width`.
fn check_permutation(width: usize, table: &[usize]) -> Result<(), String> {
    let dim = 1usize << width;
    if table.len() != dim {
        return Err(format!("table has {} entries, expected {}", table.len(), dim));
    }
    let mut seen = vec![false; dim];
    for &image in table {
        if image >= dim || seen[image] {
            return Err(format!("table is not a permutation of 0..{}", dim));
        }
        seen[image] = true;
    }
    Ok(())
}

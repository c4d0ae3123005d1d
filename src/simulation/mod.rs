// src/simulation/mod.rs

//! Executes `Circuit`s on a state-vector simulator.
//!
//! Phase estimation only talks to the [`Backend`] trait; [`Simulator`] is the
//! in-crate implementation of it. `SimulationEngine` holds the per-shot state.

mod results;
pub(crate) mod engine;

pub use results::SimulationResult;

use crate::circuits::Circuit;
use crate::core::{ShorError, StateVector};
use crate::validation::check_normalization;
use engine::SimulationEngine;
use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Anything that can run a circuit and hand back measured bitstrings.
///
/// Bitstrings list classical bit `num_clbits - 1` first, so reading one as a
/// binary number gives `sum(bit_i * 2^i)`.
pub trait Backend {
    /// Runs `circuit` `shots` times and returns one bitstring per shot.
    fn execute(&mut self, circuit: &Circuit, shots: usize) -> Result<Vec<String>, ShorError>;
}

/// State-vector simulator with its own sampling RNG.
#[derive(Debug, Clone)]
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Creates a simulator seeded from operating-system entropy.
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Creates a simulator whose measurement samples are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Runs `circuit` for `shots` shots.
    ///
    /// Every shot starts from `|0...0>`, applies the operations in order and
    /// collapses the state at each `Measure`. Classical bits that no
    /// measurement writes read `0`.
    ///
    /// # Errors
    /// * `ShorError::InvalidOperation` for zero shots, an empty register or a
    ///   malformed operation.
    /// * `ShorError::Incoherence` if the state loses normalization.
    pub fn run(&mut self, circuit: &Circuit, shots: usize) -> Result<SimulationResult, ShorError> {
        if shots == 0 {
            return Err(ShorError::InvalidOperation { message: "At least one shot is required".to_string() });
        }
        let template = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits())?;
        for op in circuit.operations() {
            template.check_operation(op)?;
        }
        debug!(
            "simulating {} operations on {} qubits for {} shot(s)",
            circuit.len(),
            circuit.num_qubits(),
            shots
        );

        let mut result = SimulationResult::new();
        for shot in 0..shots {
            let mut engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits())?;
            for op in circuit.operations() {
                engine.apply_operation(op, &mut self.rng)?;
            }
            check_normalization(engine.state(), None)?;
            let bits = engine.bitstring();
            trace!("shot {}: {}", shot, bits);
            result.record_shot(bits);
        }
        Ok(result)
    }

    /// Final state of a measurement-free circuit started in `|0...0>`.
    pub fn statevector(&self, circuit: &Circuit) -> Result<StateVector, ShorError> {
        let engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits())?;
        Self::evolve(engine, circuit)
    }

    /// Evolves a prepared `state` through a measurement-free circuit.
    /// The circuit may not use more qubits than `state` has.
    pub fn apply_to(&self, state: StateVector, circuit: &Circuit) -> Result<StateVector, ShorError> {
        if circuit.num_qubits() > state.num_qubits() {
            return Err(ShorError::InvalidOperation {
                message: format!(
                    "Circuit needs {} qubits but the state has {}",
                    circuit.num_qubits(),
                    state.num_qubits()
                ),
            });
        }
        Self::evolve(SimulationEngine::from_state(state, circuit.num_clbits()), circuit)
    }

    fn evolve(mut engine: SimulationEngine, circuit: &Circuit) -> Result<StateVector, ShorError> {
        if circuit.has_measurements() {
            return Err(ShorError::InvalidOperation {
                message: "State evolution requires a circuit without measurements".to_string(),
            });
        }
        for op in circuit.operations() {
            engine.apply_unitary(op)?;
        }
        check_normalization(engine.state(), None)?;
        Ok(engine.into_state())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Simulator {
    fn execute(&mut self, circuit: &Circuit, shots: usize) -> Result<Vec<String>, ShorError> {
        Ok(self.run(circuit, shots)?.into_memory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QubitId;
    use crate::operations::Operation;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i,
                actual[i],
                expected[i],
                context
            );
        }
    }

    #[test]
    fn zero_shots_is_rejected() {
        let circuit = CircuitBuilder::new().add_op(Operation::Hadamard { target: q(0) }).build();
        assert!(Simulator::with_seed(0).run(&circuit, 0).is_err());
    }

    #[test]
    fn empty_circuit_has_no_register() {
        assert!(Simulator::with_seed(0).run(&Circuit::new(), 1).is_err());
    }

    #[test]
    fn invalid_operation_is_reported_before_running() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::ControlledPermutation {
                control: q(0),
                targets: vec![q(1)],
                table: vec![1, 1],
                label: "broken".to_string(),
            })
            .build();
        let err = Simulator::with_seed(0).run(&circuit, 1).unwrap_err();
        assert!(matches!(err, ShorError::InvalidOperation { ref message } if message.contains("broken")));
    }

    #[test]
    fn unmeasured_clbits_read_zero() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new()
            .with_clbits(3)
            .add_op(Operation::PauliX { target: q(0) })
            .add_op(Operation::Measure { qubit: q(0), clbit: 1 })
            .build();
        let result = Simulator::with_seed(3).run(&circuit, 4)?;
        assert_eq!(result.memory(), &["010", "010", "010", "010"]);
        Ok(())
    }

    #[test]
    fn seeded_runs_are_reproducible() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new()
            .add_ops((0..4).map(|i| Operation::Hadamard { target: q(i) }))
            .add_ops((0..4).map(|i| Operation::Measure { qubit: q(i), clbit: i }))
            .build();
        let a = Simulator::with_seed(42).run(&circuit, 32)?;
        let b = Simulator::with_seed(42).run(&circuit, 32)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn superposition_samples_both_outcomes() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Hadamard { target: q(0) })
            .add_op(Operation::Measure { qubit: q(0), clbit: 0 })
            .build();
        let counts = Simulator::with_seed(11).run(&circuit, 1024)?.counts();
        let zeros = counts.get("0").copied().unwrap_or(0);
        let ones = counts.get("1").copied().unwrap_or(0);
        assert_eq!(zeros + ones, 1024);
        assert!(zeros > 400 && ones > 400, "unbalanced sampling: {} / {}", zeros, ones);
        Ok(())
    }

    #[test]
    fn statevector_of_plus_state() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new().add_op(Operation::Hadamard { target: q(0) }).build();
        let state = Simulator::with_seed(0).statevector(&circuit)?;
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(state.vector(), &[h, h], "H|0>");
        Ok(())
    }

    #[test]
    fn statevector_rejects_measurements() {
        let circuit = CircuitBuilder::new().add_op(Operation::Measure { qubit: q(0), clbit: 0 }).build();
        assert!(Simulator::with_seed(0).statevector(&circuit).is_err());
    }

    #[test]
    fn apply_to_starts_from_given_state() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new().add_op(Operation::Swap { qubit1: q(0), qubit2: q(1) }).build();
        let state = Simulator::with_seed(0).apply_to(StateVector::basis(3, 0b001)?, &circuit)?;
        assert_eq!(state, StateVector::basis(3, 0b010)?);

        let too_wide = CircuitBuilder::new().add_op(Operation::Hadamard { target: q(3) }).build();
        assert!(Simulator::with_seed(0).apply_to(StateVector::basis(3, 0)?, &too_wide).is_err());
        Ok(())
    }

    #[test]
    fn backend_execute_returns_memory() -> Result<(), ShorError> {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::PauliX { target: q(1) })
            .add_op(Operation::Measure { qubit: q(0), clbit: 0 })
            .add_op(Operation::Measure { qubit: q(1), clbit: 1 })
            .build();
        let mut backend = Simulator::with_seed(5);
        assert_eq!(backend.execute(&circuit, 2)?, vec!["10".to_string(), "10".to_string()]);
        Ok(())
    }
}

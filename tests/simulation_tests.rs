// tests/simulation_tests.rs

use shor15::core::ALLOWED_BASES;
use shor15::shor::decode_bitstring;
use shor15::{
    Backend, Circuit, CircuitBuilder, ModExpRealization, Operation, PhaseEstimator, QubitId, ShorError, Simulator,
};

// Helper function to create QubitId for tests
fn qid(id: usize) -> QubitId {
    QubitId(id)
}

fn order_of(base: u64) -> u64 {
    (1..=15).find(|&r| (0..r).fold(1u64, |acc, _| acc * base % 15) == 1).unwrap_or(0)
}

fn cnot(control: usize, target: usize) -> Operation {
    Operation::ControlledPermutation {
        control: qid(control),
        targets: vec![qid(target)],
        table: vec![1, 0],
        label: "X".to_string(),
    }
}

#[test]
fn test_zero_shots_rejected() {
    let circuit = CircuitBuilder::new().add_op(Operation::Hadamard { target: qid(0) }).build();
    let mut simulator = Simulator::with_seed(0);
    assert!(matches!(simulator.run(&circuit, 0), Err(ShorError::InvalidOperation { .. })));
}

#[test]
fn test_unmeasured_bits_read_zero() -> Result<(), ShorError> {
    let circuit = CircuitBuilder::new()
        .with_clbits(3)
        .add_op(Operation::PauliX { target: qid(0) })
        .add_op(Operation::Measure { qubit: qid(0), clbit: 1 })
        .build();
    let result = Simulator::with_seed(0).run(&circuit, 4)?;
    assert_eq!(result.shots(), 4);
    assert!(result.memory().iter().all(|bits| bits == "010"));
    Ok(())
}

#[test]
fn test_bell_pair_is_correlated() -> Result<(), ShorError> {
    let circuit = CircuitBuilder::new()
        .add_op(Operation::Hadamard { target: qid(0) })
        .add_op(cnot(0, 1))
        .add_op(Operation::Measure { qubit: qid(0), clbit: 0 })
        .add_op(Operation::Measure { qubit: qid(1), clbit: 1 })
        .build();
    let result = Simulator::with_seed(11).run(&circuit, 200)?;
    let counts = result.counts();
    assert!(counts.keys().all(|bits| bits == "00" || bits == "11"), "{:?}", counts);
    assert_eq!(counts.len(), 2, "both outcomes expected in 200 shots: {:?}", counts);
    Ok(())
}

#[test]
fn test_seeded_runs_are_reproducible() -> Result<(), ShorError> {
    let circuit = PhaseEstimator::default().build_circuit(7)?;
    let first = Simulator::with_seed(99).run(&circuit, 16)?;
    let second = Simulator::with_seed(99).run(&circuit, 16)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_malformed_operation_rejected() {
    let circuit = CircuitBuilder::new()
        .with_qubits(2)
        .add_op(Operation::Swap { qubit1: qid(1), qubit2: qid(1) })
        .build();
    assert!(Simulator::with_seed(0).run(&circuit, 1).is_err());
}

#[test]
fn test_statevector_rejects_measurements() {
    let circuit = CircuitBuilder::new().add_op(Operation::Measure { qubit: qid(0), clbit: 0 }).build();
    assert!(matches!(Simulator::with_seed(0).statevector(&circuit), Err(ShorError::InvalidOperation { .. })));
}

#[test]
fn test_phase_estimation_reads_multiples_of_256_over_order() -> Result<(), ShorError> {
    let estimator = PhaseEstimator::default();
    for (i, &base) in ALLOWED_BASES.iter().enumerate() {
        let order = order_of(base);
        let circuit = estimator.build_circuit(base)?;
        let result = Simulator::with_seed(i as u64).run(&circuit, 128)?;
        let counts = result.counts();
        for bits in counts.keys() {
            let reading = decode_bitstring(bits)?;
            assert_eq!(reading.register_value * order % 256, 0, "a={} read {}", base, bits);
        }
        // each of the r peaks carries probability 1/r
        assert_eq!(counts.len() as u64, order, "a={} counts {:?}", base, counts);
    }
    Ok(())
}

#[test]
fn test_swap_network_phase_estimation() -> Result<(), ShorError> {
    let circuit = PhaseEstimator::new(ModExpRealization::SwapNetwork).build_circuit(13)?;
    let mut simulator = Simulator::with_seed(5);
    for bits in simulator.execute(&circuit, 8)? {
        assert_eq!(decode_bitstring(&bits)?.register_value % 64, 0, "{}", bits);
    }
    Ok(())
}

#[test]
fn test_phase_estimation_circuit_shape() -> Result<(), ShorError> {
    let circuit: Circuit = PhaseEstimator::default().build_circuit(2)?;
    assert_eq!(circuit.num_qubits(), 12);
    assert_eq!(circuit.num_clbits(), 8);
    let measured: Vec<(QubitId, usize)> = circuit
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Measure { qubit, clbit } => Some((*qubit, *clbit)),
            _ => None,
        })
        .collect();
    assert_eq!(measured, (0..8).map(|q| (qid(q), q)).collect::<Vec<_>>());
    Ok(())
}

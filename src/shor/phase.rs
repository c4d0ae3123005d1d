// src/shor/phase.rs

//! Quantum phase estimation of `x -> a x mod 15`.

use crate::circuits::modexp::{ModExpBuilder, ModExpRealization};
use crate::circuits::qft::inverse_qft;
use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::constants::{AUX_QUBITS, N_COUNT};
use crate::core::{QubitId, ShorError};
use crate::operations::Operation;
use crate::simulation::Backend;
use log::debug;
use num_rational::Ratio;
use std::fmt;

/// One decoded read-out of the counting register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReading {
    /// Raw bitstring, classical bit 7 first.
    pub bitstring: String,
    /// The bitstring as an unsigned integer.
    pub register_value: u64,
    /// `register_value / 2^8`, reduced.
    pub phase: Ratio<u64>,
}

impl fmt::Display for PhaseReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} / {} = {}", self.bitstring, self.register_value, 1u64 << N_COUNT, self.phase)
    }
}

/// Decodes a counting-register bitstring.
///
/// # Errors
/// `ShorError::MalformedMeasurement` unless `bits` is exactly 8 characters of `0`/`1`.
pub fn decode_bitstring(bits: &str) -> Result<PhaseReading, ShorError> {
    if bits.len() != N_COUNT || !bits.chars().all(|c| c == '0' || c == '1') {
        return Err(ShorError::MalformedMeasurement {
            message: format!("Expected {} binary digits, got '{}'", N_COUNT, bits),
        });
    }
    let register_value = u64::from_str_radix(bits, 2).map_err(|e| ShorError::MalformedMeasurement {
        message: format!("Cannot parse '{}': {}", bits, e),
    })?;
    Ok(PhaseReading {
        bitstring: bits.to_string(),
        register_value,
        phase: Ratio::new(register_value, 1u64 << N_COUNT),
    })
}

/// Assembles and runs the phase-estimation circuit.
///
/// Layout: counting qubits `0..8`, auxiliary register `8..12` holding `1`,
/// classical bits `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEstimator {
    realization: ModExpRealization,
    shots: usize,
}

impl PhaseEstimator {
    pub fn new(realization: ModExpRealization) -> Self {
        Self { realization, shots: 1 }
    }

    /// Number of samples requested per estimate. Only the first one is decoded.
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn realization(&self) -> ModExpRealization {
        self.realization
    }

    /// Builds the 12-qubit, 8-clbit estimation circuit for `base`.
    ///
    /// # Errors
    /// `ShorError::InvalidBase` when the base has no modular-exponentiation block.
    pub fn build_circuit(&self, base: u64) -> Result<Circuit, ShorError> {
        let modexp = ModExpBuilder::new(base)?;
        let counting: Vec<QubitId> = (0..N_COUNT).map(QubitId).collect();
        let aux: Vec<QubitId> = (N_COUNT..N_COUNT + AUX_QUBITS).map(QubitId).collect();

        let mut builder = CircuitBuilder::new()
            .with_qubits(N_COUNT + AUX_QUBITS)
            .with_clbits(N_COUNT)
            .with_name(format!("QPE(a={})", base))
            .add_ops(counting.iter().map(|&q| Operation::Hadamard { target: q }))
            .add_op(Operation::PauliX { target: aux[0] });

        for (q, &control) in counting.iter().enumerate() {
            let power = 1u64 << q;
            builder = builder.add_ops(modexp.controlled_with(self.realization, control, &aux, power)?);
        }

        let circuit = builder
            .append_mapped(&inverse_qft(N_COUNT)?, &counting)?
            .add_ops(counting.iter().map(|&q| Operation::Measure { qubit: q, clbit: q.0 }))
            .build();
        debug!("built {} with {} operations", circuit.name().unwrap_or("QPE"), circuit.len());
        Ok(circuit)
    }

    /// Runs the circuit for `base` on `backend` and decodes the first sample.
    ///
    /// # Errors
    /// Builder and backend errors propagate; `ShorError::MalformedMeasurement`
    /// if the backend returns no usable sample.
    pub fn estimate<B: Backend + ?Sized>(&self, base: u64, backend: &mut B) -> Result<PhaseReading, ShorError> {
        let circuit = self.build_circuit(base)?;
        let samples = backend.execute(&circuit, self.shots)?;
        let first = samples.first().ok_or_else(|| ShorError::MalformedMeasurement {
            message: "Backend returned no samples".to_string(),
        })?;
        decode_bitstring(first)
    }
}

impl Default for PhaseEstimator {
    fn default() -> Self {
        Self::new(ModExpRealization::default())
    }
}

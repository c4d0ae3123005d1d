// src/circuits/qft.rs

//! Quantum Fourier transform circuits on qubits `0..n`.
//!
//! The inverse transform is the read-out stage of phase estimation. Use
//! [`Circuit::append_mapped`] to place either circuit on another register.

use super::{Circuit, CircuitBuilder};
use crate::core::{QubitId, ShorError};
use crate::operations::Operation;
use std::f64::consts::PI;

/// Angle of the controlled phase between qubits `distance` apart: `π / 2^distance`.
fn rotation(distance: usize) -> f64 {
    PI / 2f64.powi(distance as i32)
}

fn check_width(n: usize) -> Result<(), ShorError> {
    if n == 0 {
        return Err(ShorError::InvalidOperation { message: "QFT needs at least one qubit".to_string() });
    }
    Ok(())
}

/// Bit-reversal swaps followed by, for each `j`, controlled phases
/// `-π/2^(j-m)` from every `m < j` and a Hadamard on `j`.
pub fn inverse_qft(n: usize) -> Result<Circuit, ShorError> {
    check_width(n)?;
    let mut builder = CircuitBuilder::new().with_qubits(n).with_name("QFT†");
    for qubit in 0..n / 2 {
        builder = builder.add_op(Operation::Swap { qubit1: QubitId(qubit), qubit2: QubitId(n - qubit - 1) });
    }
    for j in 0..n {
        for m in 0..j {
            builder = builder.add_op(Operation::ControlledPhase {
                control: QubitId(m),
                target: QubitId(j),
                theta: -rotation(j - m),
            });
        }
        builder = builder.add_op(Operation::Hadamard { target: QubitId(j) });
    }
    Ok(builder.build())
}

/// Adjoint of [`inverse_qft`]: the same gates in reverse order with positive angles.
pub fn qft(n: usize) -> Result<Circuit, ShorError> {
    check_width(n)?;
    let mut builder = CircuitBuilder::new().with_qubits(n).with_name("QFT");
    for j in (0..n).rev() {
        builder = builder.add_op(Operation::Hadamard { target: QubitId(j) });
        for m in (0..j).rev() {
            builder = builder.add_op(Operation::ControlledPhase {
                control: QubitId(m),
                target: QubitId(j),
                theta: rotation(j - m),
            });
        }
    }
    for qubit in (0..n / 2).rev() {
        builder = builder.add_op(Operation::Swap { qubit1: QubitId(qubit), qubit2: QubitId(n - qubit - 1) });
    }
    Ok(builder.build())
}

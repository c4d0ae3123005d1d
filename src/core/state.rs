// src/core/state.rs

use super::error::ShorError;
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;

/// Amplitudes of an `n`-qubit register over the `2^n` computational basis states.
///
/// Index `k` of the vector is the basis state whose bit `q` is the value of
/// qubit `q` (little-endian, matching the classical register layout).
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl StateVector {
    /// Creates the basis state `|index>` over `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self, ShorError> {
        let dim = 1usize.checked_shl(num_qubits as u32).ok_or_else(|| ShorError::SimulationError {
            message: format!("{} qubits overflow the state vector dimension", num_qubits),
        })?;
        if index >= dim {
            return Err(ShorError::InvalidOperation {
                message: format!("Basis index {} out of range for {} qubits", index, num_qubits),
            });
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::one();
        Ok(Self { amplitudes, num_qubits })
    }

    /// Wraps a raw amplitude vector. Its length must be a power of two.
    /// Normalization is not enforced here; see `validation::check_normalization`.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self, ShorError> {
        let dim = amplitudes.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(ShorError::InvalidOperation {
                message: format!("State vector length {} is not a power of two", dim),
            });
        }
        Ok(Self { num_qubits: dim.trailing_zeros() as usize, amplitudes })
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    pub(crate) fn replace(&mut self, amplitudes: Vec<Complex<f64>>) {
        debug_assert_eq!(amplitudes.len(), self.amplitudes.len());
        self.amplitudes = amplitudes;
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits the vector describes.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Born-rule probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_state_has_single_unit_amplitude() -> Result<(), ShorError> {
        let state = StateVector::basis(3, 5)?;
        assert_eq!(state.dim(), 8);
        assert_eq!(state.num_qubits(), 3);
        assert_eq!(state.vector()[5], Complex::one());
        assert_eq!(state.probabilities().iter().sum::<f64>(), 1.0);
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_basis_index() {
        assert!(StateVector::basis(2, 4).is_err());
    }

    #[test]
    fn rejects_non_power_of_two_amplitudes() {
        assert!(StateVector::from_amplitudes(vec![Complex::zero(); 3]).is_err());
        assert!(StateVector::from_amplitudes(Vec::new()).is_err());
    }
}

//! Error handling logic

use std::fmt;

/// Index of a qubit within a circuit.
/// Qubit `q` is bit `q` of a basis-state index (little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Errors raised while building, simulating or decoding factoring circuits.
///
/// Uninformative trials (odd order, trivial candidates, ...) are not errors;
/// they are reported as `TrialOutcome`s and retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShorError {
    /// The modular-exponentiation builder was asked for a base it has no
    /// permutation for. This is a precondition failure.
    InvalidBase {
        /// The rejected base
        base: u64,
    },

    /// A circuit, gate or argument is malformed.
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// The backend returned samples that cannot be decoded.
    MalformedMeasurement {
        /// MalformedMeasurement failure message
        message: String,
    },

    /// The state vector lost its normalization during evolution.
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    SimulationError {
        /// SimulationError failure message
        message: String,
    },
}

impl fmt::Display for ShorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShorError::InvalidBase { base } => {
                write!(f, "Invalid Base: {} (must be 2, 4, 7, 8, 11 or 13)", base)
            }
            ShorError::InvalidOperation { message } => write!(f, "Invalid Operation: {}", message),
            ShorError::MalformedMeasurement { message } => write!(f, "Malformed Measurement: {}", message),
            ShorError::Incoherence { message } => write!(f, "Incoherence Violation: {}", message),
            ShorError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

impl std::error::Error for ShorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_rejected_base() {
        let err = ShorError::InvalidBase { base: 14 };
        assert!(err.to_string().contains("14"));
    }

    #[test]
    fn qubit_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
    }
}

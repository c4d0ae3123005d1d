// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::{QubitId, ShorError};
pub use state::StateVector;

pub mod constants;
pub use constants::{ALLOWED_BASES, AUX_QUBITS, MODULUS, N_COUNT};

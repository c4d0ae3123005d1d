//! Fixed parameters of the factoring problem and its circuits.

/// The integer being factored.
pub const MODULUS: u64 = 15;

/// Number of counting qubits used by phase estimation.
pub const N_COUNT: usize = 8;

/// Width of the auxiliary register holding `x` in `x -> a*x mod 15`.
pub const AUX_QUBITS: usize = 4;

/// Bases the modular-exponentiation circuit can be built for.
pub const ALLOWED_BASES: [u64; 6] = [2, 4, 7, 8, 11, 13];

/// Default cap on controller trials before reporting an inconclusive run.
pub const DEFAULT_MAX_TRIALS: usize = 64;

/// Largest register the simulator will allocate a state vector for.
pub const MAX_SIMULATED_QUBITS: usize = 24;

/// Returns `true` when the modular-exponentiation builder supports `a`.
pub fn is_allowed_base(a: u64) -> bool {
    ALLOWED_BASES.contains(&a)
}

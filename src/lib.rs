// src/lib.rs

//! `shor15` - Shor's factoring algorithm for N = 15 on a simulated quantum computer
//!
//! The crate builds the quantum phase estimation circuit for `x -> a x mod 15`
//! (controlled modular exponentiation plus an inverse QFT), runs it on a
//! state-vector [`Simulator`] through the [`Backend`] trait, and turns single
//! measurements into factors with continued fractions and a retry loop.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod shor;

// Re-export the most common types for easier top-level use
pub use core::{QubitId, ShorError, StateVector, MODULUS, N_COUNT};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use circuits::modexp::{ModExpBuilder, ModExpRealization};
pub use circuits::qft::{inverse_qft, qft};
pub use simulation::{Backend, SimulationResult, Simulator};
pub use shor::{
    find_order, LogObserver, PhaseEstimator, PhaseReading, ShorConfig, ShorController, ShorOutcome,
    TrialObserver,
};

// Example 1: Factoring 15
// Runs the full loop with a seeded simulator and base generator.
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use shor15::{ShorConfig, ShorController, ShorOutcome, Simulator, ShorError};
///
/// # fn main() -> Result<(), ShorError> {
/// let mut controller = ShorController::new(ShorConfig::default(), Simulator::with_seed(2024));
/// let mut rng = StdRng::seed_from_u64(7);
///
/// match controller.run(&mut rng)? {
///     ShorOutcome::Factored(report) => {
///         println!("{}", report);
///         assert!(report.factor == 3 || report.factor == 5);
///         assert_eq!(report.factor * report.cofactor, 15);
///     }
///     ShorOutcome::Inconclusive { trials } => println!("gave up after {} trials", trials),
/// }
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Phase estimation for a = 7
// 7 has order 4 modulo 15, so the counting register only ever reads
// multiples of 256 / 4 = 64.
/// ```
/// use shor15::{PhaseEstimator, Simulator, ShorError};
/// use shor15::shor::decode_bitstring;
///
/// # fn main() -> Result<(), ShorError> {
/// let circuit = PhaseEstimator::default().build_circuit(7)?;
/// let result = Simulator::with_seed(1).run(&circuit, 64)?;
/// for bits in result.memory() {
///     let reading = decode_bitstring(bits)?;
///     assert_eq!(reading.register_value % 64, 0);
/// }
/// println!("{}", result);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

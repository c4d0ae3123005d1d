// src/shor/mod.rs

//! Shor's algorithm for N = 15: phase estimation, order recovery and the
//! retrying factoring loop.

pub mod controller;
pub mod observer;
pub mod order;
pub mod phase;

pub use controller::{
    FactorReport, ShorConfig, ShorController, ShorOutcome, TrialOutcome, TrialRecord, candidate_factors,
    is_nontrivial_factor, post_process,
};
pub use observer::{LogObserver, NullObserver, TrialObserver};
pub use order::{find_order, limit_denominator};
pub use phase::{PhaseEstimator, PhaseReading, decode_bitstring};

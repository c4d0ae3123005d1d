// src/shor/observer.rs

//! Trial-progress reporting for the factoring loop.

use super::controller::{ShorOutcome, TrialOutcome, TrialRecord};
use super::phase::PhaseReading;
use crate::core::MODULUS;
use log::{info, warn};

/// Receives progress from `ShorController`. Every method defaults to a no-op.
pub trait TrialObserver {
    /// A base was drawn for trial `trial` (1-based).
    fn base_selected(&mut self, _trial: usize, _base: u64) {}

    /// The counting register of trial `trial` was read.
    fn measured(&mut self, _trial: usize, _reading: &PhaseReading) {}

    /// Trial finished, successfully or not.
    fn trial_finished(&mut self, _record: &TrialRecord) {}

    /// The whole run finished.
    fn run_finished(&mut self, _outcome: &ShorOutcome) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TrialObserver for NullObserver {}

/// Writes progress through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TrialObserver for LogObserver {
    fn base_selected(&mut self, trial: usize, base: u64) {
        info!("trial {}: random a chosen: {}", trial, base);
    }

    fn measured(&mut self, trial: usize, reading: &PhaseReading) {
        info!("trial {}: register reading {}, phase {}", trial, reading.bitstring, reading.phase);
    }

    fn trial_finished(&mut self, record: &TrialRecord) {
        for line in trial_trace(record) {
            info!("trial {}: {}", record.trial, line);
        }
    }

    fn run_finished(&mut self, outcome: &ShorOutcome) {
        match outcome {
            ShorOutcome::Factored(report) => info!("{}", report),
            ShorOutcome::Inconclusive { trials } => warn!("no factor found after {} trials", trials),
        }
    }
}

/// Trace lines for a finished trial: gcd check, then order and candidates
/// when the circuit ran, then the verdict.
fn trial_trace(record: &TrialRecord) -> Vec<String> {
    let base = record.base;
    let verdict = match &record.outcome {
        TrialOutcome::NonCoprime { gcd } => {
            return vec![format!("gcd({}, {}) = {}, retrying", base, MODULUS, gcd)];
        }
        TrialOutcome::UnsupportedBase => format!("no modular-exponentiation circuit for a = {}, retrying", base),
        TrialOutcome::OddOrder { order } => format!("odd order {}, retrying", order),
        TrialOutcome::TrivialCandidates => "only trivial factors, retrying".to_string(),
        TrialOutcome::Factor { factor } => format!("non-trivial factor found: {}", factor),
    };

    let mut lines = vec![format!("gcd({}, {}) = 1", base, MODULUS)];
    if let Some(order) = record.order {
        lines.push(format!("order r = {}", order));
    }
    if let Some([low, high]) = record.candidates {
        lines.push(format!("guessed factors {} and {}", low, high));
    }
    lines.push(verdict);
    lines
}

/// Collects every finished trial.
impl TrialObserver for Vec<TrialRecord> {
    fn trial_finished(&mut self, record: &TrialRecord) {
        self.push(record.clone());
    }
}

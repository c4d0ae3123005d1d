// src/shor/controller.rs

//! The factoring loop: draw a base, estimate its order, try the candidate factors.

use super::observer::{LogObserver, TrialObserver};
use super::order::find_order;
use super::phase::{PhaseEstimator, PhaseReading};
use crate::circuits::modexp::{ModExpRealization, mod_pow};
use crate::core::constants::{DEFAULT_MAX_TRIALS, MODULUS, is_allowed_base};
use crate::core::ShorError;
use crate::simulation::Backend;
use num_integer::Integer;
use rand::Rng;
use std::fmt;

/// Run-time settings of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorConfig {
    /// Trials before giving up with `ShorOutcome::Inconclusive`; `None` retries forever.
    pub max_trials: Option<usize>,
    /// Shots per phase estimate (only the first is decoded).
    pub shots: usize,
    /// How modular exponentiation is lowered to gates.
    pub realization: ModExpRealization,
}

impl Default for ShorConfig {
    fn default() -> Self {
        Self {
            max_trials: Some(DEFAULT_MAX_TRIALS),
            shots: 1,
            realization: ModExpRealization::LookupTable,
        }
    }
}

/// Why a trial ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// `gcd(a, N) != 1`. The gcd is reported but not returned as a factor.
    NonCoprime {
        /// `gcd(a, N)`
        gcd: u64,
    },
    /// Coprime base without a modular-exponentiation circuit (a = 14).
    UnsupportedBase,
    /// The decoded order is odd (including r = 1).
    OddOrder {
        /// Decoded order
        order: u64,
    },
    /// Neither candidate is a proper divisor.
    TrivialCandidates,
    /// Success.
    Factor {
        /// Proper divisor of N
        factor: u64,
    },
}

impl TrialOutcome {
    /// `true` for every outcome except `Factor`.
    pub fn is_retry(&self) -> bool {
        !matches!(self, TrialOutcome::Factor { .. })
    }
}

/// Everything decided during one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    /// 1-based trial number.
    pub trial: usize,
    pub base: u64,
    pub reading: Option<PhaseReading>,
    pub order: Option<u64>,
    /// `[gcd(a^(r/2) - 1, N), gcd(a^(r/2) + 1, N)]`
    pub candidates: Option<[u64; 2]>,
    pub outcome: TrialOutcome,
}

impl TrialRecord {
    fn new(trial: usize, base: u64, outcome: TrialOutcome) -> Self {
        Self {
            trial,
            base,
            reading: None,
            order: None,
            candidates: None,
            outcome,
        }
    }
}

/// A verified factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorReport {
    pub factor: u64,
    /// `N / factor`
    pub cofactor: u64,
    pub base: u64,
    pub order: u64,
    /// Trials used, including the successful one.
    pub trials: usize,
}

impl fmt::Display for FactorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} x {} (a = {}, r = {}, {} trial{})",
            MODULUS,
            self.factor,
            self.cofactor,
            self.base,
            self.order,
            self.trials,
            if self.trials == 1 { "" } else { "s" }
        )
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorOutcome {
    Factored(FactorReport),
    /// The trial cap was reached without a factor.
    Inconclusive {
        trials: usize,
    },
}

impl ShorOutcome {
    /// The factor, if one was found.
    pub fn factor(&self) -> Option<u64> {
        match self {
            ShorOutcome::Factored(report) => Some(report.factor),
            ShorOutcome::Inconclusive { .. } => None,
        }
    }
}

/// `g` is a proper divisor of N.
pub fn is_nontrivial_factor(g: u64) -> bool {
    g != 1 && g != MODULUS && g != 0 && MODULUS % g == 0
}

/// `[gcd(a^(r/2) - 1, N), gcd(a^(r/2) + 1, N)]` for even `order`.
pub fn candidate_factors(base: u64, order: u64) -> [u64; 2] {
    let half_power = mod_pow(base, order / 2, MODULUS);
    [
        ((half_power + MODULUS - 1) % MODULUS).gcd(&MODULUS),
        ((half_power + 1) % MODULUS).gcd(&MODULUS),
    ]
}

/// Classical post-processing of a reading for base `base`:
/// decode the order, check parity, compute and test the candidates.
pub fn post_process(trial: usize, base: u64, reading: PhaseReading) -> Result<TrialRecord, ShorError> {
    let order = find_order(reading.phase, MODULUS)?;
    let mut record = TrialRecord::new(trial, base, TrialOutcome::TrivialCandidates);
    record.reading = Some(reading);
    record.order = Some(order);

    if order.is_odd() {
        record.outcome = TrialOutcome::OddOrder { order };
        return Ok(record);
    }

    let candidates = candidate_factors(base, order);
    record.candidates = Some(candidates);
    if let Some(&factor) = candidates.iter().find(|&&g| is_nontrivial_factor(g)) {
        record.outcome = TrialOutcome::Factor { factor };
    }
    Ok(record)
}

/// Drives trials against a `Backend` until a factor is found or the trial cap is hit.
pub struct ShorController<B, O = LogObserver> {
    config: ShorConfig,
    backend: B,
    estimator: PhaseEstimator,
    observer: O,
}

impl<B: Backend> ShorController<B> {
    /// Creates a controller reporting through [`LogObserver`].
    pub fn new(config: ShorConfig, backend: B) -> Self {
        Self {
            estimator: PhaseEstimator::new(config.realization).with_shots(config.shots),
            config,
            backend,
            observer: LogObserver,
        }
    }
}

impl<B: Backend, O: TrialObserver> ShorController<B, O> {
    /// Replaces the observer.
    pub fn with_observer<P: TrialObserver>(self, observer: P) -> ShorController<B, P> {
        ShorController {
            config: self.config,
            backend: self.backend,
            estimator: self.estimator,
            observer,
        }
    }

    pub fn config(&self) -> &ShorConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the controller, returning its backend and observer.
    pub fn into_parts(self) -> (B, O) {
        (self.backend, self.observer)
    }

    /// Runs trials with bases drawn from `rng` until success or the trial cap.
    ///
    /// # Errors
    /// Backend failures end the run; uninformative trials never do.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ShorOutcome, ShorError> {
        let mut trial = 0;
        let outcome = loop {
            if self.config.max_trials.is_some_and(|max| trial >= max) {
                break ShorOutcome::Inconclusive { trials: trial };
            }
            trial += 1;
            let record = self.run_trial(rng, trial)?;
            if let (TrialOutcome::Factor { factor }, Some(order)) = (&record.outcome, record.order) {
                break ShorOutcome::Factored(FactorReport {
                    factor: *factor,
                    cofactor: MODULUS / factor,
                    base: record.base,
                    order,
                    trials: trial,
                });
            }
        };
        self.observer.run_finished(&outcome);
        Ok(outcome)
    }

    /// One trial with a base drawn uniformly from `[2, N-1]`.
    pub fn run_trial<R: Rng + ?Sized>(&mut self, rng: &mut R, trial: usize) -> Result<TrialRecord, ShorError> {
        let base = rng.random_range(2..MODULUS);
        self.evaluate_base(trial, base)
    }

    /// One trial with a given base.
    ///
    /// Non-coprime and unsupported bases end the trial before any circuit is
    /// built, so the backend is only called for bases the builder accepts.
    pub fn evaluate_base(&mut self, trial: usize, base: u64) -> Result<TrialRecord, ShorError> {
        self.observer.base_selected(trial, base);

        let gcd = base.gcd(&MODULUS);
        let record = if gcd != 1 {
            TrialRecord::new(trial, base, TrialOutcome::NonCoprime { gcd })
        } else if !is_allowed_base(base) {
            TrialRecord::new(trial, base, TrialOutcome::UnsupportedBase)
        } else {
            let reading = self.estimator.estimate(base, &mut self.backend)?;
            self.observer.measured(trial, &reading);
            post_process(trial, base, reading)?
        };

        self.observer.trial_finished(&record);
        Ok(record)
    }
}

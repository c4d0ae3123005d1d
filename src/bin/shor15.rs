//! Factors 15 once and prints the result.
//!
//! Usage: `shor15 [SEED] [MAX_TRIALS]`. `MAX_TRIALS = 0` retries forever.
//! Per-trial progress is logged at `info` level (`RUST_LOG` overrides).

use env_logger::Env;
use log::error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shor15::{ShorConfig, ShorController, ShorOutcome, Simulator};
use std::process::ExitCode;

fn parse_arg<T: std::str::FromStr>(value: Option<String>, name: &str) -> Result<Option<T>, String> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| format!("invalid {}: '{}'", name, raw)),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: Option<u64> = match parse_arg(args.next(), "seed") {
        Ok(seed) => seed,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };
    let mut config = ShorConfig::default();
    match parse_arg::<usize>(args.next(), "max trials") {
        Ok(Some(0)) => config.max_trials = None,
        Ok(Some(max)) => config.max_trials = Some(max),
        Ok(None) => {}
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    }

    let (simulator, mut rng) = match seed {
        Some(seed) => (Simulator::with_seed(seed), StdRng::seed_from_u64(seed.wrapping_add(1))),
        None => (Simulator::new(), StdRng::from_os_rng()),
    };

    let mut controller = ShorController::new(config, simulator);
    match controller.run(&mut rng) {
        Ok(ShorOutcome::Factored(report)) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Ok(ShorOutcome::Inconclusive { trials }) => {
            println!("No factor of 15 found after {} trials", trials);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("factoring failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

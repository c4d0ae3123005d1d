// src/shor/order.rs

//! Order recovery from a phase estimate by bounded continued fractions.

use crate::core::ShorError;
use num_rational::Ratio;

fn distance(a: Ratio<u64>, b: Ratio<u64>) -> Ratio<u64> {
    if a >= b { a - b } else { b - a }
}

/// Closest fraction to `value` with denominator at most `max_denominator`.
///
/// Walks the continued-fraction convergents of `value` until the next
/// denominator would exceed the bound, then picks between the last convergent
/// and the largest admissible semiconvergent. The convergent wins ties.
///
/// # Errors
/// `ShorError::InvalidOperation` when `max_denominator` is zero.
pub fn limit_denominator(value: Ratio<u64>, max_denominator: u64) -> Result<Ratio<u64>, ShorError> {
    if max_denominator == 0 {
        return Err(ShorError::InvalidOperation { message: "Denominator bound must be positive".to_string() });
    }
    if *value.denom() <= max_denominator {
        return Ok(value);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
    let (mut n, mut d) = (*value.numer(), *value.denom());
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_denominator {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_denominator - q0) / q1;
    let semiconvergent = Ratio::new(p0 + k * p1, q0 + k * q1);
    let convergent = Ratio::new(p1, q1);
    if distance(convergent, value) <= distance(semiconvergent, value) {
        Ok(convergent)
    } else {
        Ok(semiconvergent)
    }
}

/// Candidate order `r`: the denominator of `limit_denominator(phase, bound)`.
///
/// A zero phase gives `r = 1`, which never yields a factor.
pub fn find_order(phase: Ratio<u64>, bound: u64) -> Result<u64, ShorError> {
    Ok(*limit_denominator(phase, bound)?.denom())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u64, d: u64) -> Ratio<u64> {
        Ratio::new(n, d)
    }

    #[test]
    fn quarter_phase_gives_order_four() -> Result<(), ShorError> {
        assert_eq!(find_order(r(64, 256), 15)?, 4);
        assert_eq!(find_order(r(192, 256), 15)?, 4);
        assert_eq!(find_order(r(128, 256), 15)?, 2);
        Ok(())
    }

    #[test]
    fn zero_phase_gives_order_one() -> Result<(), ShorError> {
        assert_eq!(find_order(r(0, 256), 15)?, 1);
        Ok(())
    }

    #[test]
    fn exact_rationals_round_trip() -> Result<(), ShorError> {
        for d in 1..=15u64 {
            for k in 0..d {
                if num_integer::gcd(k, d) != 1 {
                    continue;
                }
                assert_eq!(find_order(r(k, d), 15)?, d, "{}/{}", k, d);
            }
        }
        Ok(())
    }

    #[test]
    fn known_convergents_of_pi() -> Result<(), ShorError> {
        let pi = r(31_415_926_535_897_932, 10_000_000_000_000_000);
        assert_eq!(limit_denominator(pi, 10)?, r(22, 7));
        assert_eq!(limit_denominator(pi, 100)?, r(311, 99));
        assert_eq!(limit_denominator(pi, 1000)?, r(355, 113));
        Ok(())
    }

    #[test]
    fn semiconvergent_loses_when_farther() -> Result<(), ShorError> {
        // 43/256 = [0; 5, 1, 20, 2]; 1/6 beats the semiconvergent 2/11
        assert_eq!(limit_denominator(r(43, 256), 15)?, r(1, 6));
        Ok(())
    }

    #[test]
    fn is_idempotent() -> Result<(), ShorError> {
        for value in 0..256u64 {
            let phase = r(value, 256);
            let once = limit_denominator(phase, 15)?;
            assert_eq!(limit_denominator(phase, 15)?, once);
            assert_eq!(limit_denominator(once, 15)?, once);
            assert!(*once.denom() <= 15);
        }
        Ok(())
    }

    #[test]
    fn zero_bound_is_rejected() {
        assert!(limit_denominator(r(1, 3), 0).is_err());
    }
}

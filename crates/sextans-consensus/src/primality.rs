//! Probabilistic primality testing.
//!
//! Candidates are screened by trial division against a table of small
//! primes, then put through Miller-Rabin rounds. Witnesses follow a fixed
//! schedule (the first primes 2, 3, 5, ...) so a given input always
//! produces the same verdict on every node; for true primes the outcome
//! is independent of the witness choice either way.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Upper bound of the trial-division table.
const TRIAL_DIVISION_BOUND: usize = 100_000;

/// Small primes used for trial division and as Miller-Rabin witnesses.
fn small_primes() -> &'static [u64] {
    static TABLE: OnceLock<Vec<u64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut composite = vec![false; TRIAL_DIVISION_BOUND];
        let mut primes = Vec::new();
        for i in 2..TRIAL_DIVISION_BOUND {
            if !composite[i] {
                primes.push(i as u64);
                let mut j = i * i;
                while j < TRIAL_DIVISION_BOUND {
                    composite[j] = true;
                    j += i;
                }
            }
        }
        primes
    })
}

/// Probabilistic primality test.
///
/// Returns true for every prime. Composites are rejected by trial
/// division (when `trial_division` is set) or, with overwhelming
/// probability, by `rounds` Miller-Rabin iterations.
pub fn is_probable_prime(n: &BigUint, rounds: u32, trial_division: bool) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if matches!(n.to_u64(), Some(2 | 3)) {
        return true;
    }
    if !n.bit(0) {
        return false;
    }

    if trial_division {
        let as_small = n.to_u64();
        for &p in small_primes() {
            if as_small == Some(p) {
                return true;
            }
            if (n % p).is_zero() {
                return false;
            }
        }
    }

    let n_minus_one = n - 1u32;
    for &witness in small_primes().iter().take(rounds as usize) {
        let base = BigUint::from(witness);
        if base >= n_minus_one {
            // n is small enough that the earlier witnesses already
            // covered it
            break;
        }
        if !passes_round(n, &n_minus_one, &base) {
            return false;
        }
    }
    true
}

/// One Miller-Rabin round of `n` against `base`.
fn passes_round(n: &BigUint, n_minus_one: &BigUint, base: &BigUint) -> bool {
    let s = n_minus_one.trailing_zeros().expect("n - 1 is nonzero");
    let d = n_minus_one >> s;

    let mut x = base.modpow(&d, n);
    if x.is_one() || x == *n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = &x * &x % n;
        if x == *n_minus_one {
            return true;
        }
    }
    false
}

//! Integer arithmetic used by the retarget calculation.

use num_bigint::BigUint;
use num_traits::Zero;

/// Integer floor of the `root`-th root of `n`.
///
/// The search doubles and halves a step starting from `lower_bound`,
/// which must be positive and no larger than the true root. Every probe
/// of the search is observable through the retarget result, so the
/// schedule must stay exactly as written; a faster-converging variant
/// would fork the chain.
pub fn nth_root(n: &BigUint, root: u32, lower_bound: &BigUint) -> BigUint {
    debug_assert!(
        !lower_bound.is_zero(),
        "nth_root requires a positive lower bound"
    );

    let mut result = lower_bound.clone();
    let mut delta = lower_bound / 2u32;

    while !delta.is_zero() {
        result += &delta;
        let mut aux = result.clone();
        for _ in 1..root {
            aux *= &result;
        }
        if aux > *n {
            result -= &delta;
            delta >>= 1u32;
        } else {
            delta <<= 1u32;
        }
    }
    result
}

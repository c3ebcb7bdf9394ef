//! Compact difficulty codec.
//!
//! Difficulties travel in block headers as 32-bit "compact" values: one
//! exponent byte followed by a 24-bit big-endian mantissa. The top
//! mantissa bit is a sign flag inherited from the OpenSSL bignum
//! encoding; consensus values are never negative, so it must be clear on
//! the wire. The encoding is canonical: the mantissa carries no leading
//! zero byte, and every implementation must produce identical bytes for
//! identical targets.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{ConsensusError, ConsensusResult};

/// Sign flag inside the 24-bit mantissa.
const SIGN_BIT: u32 = 0x0080_0000;

/// Magnitude portion of the mantissa.
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Decodes a compact value received from the outside, rejecting the sign
/// flag.
///
/// A zero mantissa decodes to zero regardless of the exponent.
pub fn decode_compact_bits(bits: u32) -> ConsensusResult<BigUint> {
    if bits & SIGN_BIT != 0 {
        return Err(ConsensusError::InvalidCompact { bits });
    }
    Ok(compact_to_target(bits))
}

/// Decodes the magnitude of a compact value.
///
/// Used on chain data that already passed boundary validation; the sign
/// flag, which never occurs in consensus values, is ignored.
pub fn compact_to_target(bits: u32) -> BigUint {
    let exponent = bits >> 24;
    let mantissa = bits & MANTISSA_MASK;
    if exponent <= 3 {
        BigUint::from(mantissa >> (8 * (3 - exponent)))
    } else {
        BigUint::from(mantissa) << (8 * (exponent - 3))
    }
}

/// Encodes a target canonically.
///
/// The smallest exponent is chosen such that the mantissa fits in 23
/// bits. Values above the largest representable target saturate to
/// `0xff7fffff`.
pub fn encode_compact_bits(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }
    if *target > BigUint::from(MANTISSA_MASK) << (8 * 252u32) {
        return 0xff7f_ffff;
    }

    let bytes = target.to_bytes_be();
    let mut size = bytes.len();
    let mut mantissa = if size <= 3 {
        let mut word = 0u32;
        for (i, &b) in bytes.iter().enumerate() {
            word |= u32::from(b) << (8 * (size - 1 - i));
        }
        word << (8 * (3 - size))
    } else {
        u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])
    };

    // The top mantissa bit is the sign flag; shift into the next exponent
    // to keep it clear.
    if mantissa & SIGN_BIT != 0 {
        mantissa >>= 8;
        size += 1;
    }

    (size as u32) << 24 | mantissa
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::params::{MIN_PRIME_BITS, MIN_PRIME_COMPACT};

    #[test]
    fn minimum_prime_size_pins() {
        assert_eq!(
            decode_compact_bits(MIN_PRIME_COMPACT).unwrap(),
            BigUint::from(MIN_PRIME_BITS)
        );
        assert_eq!(
            encode_compact_bits(&BigUint::from(MIN_PRIME_BITS)),
            MIN_PRIME_COMPACT
        );
    }

    #[test]
    fn bitcoin_era_pin() {
        let expected = BigUint::from(0x00ffffu32) << (8 * (0x1d - 3));
        assert_eq!(decode_compact_bits(0x1d00ffff).unwrap(), expected);
        assert_eq!(encode_compact_bits(&expected), 0x1d00ffff);
    }

    #[test]
    fn sign_flag_is_rejected() {
        for bits in [0x0180_0000u32, 0x0480_0001, 0xff80_0000] {
            assert_eq!(
                decode_compact_bits(bits),
                Err(ConsensusError::InvalidCompact { bits })
            );
        }
    }

    #[test]
    fn magnitude_decode_ignores_sign_flag() {
        assert_eq!(
            compact_to_target(0x0480_0001),
            BigUint::from(0x01u32) << 8
        );
    }

    #[test]
    fn zero_mantissa_decodes_to_zero() {
        assert!(decode_compact_bits(0x0300_0000).unwrap().is_zero());
        assert!(decode_compact_bits(0x2000_0000).unwrap().is_zero());
        assert_eq!(encode_compact_bits(&BigUint::zero()), 0);
    }

    #[test]
    fn small_exponents_shift_right() {
        // exponent 2: the low mantissa byte is dropped
        assert_eq!(decode_compact_bits(0x0201_3000).unwrap(), BigUint::from(0x0130u32));
        // exponent 0: the whole mantissa is below the point
        assert!(decode_compact_bits(0x0001_3000).unwrap().is_zero());
    }

    #[test]
    fn encoder_keeps_sign_flag_clear() {
        // 0x80 needs a padding byte so the mantissa top bit stays clear
        assert_eq!(encode_compact_bits(&BigUint::from(0x80u32)), 0x0200_8000);
        assert_eq!(encode_compact_bits(&BigUint::from(0x8000_0000u32)), 0x0500_8000);
        // round-trips back to the same magnitude
        assert_eq!(
            decode_compact_bits(0x0200_8000).unwrap(),
            BigUint::from(0x80u32)
        );
    }

    #[test]
    fn oversized_targets_saturate() {
        let max = BigUint::from(MANTISSA_MASK) << (8 * 252u32);
        assert_eq!(encode_compact_bits(&max), 0xff7f_ffff);
        assert_eq!(encode_compact_bits(&(max + 1u32)), 0xff7f_ffff);
        assert_eq!(encode_compact_bits(&(BigUint::from(1u32) << 2100)), 0xff7f_ffff);
    }

    #[test]
    fn canonical_compact_roundtrip() {
        for bits in [
            MIN_PRIME_COMPACT,
            0x1d00_ffff,
            0x0201_0900,
            0x0302_4057,
            0x1812_3456,
            0x0112_0000,
            0xff7f_ffff,
        ] {
            let target = decode_compact_bits(bits).unwrap();
            assert_eq!(encode_compact_bits(&target), bits, "bits 0x{bits:08x}");
        }
    }

    proptest! {
        #[test]
        fn value_roundtrip_loses_only_low_bits(v in any::<u128>()) {
            let value = BigUint::from(v);
            let bits = encode_compact_bits(&value);
            let decoded = decode_compact_bits(bits).unwrap();

            // re-encoding is stable
            prop_assert_eq!(encode_compact_bits(&decoded), bits);
            // decoding only drops bits below the 23-bit mantissa
            prop_assert!(decoded <= value);
            let exponent = bits >> 24;
            let ulp = if exponent > 3 {
                BigUint::from(1u32) << (8 * (exponent - 3))
            } else {
                BigUint::from(1u32)
            };
            prop_assert!(&value - &decoded < ulp);
        }

        #[test]
        fn small_values_roundtrip_exactly(v in 0u32..0x0080_0000) {
            let value = BigUint::from(v);
            let decoded = decode_compact_bits(encode_compact_bits(&value)).unwrap();
            prop_assert_eq!(decoded, value);
        }
    }
}

//! Error types for consensus validation.

use num_bigint::BigUint;
use thiserror::Error;

/// Consensus validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Candidate offset does not fit in the trailing zero bits of the
    /// target.
    #[error("candidate offset {offset} exceeds limit 2^{limit_bits}")]
    OffsetTooLarge {
        /// The offending offset.
        offset: BigUint,
        /// Log2 of the first offset value that is out of range.
        limit_bits: u32,
    },

    /// Candidate falls outside the admissible residue class modulo 210.
    #[error("candidate is {residue} mod 210, expected 97")]
    WrongResidue {
        /// The candidate's residue modulo 210.
        residue: u32,
    },

    /// A constellation member failed the primality test.
    #[error("constellation member at offset {pos} is not prime")]
    NotPrime {
        /// Offset of the failing member within the constellation.
        pos: u32,
    },

    /// Malformed compact difficulty encoding.
    #[error("invalid compact difficulty 0x{bits:08x}")]
    InvalidCompact {
        /// The rejected encoding.
        bits: u32,
    },
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;

//! # sextans-consensus
//!
//! Consensus rules for the Sextans blockchain.
//!
//! This crate provides:
//! - Prime-constellation Proof-of-Work verification
//! - Difficulty retargeting with the superblock schedule
//! - The compact (nBits) difficulty codec
//!
//! ## Prime-constellation PoW
//!
//! A block header commits to a 256-bit hash, a compact difficulty and a
//! 256-bit offset. Together they select a large integer `n`: a leading one
//! bit, eight zero bits, the 256 hash bits, trailing zero bits up to the
//! target size, and the offset filling the trailing bits. The block is
//! valid when `n`, `n+4`, `n+6`, `n+10`, `n+12` and `n+16` are all prime
//! (a prime sextuplet). Unlike hash-inversion chains, the compact
//! difficulty encodes the required *bit length* of the candidate, not a
//! hash ceiling.
//!
//! ## Difficulty adjustment
//!
//! The target size is recalculated once per retarget interval by scaling
//! the reported block work with the measured window timespan and taking
//! the ninth root. A weekly superblock carries a sharply higher
//! difficulty; the retargets on either side of a superblock window
//! compensate for the extra work it injects.

mod arith;
pub mod block;
mod chain_params;
mod compact;
mod error;
mod pow;
mod primality;

#[cfg(test)]
mod pow_test_vectors;

pub use arith::nth_root;
pub use block::{BlockHash, BlockIndex};
pub use chain_params::ChainParams;
pub use compact::{compact_to_target, decode_compact_bits, encode_compact_bits};
pub use error::{ConsensusError, ConsensusResult};
pub use pow::{check_proof_of_work, compute_min_work, generate_prime_base, next_work_required};
pub use primality::is_probable_prime;

/// Sextans network constants.
pub mod params {
    use crate::block::BlockHash;

    /// Minimum candidate size in bits.
    pub const MIN_PRIME_BITS: u32 = 304;

    /// Compact encoding of [`MIN_PRIME_BITS`].
    pub const MIN_PRIME_COMPACT: u32 = 0x0201_3000;

    /// Number of primes a candidate must chain together.
    pub const CONSTELLATION_SIZE: u32 = 6;

    /// Offsets of the constellation members from the base candidate.
    pub const CONSTELLATION_OFFSETS: [u32; 6] = [0, 4, 6, 10, 12, 16];

    /// Zero bits between the leading one bit and the header hash in a
    /// candidate.
    pub const ZEROES_BEFORE_HASH: u32 = 8;

    /// Exponent relating block work to the candidate size, used when
    /// retargeting.
    pub const ROOT_EXPONENT: u32 = 3 + CONSTELLATION_SIZE;

    /// Historical block accepted before candidate validation took its
    /// current form; it stays valid as-is.
    pub const GRANDFATHER_BLOCK_HASH: BlockHash = BlockHash([
        0x26, 0xd0, 0x46, 0x6d, 0x5a, 0x0e, 0xab, 0x0e, 0xbf, 0x17, 0x1e, 0xac, 0xb9, 0x81, 0x46,
        0xb2, 0x61, 0x43, 0xd1, 0x43, 0x46, 0x35, 0x14, 0xf2, 0x6b, 0x28, 0xd3, 0xcd, 0xed, 0x81,
        0xc1, 0xbb,
    ]);
}

//! Read-only block index views supplied by the chain environment.
//!
//! The consensus core never owns or mutates chain data. Callers hand it
//! slices of [`BlockIndex`] entries, ordered oldest first with the tip
//! last, reaching at most one retarget interval behind the tip.

use std::fmt;

use num_bigint::BigUint;

/// A 256-bit block header hash, stored in big-endian (display) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    /// Parses a hash from 64 hex characters in display order.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(BlockHash(bytes))
    }

    /// The hash as an unsigned integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

/// Per-block data the consensus core reads from the chain index.
#[derive(Debug, Clone)]
pub struct BlockIndex {
    /// Block height.
    pub height: u32,
    /// Compact difficulty target of the block.
    pub bits: u32,
    /// Block timestamp in seconds.
    pub time: i64,
    /// The block's contribution to cumulative chain work.
    pub work: BigUint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_hex_roundtrip() {
        let hex = "26d0466d5a0eab0ebf171eacb98146b26143d143463514f26b28d3cded81c1bb";
        let hash = BlockHash::from_hex(hex).unwrap();
        assert_eq!(hash.to_string(), hex);
        assert_eq!(hash.0[0], 0x26);
        assert_eq!(hash.0[31], 0xbb);
    }

    #[test]
    fn hash_from_hex_rejects_bad_input() {
        assert!(BlockHash::from_hex("26d0").is_err());
        assert!(BlockHash::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn hash_to_biguint_is_big_endian() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x2a;
        assert_eq!(BlockHash(bytes).to_biguint(), BigUint::from(0x2au32));

        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        assert_eq!(BlockHash(bytes).to_biguint(), BigUint::from(1u32) << 248);
    }
}

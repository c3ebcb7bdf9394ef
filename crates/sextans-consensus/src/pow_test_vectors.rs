//! Candidate vectors for proof-of-work tests.
//!
//! Header hashes crafted so the derived candidate lands on known prime
//! chains just above 2^264: one genuine prime sextuplet and, for each
//! constellation offset, a chain whose first composite member sits
//! exactly there. All candidates are in the admissible residue class
//! modulo 210 and none of their members has a factor below the trial
//! division bound, so every rejection exercises the Miller-Rabin path.

/// Compact difficulty decoding to the fixed significant size of a
/// candidate (265 bits); it leaves no trailing bits for an offset.
pub const EXACT_SIZE_BITS: u32 = 0x0201_0900;

/// Header hash whose candidate starts a genuine prime sextuplet.
pub const SEXTUPLET_HASH: &str =
    "f823665d56000000000000000000000000000000000000000000000000000000";

/// Decimal value of the candidate [`SEXTUPLET_HASH`] resolves to.
pub const SEXTUPLET_BASE: &str =
    "29642774844752946028434172162224104410437116074403984394101141506026219581654047";

/// Header hash landing one above the sextuplet; the candidate is 98
/// modulo 210.
pub const WRONG_RESIDUE_HASH: &str =
    "0423665d56000000000000000000000000000000000000000000000000000000";

/// Header hashes whose candidate prime chain breaks first at the paired
/// constellation offset.
pub const BREAKING_HASHES: [(u32, &str); 6] = [
    (0, "9042600000000000000000000000000000000000000000000000000000000000"),
    (4, "889b3d2000000000000000000000000000000000000000000000000000000000"),
    (6, "dcda910200000000000000000000000000000000000000000000000000000000"),
    (10, "c819fbad80000000000000000000000000000000000000000000000000000000"),
    (12, "b47572f6c0000000000000000000000000000000000000000000000000000000"),
    (16, "de6ab42630000000000000000000000000000000000000000000000000000000"),
];

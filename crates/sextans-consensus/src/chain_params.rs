//! Chain parameters for the Sextans networks.

/// Consensus parameters that vary per network.
///
/// Network-wide constants that no deployment may change live in
/// [`crate::params`] instead.
#[derive(Debug, Clone)]
pub struct ChainParams {
    /// Expected number of seconds between blocks.
    pub pow_target_spacing: i64,
    /// Length of a retarget window in seconds.
    pub pow_target_timespan: i64,
    /// Whether a stalled chain may fall back to minimum-difficulty blocks.
    pub allow_min_difficulty_blocks: bool,
    /// Height at which the superblock schedule activates.
    pub fork1_height: u32,
    /// Number of blocks between superblocks.
    pub superblock_interval: u32,
}

impl ChainParams {
    /// The mainnet parameters.
    pub fn mainnet() -> Self {
        Self {
            pow_target_spacing: 150,            // 2.5 minutes
            pow_target_timespan: 36 * 60 * 60,  // 1.5 days
            allow_min_difficulty_blocks: false,
            fork1_height: 157_248,
            superblock_interval: 4032, // one week of blocks
        }
    }

    /// The testnet parameters.
    pub fn testnet() -> Self {
        Self {
            pow_target_spacing: 150,
            pow_target_timespan: 36 * 60 * 60,
            allow_min_difficulty_blocks: true,
            fork1_height: 4032,
            superblock_interval: 4032,
        }
    }

    /// Number of blocks between difficulty adjustments.
    pub fn retarget_interval(&self) -> u32 {
        let interval = self.pow_target_timespan / self.pow_target_spacing;
        debug_assert!(interval >= 2, "retarget interval must span several blocks");
        interval as u32
    }

    /// Whether the superblock schedule is active at `height`.
    pub fn is_after_fork1(&self, height: u32) -> bool {
        height >= self.fork1_height
    }

    /// Whether `height` is a superblock.
    pub fn is_superblock(&self, height: u32) -> bool {
        height % self.superblock_interval == 0 && self.is_after_fork1(height)
    }

    /// Whether the retarget window containing `height` includes a
    /// superblock.
    ///
    /// Windows are aligned to retarget boundaries. The retarget starting a
    /// window that holds a superblock eases the regular blocks in it, and
    /// the following retarget undoes the adjustment; both query this
    /// predicate.
    pub fn is_in_superblock_window(&self, height: u32) -> bool {
        let interval = self.retarget_interval();
        let window_start = height - height % interval;
        let rem = window_start % self.superblock_interval;
        let superblock = if rem == 0 {
            window_start
        } else {
            window_start + (self.superblock_interval - rem)
        };
        superblock < window_start + interval && self.is_after_fork1(superblock)
    }
}

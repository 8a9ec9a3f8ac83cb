use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block coordinates in a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPos { x, y, z }
    }

    /// Component-wise minimum of two positions.
    ///
    /// Unlike [`Ord::min`], which picks one of the two positions, this mixes
    /// their coordinates.
    pub fn component_min(self, other: BlockPos) -> Self {
        BlockPos::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum of two positions.
    pub fn component_max(self, other: BlockPos) -> Self {
        BlockPos::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

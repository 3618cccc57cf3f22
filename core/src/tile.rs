use serde::{Deserialize, Serialize};

/// Number of distinct visible cell values: counts 0 through 8 plus covered.
pub const VISIBLE_STATES: usize = 10;

/// Legacy integer used for a covered cell in flat grids and observation planes.
pub const COVERED_VALUE: u8 = 9;

/// Ground truth for one cell, known only to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrueCell {
    Mine,
    Count(u8),
}

impl TrueCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for TrueCell {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleCell {
    Covered,
    Revealed(u8),
}

impl VisibleCell {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered)
    }

    /// Value in the legacy flat encoding, also the observation plane of the cell.
    pub const fn value(self) -> u8 {
        match self {
            Self::Covered => COVERED_VALUE,
            Self::Revealed(count) => count,
        }
    }
}

impl Default for VisibleCell {
    fn default() -> Self {
        Self::Covered
    }
}

use std::collections::BTreeSet;

use crate::*;
pub use random::*;

mod random;

/// Places mines for a board whose first click lands on `start`.
pub trait MineGenerator {
    fn generate(self, config: GameConfig, start: Coord2) -> Result<MineLayout>;
}

/// The start cell and its neighbours, none of which may hold a mine.
pub fn forbidden_zone(start: Coord2, size: Coord) -> BTreeSet<CellIndex> {
    core::iter::once(start)
        .chain(NeighborIter::square(start, size))
        .map(|coords| coords_to_index(coords, size))
        .collect()
}

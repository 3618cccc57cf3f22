use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbour batch handed to a flood-fill ordering hook.
pub type NeighborBatch = SmallVec<[CellIndex; 8]>;

/// Complete ground truth of a generated board: per-cell adjacency counts plus the mine and safe
/// partitions. Fixed once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrueBoard {
    grid: Array2<TrueCell>,
    mines: BTreeSet<CellIndex>,
    safe: BTreeSet<CellIndex>,
}

impl TrueBoard {
    /// Counting pass over a placed layout.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let size = layout.size();
        let mut grid: Array2<TrueCell> = Array2::default((size, size).to_nd_index());
        let mut mines = BTreeSet::new();
        let mut safe = BTreeSet::new();

        for index in 0..layout.total_cells() {
            let coords = index_to_coords(index, size);
            if layout.contains_mine(coords) {
                grid[coords.to_nd_index()] = TrueCell::Mine;
                mines.insert(index);
            } else {
                grid[coords.to_nd_index()] = TrueCell::Count(layout.adjacent_mine_count(coords));
                safe.insert(index);
            }
        }

        Self { grid, mines, safe }
    }

    pub fn size(&self) -> Coord {
        self.grid.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn grid(&self) -> &Array2<TrueCell> {
        &self.grid
    }

    pub fn cell(&self, index: CellIndex) -> TrueCell {
        self.grid[index_to_coords(index, self.size()).to_nd_index()]
    }

    pub fn mines(&self) -> &BTreeSet<CellIndex> {
        &self.mines
    }

    pub fn safe(&self) -> &BTreeSet<CellIndex> {
        &self.safe
    }

    pub fn is_mine(&self, index: CellIndex) -> bool {
        self.mines.contains(&index)
    }

    /// Cells opened by revealing the safe cell `start`.
    ///
    /// Zero cells spread to all of their neighbours, numbered cells are opened but stop the
    /// spread. A mine at `start` opens nothing.
    pub fn flood_region(&self, start: CellIndex) -> BTreeSet<CellIndex> {
        self.flood_region_with(start, |_| {})
    }

    /// Same as [`Self::flood_region`], with `order` allowed to permute every batch of neighbours
    /// before it is pushed onto the work-list. The resulting set does not depend on the order.
    pub fn flood_region_with<F>(&self, start: CellIndex, mut order: F) -> BTreeSet<CellIndex>
    where
        F: FnMut(&mut NeighborBatch),
    {
        let size = self.size();
        let mut opened = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut to_visit = vec![start];

        while let Some(index) = to_visit.pop() {
            if !visited.insert(index) {
                continue;
            }

            match self.cell(index) {
                TrueCell::Mine => continue,
                TrueCell::Count(0) => {
                    opened.insert(index);
                    let mut neighbors: NeighborBatch =
                        NeighborIter::square(index_to_coords(index, size), size)
                            .map(|coords| coords_to_index(coords, size))
                            .filter(|neighbor| !visited.contains(neighbor))
                            .collect();
                    order(&mut neighbors);
                    to_visit.extend(neighbors);
                }
                TrueCell::Count(_) => {
                    opened.insert(index);
                }
            }
        }

        opened
    }
}

use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// One-hot encoding of the visible board as `[10, N, N]` binary planes.
///
/// Plane `k` for `k` in `0..=8` marks cells revealed with count `k`, plane 9 marks covered cells.
/// Every cell is set in exactly one plane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    planes: Array3<u8>,
}

impl Observation {
    /// Observation of a board where nothing has been revealed yet.
    pub fn covered(size: Coord) -> Self {
        let size = usize::from(size);
        let mut planes = Array3::zeros((VISIBLE_STATES, size, size));
        planes
            .index_axis_mut(Axis(0), usize::from(COVERED_VALUE))
            .fill(1);
        Self { planes }
    }

    pub fn from_engine(engine: &BoardEngine) -> Self {
        Self::from_visible(engine.visible_snapshot())
    }

    pub fn from_visible(visible: &Array2<VisibleCell>) -> Self {
        let (rows, cols) = visible.dim();
        let mut planes = Array3::zeros((VISIBLE_STATES, rows, cols));
        for ((row, col), cell) in visible.indexed_iter() {
            planes[[usize::from(cell.value()), row, col]] = 1;
        }
        Self { planes }
    }

    pub fn planes(&self) -> &Array3<u8> {
        &self.planes
    }

    pub fn into_planes(self) -> Array3<u8> {
        self.planes
    }

    pub fn shape(&self) -> [usize; 3] {
        let (planes, rows, cols) = self.planes.dim();
        [planes, rows, cols]
    }

    /// Plane set for the cell at `coords`, `None` when out of bounds or not one-hot.
    pub fn plane_of(&self, (row, col): Coord2) -> Option<usize> {
        let (row, col) = (usize::from(row), usize::from(col));
        let (_, rows, cols) = self.planes.dim();
        if row >= rows || col >= cols {
            return None;
        }

        let lane = self.planes.slice(ndarray::s![.., row, col]);
        let mut set = lane.indexed_iter().filter(|&(_, &bit)| bit == 1);
        match (set.next(), set.next()) {
            (Some((plane, _)), None) => Some(plane),
            _ => None,
        }
    }

    /// Whether every cell is set in exactly one plane with only 0/1 entries.
    pub fn is_one_hot(&self) -> bool {
        self.planes.iter().all(|&bit| bit <= 1)
            && self
                .planes
                .sum_axis(Axis(0))
                .iter()
                .all(|&total| total == 1)
    }

    /// Flattened `f32` copy in plane-major order, ready to feed a network.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.planes.iter().map(|&bit| f32::from(bit)).collect()
    }
}

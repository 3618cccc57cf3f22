use core::ops::Index;
use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use env::*;
pub use error::*;
pub use generator::*;
pub use play::*;
pub use render::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod env;
mod error;
mod generator;
mod play;
mod render;
mod tile;
mod types;

/// Largest forbidden zone around a first click: the cell and its 8 neighbours.
const MAX_FORBIDDEN_ZONE: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates an `N x N` board with `M` mines.
    ///
    /// The mine bound leaves room for the largest forbidden zone the board can produce, so
    /// any first click is guaranteed to find enough eligible cells.
    pub fn new(size: usize, mines: usize) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let size: Coord = size
            .try_into()
            .map_err(|_| ConfigError::BoardTooLarge(size))?;
        if mines == 0 {
            return Err(ConfigError::NoMines.into());
        }

        let available = Self::max_mines(size);
        match CellCount::try_from(mines) {
            Ok(mines) if mines <= available => Ok(Self::new_unchecked(size, mines)),
            _ => Err(ConfigError::TooManyMines {
                requested: mines.try_into().unwrap_or(CellCount::MAX),
                available,
            }
            .into()),
        }
    }

    /// Most mines a `size x size` board accepts.
    pub const fn max_mines(size: Coord) -> CellCount {
        let total = mult(size, size);
        if total > MAX_FORBIDDEN_ZONE {
            total - MAX_FORBIDDEN_ZONE
        } else {
            0
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn validate_index(&self, index: usize) -> Result<CellIndex> {
        let total = self.total_cells();
        match CellIndex::try_from(index) {
            Ok(cell) if cell < total => Ok(cell),
            _ => Err(UsageError::CellOutOfRange { index, total }.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a square mask of at most [`Coord::MAX`] cells per side.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows != cols {
            return Err(ConfigError::NonSquareBoard { rows, cols }.into());
        }
        if rows == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        if Coord::try_from(rows).is_err() {
            return Err(ConfigError::BoardTooLarge(rows).into());
        }

        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                return Err(UsageError::CellOutOfRange {
                    index: usize::from(coords.0) * usize::from(size) + usize::from(coords.1),
                    total: mult(size, size),
                }
                .into());
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    pub fn mine_indices(&self) -> BTreeSet<CellIndex> {
        let size = self.size();
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| coords_to_index((row as Coord, col as Coord), size))
            .collect()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Classification of a reveal; every variant is a normal gameplay result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    AlreadyRevealed,
    HitMine,
    Revealed(BTreeSet<CellIndex>),
    Win(BTreeSet<CellIndex>),
    GameOver,
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        use RevealOutcome::*;
        match self {
            AlreadyRevealed | GameOver => false,
            HitMine | Revealed(_) | Win(_) => true,
        }
    }

    /// Whether this reveal moved the game into a finished state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::HitMine | Self::Win(_))
    }

    pub fn newly_revealed(&self) -> Option<&BTreeSet<CellIndex>> {
        match self {
            Self::Revealed(cells) | Self::Win(cells) => Some(cells),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_and_oversized_boards() {
        assert_eq!(
            GameConfig::new(0, 1),
            Err(GameError::Config(ConfigError::EmptyBoard))
        );
        assert_eq!(
            GameConfig::new(256, 1),
            Err(GameError::Config(ConfigError::BoardTooLarge(256)))
        );
    }

    #[test]
    fn layout_rejects_malformed_masks() {
        assert_eq!(
            MineLayout::from_mine_mask(Array2::default((5, 2))),
            Err(GameError::Config(ConfigError::NonSquareBoard { rows: 5, cols: 2 }))
        );
        assert_eq!(
            MineLayout::from_mine_mask(Array2::default((2, 5))),
            Err(GameError::Config(ConfigError::NonSquareBoard { rows: 2, cols: 5 }))
        );
        assert_eq!(
            MineLayout::from_mine_mask(Array2::default((0, 0))),
            Err(GameError::Config(ConfigError::EmptyBoard))
        );
        assert_eq!(
            MineLayout::from_mine_mask(Array2::default((256, 256))),
            Err(GameError::Config(ConfigError::BoardTooLarge(256)))
        );
    }

    #[test]
    fn layout_accepts_square_mask() {
        let mut mask: Array2<bool> = Array2::default((3, 3));
        mask[(1, 2)] = true;

        let layout = MineLayout::from_mine_mask(mask).unwrap();

        assert_eq!(layout.game_config(), GameConfig::new_unchecked(3, 1));
        assert!(layout.contains_mine((1, 2)));
        assert_eq!(layout.adjacent_mine_count((0, 1)), 1);
    }

    #[test]
    fn config_rejects_zero_mines() {
        assert_eq!(
            GameConfig::new(5, 0),
            Err(GameError::Config(ConfigError::NoMines))
        );
    }

    #[test]
    fn config_mine_bound_leaves_room_for_first_click() {
        assert_eq!(GameConfig::max_mines(5), 16);
        assert!(GameConfig::new(5, 16).is_ok());
        assert_eq!(
            GameConfig::new(5, 17),
            Err(GameError::Config(ConfigError::TooManyMines {
                requested: 17,
                available: 16,
            }))
        );
        assert!(GameConfig::new(3, 1).is_err());
        assert!(GameConfig::new(4, 7).is_ok());
    }

    #[test]
    fn validate_index_checks_range() {
        let config = GameConfig::new(4, 1).unwrap();
        assert_eq!(config.validate_index(15), Ok(15));
        assert_eq!(
            config.validate_index(16),
            Err(GameError::Usage(UsageError::CellOutOfRange {
                index: 16,
                total: 16,
            }))
        );
        assert!(config.validate_index(usize::MAX).is_err());
    }

    #[test]
    fn layout_counts_adjacent_mines() {
        let layout = MineLayout::from_mine_coords(3, &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((0, 2)), 0);
        assert_eq!(layout.mine_indices(), BTreeSet::from([0, 8]));
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert!(MineLayout::from_mine_coords(3, &[(3, 0)]).is_err());
    }
}

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Generation strategy that keeps the first click and its neighbourhood free of mines, but other
/// than that is purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig, start: Coord2) -> Result<MineLayout> {
        let size = config.size;
        if start.0 >= size || start.1 >= size {
            return Err(UsageError::CellOutOfRange {
                index: usize::from(start.0) * usize::from(size) + usize::from(start.1),
                total: config.total_cells(),
            }
            .into());
        }

        let forbidden = forbidden_zone(start, size);
        let eligible: Vec<CellIndex> = (0..config.total_cells())
            .filter(|cell| !forbidden.contains(cell))
            .collect();

        if usize::from(config.mines) > eligible.len() {
            return Err(ConfigError::TooManyMines {
                requested: config.mines,
                available: eligible.len().try_into().unwrap_or(CellCount::MAX),
            }
            .into());
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default((size, size).to_nd_index());
        for pick in index::sample(&mut rng, eligible.len(), config.mines.into()) {
            let coords = index_to_coords(eligible[pick], size);
            mines[coords.to_nd_index()] = true;
        }

        log::debug!(
            "placed {} mines on a {size}x{size} board, first click at {start:?}",
            config.mines
        );
        MineLayout::from_mine_mask(mines)
    }
}

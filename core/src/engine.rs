use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Uninitialized,
    InPlay,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_uninitialized(self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Authoritative rules engine for one game.
///
/// Mines are placed lazily by the first reveal so that the first click is always safe. The seed
/// is the only random state, since generation consumes it exactly once; serializing the engine
/// therefore captures everything needed to resume a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    config: GameConfig,
    seed: u64,
    board: Option<TrueBoard>,
    visible: Array2<VisibleCell>,
    revealed: BTreeSet<CellIndex>,
    state: EngineState,
    triggered_mine: Option<CellIndex>,
}

impl BoardEngine {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            board: None,
            visible: Array2::default((config.size, config.size).to_nd_index()),
            revealed: BTreeSet::new(),
            state: EngineState::Uninitialized,
            triggered_mine: None,
        }
    }

    /// Validates `size` and `mines` before building an uninitialized engine.
    pub fn try_new(size: usize, mines: usize, seed: u64) -> Result<Self> {
        Ok(Self::new(GameConfig::new(size, mines)?, seed))
    }

    /// Engine over an already placed layout, skipping the first-click generation.
    pub fn from_layout(layout: MineLayout) -> Self {
        let config = layout.game_config();
        let mut engine = Self::new(config, 0);
        engine.board = Some(TrueBoard::from_layout(&layout));
        engine.state = EngineState::InPlay;
        engine
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, EngineState::Lost)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn revealed_cells(&self) -> &BTreeSet<CellIndex> {
        &self.revealed
    }

    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn visible_cell(&self, index: CellIndex) -> VisibleCell {
        self.visible[index_to_coords(index, self.config.size).to_nd_index()]
    }

    pub fn visible_snapshot(&self) -> &Array2<VisibleCell> {
        &self.visible
    }

    /// Visible grid in the flat integer form used by front ends: 0-8 revealed, 9 covered.
    pub fn visible_grid_values(&self) -> Array2<u8> {
        self.visible.mapv(VisibleCell::value)
    }

    /// The full board, only exposed once the game has ended.
    pub fn true_snapshot(&self) -> Result<&Array2<TrueCell>> {
        match &self.board {
            Some(board) if self.state.is_finished() => Ok(board.grid()),
            _ => Err(UsageError::GameInProgress.into()),
        }
    }

    pub(crate) fn true_board(&self) -> Option<&TrueBoard> {
        self.board.as_ref()
    }

    /// Places the mines around the first click at `start`.
    pub fn initialize(&mut self, start: usize) -> Result<()> {
        let start = self.config.validate_index(start)?;
        if !self.state.is_uninitialized() {
            return Err(UsageError::AlreadyInitialized.into());
        }

        self.board = Some(self.place_mines(start)?);
        self.state = EngineState::InPlay;
        Ok(())
    }

    pub fn reveal(&mut self, cell: usize) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let cell = self.config.validate_index(cell)?;
        if self.state.is_finished() {
            return Ok(GameOver);
        }

        let size = self.config.size;
        let board = match &self.board {
            Some(board) => board,
            None => {
                let board = self.place_mines(cell)?;
                self.state = EngineState::InPlay;
                &*self.board.insert(board)
            }
        };

        if self.revealed.contains(&cell) {
            return Ok(AlreadyRevealed);
        }

        if board.is_mine(cell) {
            log::debug!("mine hit at {:?}", index_to_coords(cell, size));
            self.triggered_mine = Some(cell);
            self.state = EngineState::Lost;
            return Ok(HitMine);
        }

        let mut opened = BTreeSet::new();
        for index in board.flood_region(cell) {
            if !self.revealed.insert(index) {
                continue;
            }
            if let TrueCell::Count(count) = board.cell(index) {
                self.visible[index_to_coords(index, size).to_nd_index()] =
                    VisibleCell::Revealed(count);
            }
            opened.insert(index);
        }

        if self.revealed == *board.safe() {
            log::debug!("all {} safe cells revealed", self.revealed.len());
            self.state = EngineState::Won;
            Ok(Win(opened))
        } else {
            Ok(Revealed(opened))
        }
    }

    pub fn reveal_at(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let size = self.config.size;
        if coords.0 >= size || coords.1 >= size {
            return Err(UsageError::CellOutOfRange {
                index: usize::from(coords.0) * usize::from(size) + usize::from(coords.1),
                total: self.config.total_cells(),
            }
            .into());
        }
        self.reveal(coords_to_index(coords, size).into())
    }

    fn place_mines(&self, start: CellIndex) -> Result<TrueBoard> {
        let start = index_to_coords(start, self.config.size);
        let layout = RandomMineGenerator::new(self.seed).generate(self.config, start)?;
        Ok(TrueBoard::from_layout(&layout))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn layout(size: Coord, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    fn assert_visible_matches_truth(engine: &BoardEngine) {
        let board = engine.true_board().unwrap();
        for index in 0..engine.config().total_cells() {
            let expected = if engine.revealed_cells().contains(&index) {
                match board.cell(index) {
                    TrueCell::Count(count) => VisibleCell::Revealed(count),
                    TrueCell::Mine => panic!("mine {index} was revealed"),
                }
            } else {
                VisibleCell::Covered
            };
            assert_eq!(engine.visible_cell(index), expected);
        }
    }

    #[test]
    fn first_reveal_places_mines_outside_start_zone() {
        for seed in 0..100 {
            let mut engine = BoardEngine::try_new(4, 1, seed).unwrap();
            assert_eq!(engine.state(), EngineState::Uninitialized);

            let outcome = engine.reveal(0).unwrap();

            assert_ne!(outcome, RevealOutcome::HitMine);
            let mines = engine.true_board().unwrap().mines();
            assert_eq!(mines.len(), 1);
            assert!(mines.iter().all(|cell| (2..16).contains(cell) && ![4, 5].contains(cell)));
        }
    }

    #[test]
    fn max_mines_still_generates_from_any_start() {
        for start in [0, 2, 12] {
            let mut engine = BoardEngine::try_new(5, 16, 9).unwrap();
            let outcome = engine.reveal(start).unwrap();

            assert!(outcome.has_update());
            assert_eq!(engine.true_board().unwrap().mines().len(), 16);
        }
    }

    #[test]
    fn initialize_runs_once() {
        let mut engine = BoardEngine::try_new(6, 5, 3).unwrap();

        engine.initialize(14).unwrap();

        assert_eq!(engine.state(), EngineState::InPlay);
        assert!(engine.revealed_cells().is_empty());
        assert_eq!(
            engine.initialize(14),
            Err(GameError::Usage(UsageError::AlreadyInitialized))
        );
    }

    #[test]
    fn hitting_mine_keeps_revealed_cells() {
        let mut engine = BoardEngine::from_layout(layout(3, &[(0, 0), (0, 2)]));

        assert!(matches!(engine.reveal(8).unwrap(), RevealOutcome::Revealed(_)));
        let before = engine.revealed_cells().clone();
        let outcome = engine.reveal(0).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_mine(), Some(0));
        assert_eq!(engine.revealed_cells(), &before);
    }

    #[test]
    fn finished_game_reports_game_over() {
        let mut engine = BoardEngine::from_layout(layout(3, &[(0, 0)]));
        engine.reveal(0).unwrap();
        let snapshot = engine.clone();

        assert_eq!(engine.reveal(8).unwrap(), RevealOutcome::GameOver);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn repeated_reveal_is_a_no_op() {
        let mut engine = BoardEngine::from_layout(layout(4, &[(0, 0), (3, 3)]));
        engine.reveal(1).unwrap();
        let snapshot = engine.clone();

        for _ in 0..3 {
            assert_eq!(engine.reveal(1).unwrap(), RevealOutcome::AlreadyRevealed);
        }
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn flood_fill_wins_in_one_click() {
        let mut engine = BoardEngine::from_layout(layout(3, &[(2, 2)]));

        let outcome = engine.reveal_at((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Win(BTreeSet::from([0, 1, 2, 3, 4, 5, 6, 7])));
        assert!(engine.is_won());
        assert_eq!(engine.visible_cell(0), VisibleCell::Revealed(0));
        assert_eq!(engine.visible_cell(4), VisibleCell::Revealed(1));
        assert_eq!(engine.visible_cell(8), VisibleCell::Covered);
    }

    #[test]
    fn surrounded_cell_reveals_alone() {
        let mines = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)];
        let mut engine = BoardEngine::from_layout(layout(4, &mines));

        let outcome = engine.reveal_at((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(BTreeSet::from([5])));
        assert_eq!(engine.visible_cell(5), VisibleCell::Revealed(8));
    }

    #[test]
    fn win_only_on_last_safe_cell() {
        let mut engine = BoardEngine::from_layout(layout(2, &[(0, 0), (1, 1)]));

        assert_eq!(engine.reveal(1).unwrap(), RevealOutcome::Revealed(BTreeSet::from([1])));
        assert!(!engine.is_won());
        assert_eq!(engine.reveal(2).unwrap(), RevealOutcome::Win(BTreeSet::from([2])));
        assert_eq!(engine.revealed_cells(), engine.true_board().unwrap().safe());
    }

    #[test]
    fn out_of_range_cell_is_a_usage_error() {
        let mut engine = BoardEngine::try_new(4, 2, 0).unwrap();

        assert_eq!(
            engine.reveal(16),
            Err(GameError::Usage(UsageError::CellOutOfRange {
                index: 16,
                total: 16,
            }))
        );
        assert!(engine.reveal_at((0, 4)).is_err());
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn true_snapshot_hidden_until_finished() {
        let mut engine = BoardEngine::from_layout(layout(3, &[(1, 1)]));

        assert_eq!(
            engine.true_snapshot(),
            Err(GameError::Usage(UsageError::GameInProgress))
        );
        engine.reveal(4).unwrap();

        let grid = engine.true_snapshot().unwrap();
        assert_eq!(grid[[1, 1]], TrueCell::Mine);
        assert_eq!(grid[[0, 0]], TrueCell::Count(1));
    }

    #[test]
    fn random_play_keeps_visible_grid_consistent() {
        let mut rng = SmallRng::seed_from_u64(11);
        for seed in 0..30 {
            let mut engine = BoardEngine::try_new(9, 10, seed).unwrap();
            while !engine.is_finished() {
                let outcome = engine.reveal(rng.random_range(0..81)).unwrap();
                assert_visible_matches_truth(&engine);
                let board = engine.true_board().unwrap();
                assert!(engine.revealed_cells().is_subset(board.safe()));
                assert_eq!(
                    matches!(outcome, RevealOutcome::Win(_)),
                    engine.revealed_cells() == board.safe()
                );
            }
        }
    }

    #[test]
    fn restored_engine_plays_the_same_game() {
        let mut engine = BoardEngine::try_new(8, 12, 77).unwrap();
        engine.reveal(27).unwrap();

        let saved = serde_json::to_string(&engine).unwrap();
        let mut restored: BoardEngine = serde_json::from_str(&saved).unwrap();

        for cell in [0, 7, 56, 63] {
            assert_eq!(restored.reveal(cell).unwrap(), engine.reveal(cell).unwrap());
        }
        assert_eq!(restored, engine);
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::*;

/// Result of opening a cell in a [`HumanGame`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The cell carries a flag and was left alone.
    Blocked,
    Played(RevealOutcome),
}

/// Interactive game: the engine plus the player's flag markers.
///
/// Flags are a player annotation only, they never reach the engine or the observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HumanGame {
    engine: BoardEngine,
    flags: BTreeSet<CellIndex>,
}

impl HumanGame {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(BoardEngine::new(config, seed))
    }

    pub fn from_engine(engine: BoardEngine) -> Self {
        Self {
            engine,
            flags: BTreeSet::new(),
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn flags(&self) -> &BTreeSet<CellIndex> {
        &self.flags
    }

    pub fn is_flagged(&self, index: CellIndex) -> bool {
        self.flags.contains(&index)
    }

    pub fn flags_used(&self) -> usize {
        self.flags.len()
    }

    /// Mines minus flags placed, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.engine.config().mines as isize) - (self.flags.len() as isize)
    }

    pub fn toggle_flag(&mut self, cell: usize) -> Result<MarkOutcome> {
        let cell = self.engine.config().validate_index(cell)?;
        if self.engine.is_finished() {
            return Err(UsageError::GameFinished.into());
        }

        if !self.engine.visible_cell(cell).is_covered() {
            return Ok(MarkOutcome::NoChange);
        }
        if !self.flags.remove(&cell) {
            self.flags.insert(cell);
        }
        Ok(MarkOutcome::Changed)
    }

    pub fn open(&mut self, cell: usize) -> Result<OpenOutcome> {
        let index = self.engine.config().validate_index(cell)?;
        if self.is_flagged(index) && !self.engine.is_finished() {
            return Ok(OpenOutcome::Blocked);
        }

        let outcome = self.engine.reveal(cell)?;
        if let Some(opened) = outcome.newly_revealed() {
            self.flags.retain(|flag| !opened.contains(flag));
        }
        Ok(OpenOutcome::Played(outcome))
    }

    pub fn board(&self) -> TextBoard<'_> {
        TextBoard::new(&self.engine).with_flags(&self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord, mines: &[Coord2]) -> HumanGame {
        HumanGame::from_engine(BoardEngine::from_layout(
            MineLayout::from_mine_coords(size, mines).unwrap(),
        ))
    }

    #[test]
    fn flagged_cells_cannot_be_opened() {
        let mut game = game(3, &[(0, 0), (0, 2)]);

        assert_eq!(game.toggle_flag(0).unwrap(), MarkOutcome::Changed);
        assert_eq!(game.open(0).unwrap(), OpenOutcome::Blocked);
        assert!(!game.engine().is_finished());

        game.toggle_flag(0).unwrap();
        assert_eq!(game.open(0).unwrap(), OpenOutcome::Played(RevealOutcome::HitMine));
    }

    #[test]
    fn counters_track_flags() {
        let mut game = game(4, &[(0, 0)]);

        for cell in [1, 2, 3] {
            game.toggle_flag(cell).unwrap();
        }

        assert_eq!(game.flags_used(), 3);
        assert_eq!(game.mines_left(), -2);
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut game = game(3, &[(0, 0), (0, 2)]);
        game.open(8).unwrap();

        let outcome = game.toggle_flag(8).unwrap();
        assert_eq!(outcome, MarkOutcome::NoChange);
        assert!(!outcome.has_update());
        assert_eq!(game.flags_used(), 0);
    }

    #[test]
    fn flood_fill_clears_flags_it_opens() {
        let mut game = game(3, &[(0, 0), (0, 2)]);
        game.toggle_flag(4).unwrap();
        game.toggle_flag(1).unwrap();

        game.open(8).unwrap();

        assert_eq!(game.flags(), &BTreeSet::from([1]));
    }

    #[test]
    fn finished_game_rejects_flags() {
        let mut game = game(3, &[(0, 0), (0, 2)]);
        game.open(0).unwrap();

        assert_eq!(
            game.toggle_flag(4),
            Err(GameError::Usage(UsageError::GameFinished))
        );
        assert_eq!(game.open(4).unwrap(), OpenOutcome::Played(RevealOutcome::GameOver));
    }

    #[test]
    fn board_renders_flags() {
        let mut game = game(3, &[(0, 0), (0, 2)]);
        game.toggle_flag(1).unwrap();
        game.open(8).unwrap();

        assert_eq!(game.board().to_string(), "# F #\n1 2 1\n0 0 0\n");
    }
}

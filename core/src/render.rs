use core::fmt;
use std::collections::BTreeSet;

use crate::*;

pub const COVERED_GLYPH: char = '#';
pub const MINE_GLYPH: char = '*';
pub const FLAG_GLYPH: char = 'F';

/// Plain text view of a board, one line per row with cells separated by spaces.
///
/// Covered cells show `#`, revealed cells their count. Once the game is over every mine is shown
/// as `*`. Flagged covered cells show `F` when a flag overlay is attached.
#[derive(Copy, Clone, Debug)]
pub struct TextBoard<'a> {
    engine: &'a BoardEngine,
    flags: Option<&'a BTreeSet<CellIndex>>,
}

impl<'a> TextBoard<'a> {
    pub fn new(engine: &'a BoardEngine) -> Self {
        Self {
            engine,
            flags: None,
        }
    }

    pub fn with_flags(mut self, flags: &'a BTreeSet<CellIndex>) -> Self {
        self.flags = Some(flags);
        self
    }

    fn glyph(&self, index: CellIndex) -> char {
        let coords = index_to_coords(index, self.engine.size());
        match self.engine.visible_cell(index) {
            VisibleCell::Revealed(count) => char::from(b'0' + count),
            VisibleCell::Covered => {
                let is_mine = self
                    .engine
                    .true_snapshot()
                    .is_ok_and(|grid| grid[coords.to_nd_index()].is_mine());
                if is_mine {
                    MINE_GLYPH
                } else if self.flags.is_some_and(|flags| flags.contains(&index)) {
                    FLAG_GLYPH
                } else {
                    COVERED_GLYPH
                }
            }
        }
    }
}

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.engine.size();
        for row in 0..size {
            for col in 0..size {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self.glyph(coords_to_index((row, col), size)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

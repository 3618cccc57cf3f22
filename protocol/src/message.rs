use minegym_core::{BoardEngine, Reward, TrueCell};
use ndarray::Array2;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Flat integer board: 0-8 revealed, 9 covered.
pub type BoardRows = Vec<Vec<u8>>;

/// Full board exposed at the end of a game: -1 mine, 0-8 count.
pub type SolutionRows = Vec<Vec<i8>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(deserialize_with = "number_or_string")]
    pub board_size: usize,
    #[serde(deserialize_with = "number_or_string")]
    pub num_mines: usize,
    /// Fixed seed for reproducible games, random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub board: BoardRows,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub action: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    #[serde(rename = "continue")]
    Continue,
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "lose")]
    Lose,
    #[serde(rename = "invalid action")]
    InvalidAction,
}

impl MoveResult {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInfo {
    pub result: MoveResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub board: BoardRows,
    pub reward: Reward,
    pub terminated: bool,
    pub info: MoveInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_board: Option<SolutionRows>,
}

pub fn board_rows(engine: &BoardEngine) -> BoardRows {
    to_rows(&engine.visible_grid_values())
}

/// Mine layout with counts, `None` while the game is still running.
pub fn solution_rows(engine: &BoardEngine) -> Option<SolutionRows> {
    let grid = engine.true_snapshot().ok()?;
    let values = grid.mapv(|cell| match cell {
        TrueCell::Mine => -1,
        TrueCell::Count(count) => count as i8,
    });
    Some(to_rows(&values))
}

fn to_rows<T: Copy>(grid: &Array2<T>) -> Vec<Vec<T>> {
    grid.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// The browser sends form values, which may arrive as strings.
fn number_or_string<'de, D>(deserializer: D) -> core::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(usize),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

//! Reinforcement-learning environment over [`BoardEngine`].

use serde::{Deserialize, Serialize};

use crate::*;
pub use observation::*;

mod observation;

/// Extra per-step data, always empty for this environment.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// Flattened row-major cell index, `row * N + col`.
pub type ActionId = usize;

pub type Reward = i32;

/// Generic environment interface for RL
pub trait Environment {
    /// Type used to represent observations
    type ObservationType;

    /// Type used to represent actions
    type ActionType;

    /// Type used to represent rewards
    type RewardType;

    /// Start a fresh episode, deterministic when `seed` is given.
    ///
    /// Returns the observation of the untouched board.
    fn reset(&mut self, seed: Option<u64>) -> Self::ObservationType;

    /// Apply an action and advance the environment by one step.
    fn step(
        &mut self,
        action: Self::ActionType,
    ) -> Result<EnvStep<Self::ObservationType, Self::RewardType>>;

    /// Human readable view of the current board.
    fn render(&self) -> String;
}

/// Result of a single [`Environment::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnvStep<O, R> {
    pub observation: O,
    pub reward: R,
    pub terminated: bool,
    /// There is no step limit, so this is never set.
    pub truncated: bool,
    pub info: Info,
}

/// Reward paid for each kind of reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub already_revealed: Reward,
    pub hit_mine: Reward,
    pub win: Reward,
    pub revealed: Reward,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            already_revealed: 0,
            hit_mine: -100,
            win: 100,
            revealed: 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub game: GameConfig,
    pub rewards: RewardTable,
}

impl EnvConfig {
    pub fn new(game: GameConfig) -> Self {
        Self {
            game,
            rewards: RewardTable::default(),
        }
    }
}

/// Minesweeper as an episodic environment: one action opens one cell.
///
/// The environment is not usable until [`Environment::reset`] has been called.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesweeperEnv {
    config: EnvConfig,
    engine: Option<BoardEngine>,
    terminated: bool,
}

impl MinesweeperEnv {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            engine: None,
            terminated: false,
        }
    }

    /// Validates `size` and `mines` and uses the default rewards.
    pub fn with_size(size: usize, mines: usize) -> Result<Self> {
        Ok(Self::new(EnvConfig::new(GameConfig::new(size, mines)?)))
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn engine(&self) -> Option<&BoardEngine> {
        self.engine.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn action_space_size(&self) -> usize {
        self.config.game.total_cells().into()
    }

    pub fn observation_shape(&self) -> [usize; 3] {
        let size = usize::from(self.config.game.size);
        [VISIBLE_STATES, size, size]
    }

    pub fn observation(&self) -> Observation {
        match &self.engine {
            Some(engine) => Observation::from_engine(engine),
            None => Observation::covered(self.config.game.size),
        }
    }
}

impl Environment for MinesweeperEnv {
    type ObservationType = Observation;
    type ActionType = ActionId;
    type RewardType = Reward;

    fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or_else(rand::random);
        log::debug!("reset with seed {seed}");

        let engine = BoardEngine::new(self.config.game, seed);
        let observation = Observation::from_engine(&engine);
        self.engine = Some(engine);
        self.terminated = false;
        observation
    }

    fn step(&mut self, action: ActionId) -> Result<EnvStep<Observation, Reward>> {
        use RevealOutcome::*;

        if self.terminated {
            return Err(UsageError::EpisodeTerminated.into());
        }
        let engine = self.engine.as_mut().ok_or(UsageError::NotReset)?;

        let rewards = self.config.rewards;
        let (reward, terminated) = match engine.reveal(action)? {
            AlreadyRevealed => (rewards.already_revealed, false),
            HitMine => (rewards.hit_mine, true),
            Win(_) => (rewards.win, true),
            Revealed(_) => (rewards.revealed, false),
            GameOver => return Err(UsageError::EpisodeTerminated.into()),
        };
        self.terminated = terminated;

        Ok(EnvStep {
            observation: Observation::from_engine(engine),
            reward,
            terminated,
            truncated: false,
            info: Info::new(),
        })
    }

    fn render(&self) -> String {
        match &self.engine {
            Some(engine) => TextBoard::new(engine).to_string(),
            None => TextBoard::new(&BoardEngine::new(self.config.game, 0)).to_string(),
        }
    }
}

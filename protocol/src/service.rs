use core::time::Duration;

use minegym_core::{Environment, MinesweeperEnv};

use crate::*;

/// Request handlers for the start/move endpoints, one environment per game id.
#[derive(Debug)]
pub struct GameService<S> {
    store: S,
    ttl: Duration,
}

impl<S: GameStore> GameService<S> {
    /// How long an untouched game is kept by default.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(store: S) -> Self {
        Self::with_ttl(store, Self::DEFAULT_TTL)
    }

    /// Every save pushes the game's expiry `ttl` into the future.
    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Starts a new game under `id`, replacing any game already stored there.
    pub fn start(&mut self, id: &str, request: StartRequest) -> Result<StartResponse> {
        let mut env = MinesweeperEnv::with_size(request.board_size, request.num_mines)?;
        env.reset(request.seed);
        log::info!(
            "game {id:?} started: {0}x{0} with {1} mines",
            request.board_size,
            request.num_mines
        );

        let board = env.engine().map(board_rows).unwrap_or_default();
        self.persist(id, &env)?;
        Ok(StartResponse { board })
    }

    pub fn play(&mut self, id: &str, request: MoveRequest) -> Result<MoveResponse> {
        let mut env = self.restore(id)?;
        let revealed_before = revealed_count(&env);

        let step = env.step(request.action)?;

        let engine = env.engine();
        let result = match engine {
            Some(engine) if engine.is_won() => MoveResult::Win,
            Some(engine) if engine.is_lost() => MoveResult::Lose,
            _ if revealed_count(&env) == revealed_before => MoveResult::InvalidAction,
            _ => MoveResult::Continue,
        };
        if result.is_game_over() {
            log::info!("game {id:?} finished: {result:?}");
        }

        let response = MoveResponse {
            board: engine.map(board_rows).unwrap_or_default(),
            reward: step.reward,
            terminated: step.terminated,
            info: MoveInfo { result },
            actual_board: engine.and_then(solution_rows),
        };
        self.persist(id, &env)?;
        Ok(response)
    }

    pub fn end(&mut self, id: &str) -> Result<bool> {
        self.store.remove(id)
    }

    fn restore(&mut self, id: &str) -> Result<MinesweeperEnv> {
        match self.store.load(id)? {
            Some(state) => Ok(serde_json::from_str(&state)?),
            None => {
                log::warn!("move for unknown game {id:?}");
                Err(ProtocolError::UnknownGame(id.to_owned()))
            }
        }
    }

    fn persist(&mut self, id: &str, env: &MinesweeperEnv) -> Result<()> {
        let state = serde_json::to_string(env)?;
        self.store.save(id, state, self.ttl)
    }
}

fn revealed_count(env: &MinesweeperEnv) -> usize {
    env.engine()
        .map_or(0, |engine| engine.revealed_cells().len())
}

use core::fmt;

use anyhow::Result;
use minegym_core::{EnvConfig, Environment, GameConfig, MinesweeperEnv, Reward, VisibleCell};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub episodes: usize,
    pub wins: usize,
    pub total_reward: i64,
    pub total_steps: usize,
}

impl Summary {
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    pub fn mean_return(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward as f64 / self.episodes as f64
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "episodes: {}, wins: {} ({:.1}%), mean return: {:.2}, steps: {}",
            self.episodes,
            self.wins,
            100.0 * self.win_rate(),
            self.mean_return(),
            self.total_steps
        )
    }
}

/// Plays `episodes` games picking uniformly among covered cells.
pub fn run(config: GameConfig, episodes: usize, seed: u64) -> Result<Summary> {
    let mut env = MinesweeperEnv::new(EnvConfig::new(config));
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut summary = Summary::default();

    for episode in 0..episodes {
        env.reset(Some(rng.random()));
        let mut episode_return: Reward = 0;

        loop {
            let covered = covered_cells(&env);
            let Some(&action) = covered.choose(&mut rng) else {
                break;
            };
            let step = env.step(action)?;
            episode_return += step.reward;
            summary.total_steps += 1;

            if step.terminated {
                if step.reward == env.config().rewards.win {
                    summary.wins += 1;
                }
                break;
            }
        }

        log::debug!("episode {episode}: return {episode_return}");
        summary.episodes += 1;
        summary.total_reward += i64::from(episode_return);
    }

    Ok(summary)
}

fn covered_cells(env: &MinesweeperEnv) -> Vec<usize> {
    let Some(engine) = env.engine() else {
        return Vec::new();
    };
    engine
        .visible_snapshot()
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| cell == VisibleCell::Covered)
        .map(|(index, _)| index)
        .collect()
}

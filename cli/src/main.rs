use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use minegym_core::GameConfig;

mod play;
mod rollout;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play(BoardArgs),
    /// Run a random agent through the environment
    Rollout {
        #[command(flatten)]
        board: BoardArgs,

        /// Number of episodes to play
        #[arg(short, long, default_value_t = 100)]
        episodes: usize,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    /// Side length of the square board
    #[arg(short = 'n', long, default_value_t = 9)]
    size: usize,

    /// Number of mines
    #[arg(short, long, default_value_t = 10)]
    mines: usize,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl BoardArgs {
    fn config(&self) -> Result<GameConfig> {
        Ok(GameConfig::new(self.size, self.mines)?)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Command::Play(board) => {
            let seed = board.seed();
            log::debug!("seed: {seed}");
            play::run(board.config()?, seed)
        }
        Command::Rollout { board, episodes } => {
            let seed = board.seed();
            log::debug!("seed: {seed}");
            let summary = rollout::run(board.config()?, episodes, seed)?;
            println!("{summary}");
            Ok(())
        }
    }
}

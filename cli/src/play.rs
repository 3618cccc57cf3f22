use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use minegym_core::{Coord, GameConfig, HumanGame, OpenOutcome, RevealOutcome, coords_to_index};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Input {
    Open(Coord, Coord),
    Flag(Coord, Coord),
    Quit,
}

fn parse_input(line: &str) -> Result<Input> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        bail!("empty command");
    };
    if matches!(verb, "q" | "quit") {
        return Ok(Input::Quit);
    }

    let mut coord = |name: &str| -> Result<Coord> {
        parts
            .next()
            .with_context(|| format!("missing {name}"))?
            .parse()
            .with_context(|| format!("invalid {name}"))
    };
    let row = coord("row")?;
    let col = coord("column")?;

    match verb {
        "o" | "open" => Ok(Input::Open(row, col)),
        "f" | "flag" => Ok(Input::Flag(row, col)),
        other => bail!("unknown command '{other}' (expected 'o', 'f' or 'q')"),
    }
}

fn cell_index(config: GameConfig, row: Coord, col: Coord) -> Result<usize> {
    if row >= config.size || col >= config.size {
        bail!("({row}, {col}) is outside of the {0}x{0} board", config.size);
    }
    Ok(coords_to_index((row, col), config.size).into())
}

pub fn run(config: GameConfig, seed: u64) -> Result<()> {
    let mut game = HumanGame::new(config, seed);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!(
        "{0}x{0} board with {1} mines and {2} safe cells. Commands: o ROW COL, f ROW COL, q",
        config.size,
        config.mines,
        config.safe_cells()
    );

    loop {
        print!("{}mines left: {}\n> ", game.board(), game.mines_left());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                log::debug!("rejected input {line:?}: {err:#}");
                println!("{err:#}");
                continue;
            }
        };

        let (row, col, flag) = match input {
            Input::Quit => return Ok(()),
            Input::Open(row, col) => (row, col, false),
            Input::Flag(row, col) => (row, col, true),
        };
        let cell = match cell_index(config, row, col) {
            Ok(cell) => cell,
            Err(err) => {
                log::debug!("rejected input {line:?}: {err:#}");
                println!("{err:#}");
                continue;
            }
        };

        if flag {
            if !game.toggle_flag(cell)?.has_update() {
                println!("That cell is already open.");
            }
            continue;
        }

        match game.open(cell)? {
            OpenOutcome::Blocked => println!("Remove the flag first."),
            OpenOutcome::Played(RevealOutcome::AlreadyRevealed) => {
                println!("That cell is already open.")
            }
            OpenOutcome::Played(RevealOutcome::HitMine) => {
                print!("{}", game.board());
                println!("Boom! You lost.");
                return Ok(());
            }
            OpenOutcome::Played(RevealOutcome::Win(_)) => {
                print!("{}", game.board());
                println!("Victory!");
                return Ok(());
            }
            OpenOutcome::Played(_) => {}
        }
    }
}

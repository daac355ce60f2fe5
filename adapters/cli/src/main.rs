#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Chroma Maze from scripted or interactive input.

mod ascii;
mod script;
mod session;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chroma_maze_core::{GameConfig, WELCOME_BANNER};
use chroma_maze_game::Game;
use clap::Parser;

use crate::session::Session;

/// Plays a generated maze, reading one command per line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maze width in cells; rounded up to an odd number of at least 3
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Maze height in cells; rounded up to an odd number of at least 3
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Seed for maze generation; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file overriding the default game configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File of commands to run instead of reading stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Entry point for the Chroma Maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    let columns = args.width.unwrap_or(config.maze_columns);
    let rows = args.height.unwrap_or(config.maze_rows);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("generating {columns}x{rows} maze from seed {seed}");

    let game = Game::init(config, columns, rows, seed).context("failed to start the level")?;
    println!("{WELCOME_BANNER}");
    let mut session = Session::new(game, io::stdout().lock());

    match &args.script {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read script at {}", path.display()))?;
            for (index, line) in contents.lines().enumerate() {
                session.feed(index + 1, line, true)?;
            }
        }
        None => {
            for (index, line) in io::stdin().lock().lines().enumerate() {
                let line = line.context("failed to read from stdin")?;
                session.feed(index + 1, &line, false)?;
            }
        }
    }

    session
        .into_output()
        .flush()
        .context("failed to flush output")
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: GameConfig =
        toml::from_str(&contents).context("failed to parse config toml contents")?;
    config
        .validate()
        .with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(config)
}

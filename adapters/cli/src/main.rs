#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Dash session.

mod config;
mod session;
mod text_backend;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_dash_core::{Key, WELCOME_BANNER};
use maze_dash_rendering::{Color, Presentation, RenderingBackend};

use crate::{
    config::GameConfig,
    session::Session,
    text_backend::{hold_script, TextBackend},
};

/// Generates a maze, drives the player for a fixed number of ticks and prints
/// the final frame.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file providing defaults for every other flag.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of maze rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of maze columns.
    #[arg(long)]
    cols: Option<u32>,
    /// Row-major index of the cell the generator starts from.
    #[arg(long)]
    start: Option<u32>,
    /// Seed of the maze generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Edge length of a spatial index chunk.
    #[arg(long)]
    chunk_size: Option<f32>,
    /// Edge length of a maze cell.
    #[arg(long)]
    cell_length: Option<f32>,
    /// Thickness of wall stripes.
    #[arg(long)]
    line_width: Option<f32>,
    /// Player speed in world units per second.
    #[arg(long)]
    speed: Option<f32>,
    /// Milliseconds of simulated time per tick.
    #[arg(long)]
    tick_millis: Option<u64>,
    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u32>,
    /// Keys held down for the whole run, such as `ArrowDown`.
    #[arg(long, num_args = 1.., value_parser = parse_key)]
    hold: Vec<Key>,
    /// Lets both axes move the player at once.
    #[arg(long)]
    diagonal: bool,
    /// Resolves held keys on the horizontal axis first.
    #[arg(long)]
    horizontal_first: bool,
}

impl Args {
    fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        override_with(&mut config.rows, self.rows);
        override_with(&mut config.columns, self.cols);
        override_with(&mut config.start, self.start);
        override_with(&mut config.seed, self.seed);
        override_with(&mut config.chunk_size, self.chunk_size);
        override_with(&mut config.cell_length, self.cell_length);
        override_with(&mut config.line_width, self.line_width);
        override_with(&mut config.speed, self.speed);
        override_with(&mut config.tick_millis, self.tick_millis);
        override_with(&mut config.ticks, self.ticks);
        if !self.hold.is_empty() {
            config.hold.clone_from(&self.hold);
        }
        config.diagonal |= self.diagonal;
        config.horizontal_first |= self.horizontal_first;

        Ok(config)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn parse_key(name: &str) -> Result<Key, String> {
    Key::from_name(name).ok_or_else(|| {
        format!("unknown key `{name}`; expected ArrowUp, ArrowRight, ArrowDown or ArrowLeft")
    })
}

/// Entry point for the Maze Dash command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.resolve()?;
    info!("starting with {config:?}");

    let mut session = Session::new(&config)?;
    let presentation = Presentation::new(
        WELCOME_BANNER,
        Color::from_rgb_u8(0, 0, 0),
        config.tick_interval(),
        session.scene()?,
    )
    .context("invalid presentation")?;

    let stdout = std::io::stdout();
    TextBackend::new(stdout.lock(), config.ticks, config.line_width)
        .with_script(hold_script(&config.hold))
        .run(presentation, |dt, input, scene| {
            session.step(dt, &input);
            session.update_scene(scene);
        })?;

    println!("{}", session.summary());
    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates Maze Trail scenes and walks them.

mod report;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use maze_trail_core::Command;
use maze_trail_world::{self as world, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::report::SceneTally;
use self::settings::Overrides;

/// Generates random mazes and walks an agent along shortest paths.
#[derive(Debug, Parser)]
#[command(name = "maze-trail", version)]
struct Cli {
    /// TOML file providing the world configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Logical maze size as WIDTHxHEIGHT.
    #[arg(long, value_parser = settings::parse_size)]
    size: Option<(u32, u32)>,
    /// Walls open with probability 1/RATE; 0 keeps a perfect maze.
    #[arg(long)]
    mutation_rate: Option<u32>,
    /// Non-zero seed for the random stream.
    #[arg(long)]
    seed: Option<u32>,
    /// Number of agent moves per scene.
    #[arg(long, default_value_t = 1_000)]
    steps: u64,
    /// Number of mazes to generate.
    #[arg(long, default_value_t = 1)]
    scenes: u32,
    /// Print every maze after it has been walked.
    #[arg(long)]
    print_maze: bool,
}

/// Entry point for the Maze Trail command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        size: cli.size,
        mutation_rate: cli.mutation_rate,
        seed: cli.seed,
    };
    let config = overrides.apply_to(settings::load(cli.config.as_deref())?);
    let mut world = World::new(config).context("failed to create the world")?;

    for scene in 0..cli.scenes {
        let mut tally = SceneTally::default();
        if scene > 0 {
            step(&mut world, Command::GenerateScene, &mut tally)?;
        }
        for _ in 0..cli.steps {
            step(&mut world, Command::Advance, &mut tally)?;
        }

        println!("{}", report::summary(&world, tally));
        if cli.print_maze {
            print!("{}", report::draw(&world));
        }
    }

    info!(scenes = cli.scenes, "finished");
    Ok(())
}

fn step(world: &mut World, command: Command, tally: &mut SceneTally) -> Result<()> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events)
        .with_context(|| format!("failed to apply {command:?}"))?;
    tally.record(&events);
    Ok(())
}

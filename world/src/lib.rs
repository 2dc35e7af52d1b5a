#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scene state for Maze Trail.
//!
//! The world owns the random stream, the current maze and the agent walking
//! it. Adapters mutate it exclusively through [`apply`], which reports what
//! happened as [`Event`] values, and read it through the [`query`] functions.

use maze_trail_core::{CellCoord, Command, Event, MazeError};
use maze_trail_system_generation::{
    GeneratorConfig, LogicalGrid, MazeGenerator, DEFAULT_MUTATION_RATE,
};
use maze_trail_system_navigation::{Advance, Navigator};
use maze_trail_system_random::XorShift32;
use serde::{Deserialize, Serialize};
use tracing::info;

const DEFAULT_WIDTH: u32 = 200;
const DEFAULT_HEIGHT: u32 = 100;

/// Tunable parameters of the world, loadable from configuration files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Number of logical node columns in each generated maze.
    pub width: u32,
    /// Number of logical node rows in each generated maze.
    pub height: u32,
    /// Walls are opened with probability `1 / mutation_rate`; zero keeps the
    /// maze a perfect tree.
    pub mutation_rate: u32,
    /// Seed of the random stream; the wall clock is used when absent.
    pub seed: Option<u32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mutation_rate: DEFAULT_MUTATION_RATE,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Generator parameters derived from the configuration.
    #[must_use]
    pub const fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.width, self.height, self.mutation_rate)
    }
}

/// Represents the authoritative Maze Trail world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    generator: MazeGenerator,
    rng: XorShift32,
    seed: u32,
    logical: LogicalGrid,
    navigator: Navigator,
    scene: u64,
}

impl World {
    /// Creates a world and generates its first scene.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::DegenerateSeed`] for a zero seed and
    /// [`MazeError::InvalidConfiguration`] for unusable dimensions.
    pub fn new(config: WorldConfig) -> Result<Self, MazeError> {
        let mut rng = match config.seed {
            Some(seed) => XorShift32::new(seed)?,
            None => XorShift32::from_time(),
        };
        let seed = rng.state();
        let generator = MazeGenerator::new(config.generator_config());
        let (logical, navigator) = build_scene(&generator, &mut rng)?;
        info!(
            seed,
            width = config.width,
            height = config.height,
            mutation_rate = config.mutation_rate,
            "world created"
        );

        Ok(Self {
            config,
            generator,
            rng,
            seed,
            logical,
            navigator,
            scene: 1,
        })
    }

    fn regenerate(&mut self) -> Result<(), MazeError> {
        let (logical, navigator) = build_scene(&self.generator, &mut self.rng)?;
        self.logical = logical;
        self.navigator = navigator;
        self.scene = self.scene.saturating_add(1);
        info!(
            scene = self.scene,
            path_cells = self.navigator.grid().path_cell_count(),
            "generated scene"
        );
        Ok(())
    }

    fn goal_selected(&self) -> Event {
        Event::GoalSelected {
            goal: self.navigator.goal(),
            distance: self.navigator.remaining_steps(),
        }
    }
}

fn build_scene(
    generator: &MazeGenerator,
    rng: &mut XorShift32,
) -> Result<(LogicalGrid, Navigator), MazeError> {
    let (logical, physical) = generator.generate(rng)?;
    let navigator = Navigator::spawn(physical, rng)?;
    Ok((logical, navigator))
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Errors
///
/// Propagates generation and path finding failures. The world keeps its
/// previous scene and plan when a command fails.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> Result<(), MazeError> {
    match command {
        Command::GenerateScene => {
            world.regenerate()?;
            let (width, height) = (world.logical.width(), world.logical.height());
            out_events.push(Event::SceneGenerated {
                scene: world.scene,
                width,
                height,
                path_cells: world.navigator.grid().path_cell_count(),
            });
            out_events.push(world.goal_selected());
        }
        Command::Advance => match world.navigator.advance(&mut world.rng)? {
            Advance::Stepped { from, to } => out_events.push(Event::AgentStepped { from, to }),
            Advance::Retargeted { .. } => out_events.push(world.goal_selected()),
            Advance::Idle => out_events.push(Event::AgentIdle {
                cell: world.navigator.position(),
            }),
        },
        Command::SetGoal { goal } => {
            world.navigator.retarget(goal)?;
            out_events.push(world.goal_selected());
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_trail_system_generation::{LogicalGrid, PhysicalGrid};
    use maze_trail_system_pathfinding::{DistanceField, Path};

    use super::{CellCoord, World, WorldConfig};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Seed the world's random stream started from.
    #[must_use]
    pub fn seed(world: &World) -> u32 {
        world.seed
    }

    /// One-based index of the current scene.
    #[must_use]
    pub fn scene(world: &World) -> u64 {
        world.scene
    }

    /// Spanning tree the current maze was expanded from.
    #[must_use]
    pub fn logical_grid(world: &World) -> &LogicalGrid {
        &world.logical
    }

    /// Wall and path layout of the current maze.
    #[must_use]
    pub fn physical_grid(world: &World) -> &PhysicalGrid {
        world.navigator.grid()
    }

    /// Cell the agent occupies.
    #[must_use]
    pub fn position(world: &World) -> CellCoord {
        world.navigator.position()
    }

    /// Goal the agent is heading for.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.navigator.goal()
    }

    /// Number of moves left before the agent reaches its goal.
    #[must_use]
    pub fn remaining_steps(world: &World) -> usize {
        world.navigator.remaining_steps()
    }

    /// Remaining route from the agent to its goal.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        world.navigator.path()
    }

    /// Distance field toward the current goal.
    #[must_use]
    pub fn distance_field(world: &World) -> &DistanceField {
        world.navigator.field()
    }

    /// Hop count from `cell` to the current goal, if it can reach it.
    #[must_use]
    pub fn distance(world: &World, cell: CellCoord) -> Option<u32> {
        world.navigator.field().distance(cell)
    }

    /// Reports whether `cell` is passable in the current maze.
    #[must_use]
    pub fn is_path(world: &World, cell: CellCoord) -> bool {
        world.navigator.grid().is_path(cell)
    }

    /// Number of goals the agent reached in the current scene.
    #[must_use]
    pub fn goals_reached(world: &World) -> u64 {
        world.navigator.goals_reached()
    }
}

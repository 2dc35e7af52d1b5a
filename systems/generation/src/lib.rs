#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized maze generation.
//!
//! A [`MazeGenerator`] carves a spanning tree over a [`LogicalGrid`] with an
//! iterative depth-first backtracker, expands it into a doubled
//! [`PhysicalGrid`] of walls and paths, and optionally knocks out random walls
//! so the maze offers more than one route between cells.

mod logical;
mod physical;

use maze_trail_core::{Direction, MazeError};
use rand::RngCore;
use tracing::debug;

pub use logical::LogicalGrid;
pub use physical::PhysicalGrid;

use physical::physical_dimensions;

/// Wall-opening rate used when no explicit configuration is given.
pub const DEFAULT_MUTATION_RATE: u32 = 100;

/// Parameters describing the maze to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    width: u32,
    height: u32,
    mutation_rate: u32,
}

impl GeneratorConfig {
    /// Creates a configuration for a `width × height` logical maze.
    ///
    /// Each wall of the expanded grid is opened with probability
    /// `1 / mutation_rate`; a rate of zero disables mutation and keeps the
    /// maze a perfect tree.
    #[must_use]
    pub const fn new(width: u32, height: u32, mutation_rate: u32) -> Self {
        Self {
            width,
            height,
            mutation_rate,
        }
    }

    /// Number of logical node columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of logical node rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Wall-opening rate, or `None` when mutation is disabled.
    #[must_use]
    pub const fn mutation_rate(&self) -> Option<u32> {
        if self.mutation_rate == 0 {
            None
        } else {
            Some(self.mutation_rate)
        }
    }
}

/// Builds logical and physical mazes from a random stream.
#[derive(Clone, Copy, Debug)]
pub struct MazeGenerator {
    config: GeneratorConfig,
}

impl MazeGenerator {
    /// Creates a generator for the provided configuration.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates a fresh maze.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when either dimension is
    /// zero or the doubled grid cannot be addressed.
    pub fn generate<R>(&self, rng: &mut R) -> Result<(LogicalGrid, PhysicalGrid), MazeError>
    where
        R: RngCore + ?Sized,
    {
        let mut logical = LogicalGrid::new(self.config.width, self.config.height)?;
        carve(&mut logical, rng);

        let mut physical = PhysicalGrid::from_logical(&logical);
        let opened = match self.config.mutation_rate() {
            Some(rate) => physical.mutate(rate, rng),
            None => 0,
        };

        debug!(
            width = logical.width(),
            height = logical.height(),
            edges = logical.edge_count(),
            opened,
            path_cells = physical.path_cell_count(),
            "generated maze"
        );

        Ok((logical, physical))
    }
}

/// Carves a spanning tree with an explicit-stack depth-first backtracker.
///
/// Every iteration either visits a new node or pops one, so the loop runs at
/// most `2 * node_count` times.
fn carve<R>(grid: &mut LogicalGrid, rng: &mut R)
where
    R: RngCore + ?Sized,
{
    let (width, height) = (grid.width(), grid.height());
    let start = grid.center();
    grid.mark_visited(start);

    let mut stack = Vec::with_capacity(grid.node_count());
    stack.push(start);
    let mut candidates = Vec::with_capacity(Direction::SCAN_ORDER.len());

    while let Some(&current) = stack.last() {
        candidates.clear();
        for direction in Direction::SCAN_ORDER {
            if let Some(next) = current.step(direction, width, height) {
                if !grid.is_visited(next) {
                    candidates.push((direction, next));
                }
            }
        }

        if candidates.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let choice = rng.next_u32() % candidates.len() as u32;
        let (direction, next) = candidates[choice as usize];
        grid.connect(current, direction, next);
        grid.mark_visited(next);
        stack.push(next);
    }

    grid.clear_visited();
}

/// Validates logical dimensions and returns the logical node count.
pub(crate) fn checked_dimensions(width: u32, height: u32) -> Result<usize, MazeError> {
    let invalid = MazeError::InvalidConfiguration { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    let (physical_width, physical_height) = physical_dimensions(width, height).ok_or(invalid)?;
    let cells = usize::try_from(physical_width)
        .ok()
        .zip(usize::try_from(physical_height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(invalid)?;
    Ok(cells / 4)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path engine over the physical maze grid.
//!
//! Paths are found in two stages. A breadth-first search seeded at the goal
//! fills a [`DistanceField`] with the hop count from every passable cell to
//! the goal; reconstruction then walks downhill from the start, one cell per
//! unit of distance, which yields a shortest [`Path`] by construction.

mod field;
mod path;

use std::collections::VecDeque;

use maze_trail_core::{CellCoord, Direction, MazeError};
use maze_trail_system_generation::PhysicalGrid;
use tracing::trace;

pub use field::{DistanceField, UNREACHED};
pub use path::Path;

/// Breadth-first path finder that reuses its frontier between searches.
#[derive(Debug, Default)]
pub struct PathFinder {
    frontier: VecDeque<CellCoord>,
}

impl PathFinder {
    /// Creates a path finder with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the distance from every passable cell of `grid` to `goal`.
    ///
    /// Cells are explored in nondecreasing distance order and each is assigned
    /// once, on first discovery, so every recorded distance is minimal.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] when `goal` lies outside the grid
    /// and [`MazeError::NotPassable`] when it is a wall.
    pub fn compute_distance_field(
        &mut self,
        grid: &PhysicalGrid,
        goal: CellCoord,
    ) -> Result<DistanceField, MazeError> {
        let (width, height) = grid.dimensions();
        if !goal.is_within(width, height) {
            return Err(MazeError::OutOfBounds {
                cell: goal,
                width,
                height,
            });
        }
        if !grid.is_path(goal) {
            return Err(MazeError::NotPassable { cell: goal });
        }

        let mut field = DistanceField::unreached(width, height, goal, grid.cells().len());
        self.frontier.clear();
        let _ = field.assign(goal, 0);
        self.frontier.push_back(goal);

        while let Some(cell) = self.frontier.pop_front() {
            let Some(current) = field.distance(cell) else {
                continue;
            };
            let next_distance = current + 1;

            for neighbor in grid.open_neighbors(cell) {
                if field.assign(neighbor, next_distance) {
                    self.frontier.push_back(neighbor);
                }
            }
        }

        trace!(
            goal = %goal,
            reached = field.reachable_count(),
            max_distance = field.max_distance(),
            "computed distance field"
        );

        Ok(field)
    }

    /// Walks `field` downhill from `start` to `goal`.
    ///
    /// At every step the first neighbour in [`Direction::SCAN_ORDER`] whose
    /// distance is exactly one lower is taken, so a given field always yields
    /// the same path. The path holds `distance(start) + 1` cells.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] when `start` lies outside the field,
    /// [`MazeError::GoalMismatch`] when `field` was seeded from another goal,
    /// and [`MazeError::Unreachable`] when `start` has no recorded distance.
    pub fn reconstruct_path(
        &self,
        field: &DistanceField,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<Path, MazeError> {
        let (width, height) = (field.width(), field.height());
        if !start.is_within(width, height) {
            return Err(MazeError::OutOfBounds {
                cell: start,
                width,
                height,
            });
        }
        if field.goal() != goal {
            return Err(MazeError::GoalMismatch {
                field_goal: field.goal(),
                requested: goal,
            });
        }
        let unreachable = MazeError::Unreachable { start, goal };
        let steps = field.distance(start).ok_or(unreachable)?;

        let mut path = Path::with_capacity(start, steps as usize);
        let mut current = start;
        for remaining in (0..steps).rev() {
            current = downhill_neighbor(field, current, remaining).ok_or(unreachable)?;
            path.push(current);
        }

        Ok(path)
    }

    /// Computes a fresh distance field toward `goal` and the path to it from
    /// `start`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`PathFinder::compute_distance_field`] and
    /// [`PathFinder::reconstruct_path`].
    pub fn shortest_path(
        &mut self,
        grid: &PhysicalGrid,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<(DistanceField, Path), MazeError> {
        let field = self.compute_distance_field(grid, goal)?;
        let path = self.reconstruct_path(&field, start, goal)?;
        Ok((field, path))
    }
}

fn downhill_neighbor(field: &DistanceField, cell: CellCoord, target: u32) -> Option<CellCoord> {
    Direction::SCAN_ORDER
        .into_iter()
        .filter_map(|direction| cell.step(direction, field.width(), field.height()))
        .find(|neighbor| field.distance(*neighbor) == Some(target))
}

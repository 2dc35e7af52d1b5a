#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent that walks shortest paths toward a stream of random goals.
//!
//! The [`Navigator`] owns the physical maze, the distance field toward its
//! current goal and the remaining path. Each [`Navigator::advance`] call either
//! moves one cell along the path or, once the goal is reached, draws a new goal
//! and plans the route to it.

use maze_trail_core::{CellCoord, MazeError};
use maze_trail_system_generation::PhysicalGrid;
use maze_trail_system_pathfinding::{DistanceField, Path, PathFinder};
use rand::RngCore;
use tracing::debug;

/// Outcome of a single [`Navigator::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advance {
    /// The agent moved one cell along its path.
    Stepped {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after moving.
        to: CellCoord,
    },
    /// The agent stood on its goal and planned a route to a new one.
    Retargeted {
        /// Newly selected goal.
        goal: CellCoord,
    },
    /// The maze has a single passable cell, so there is nowhere to go.
    Idle,
}

/// Walks the maze along shortest paths and picks new goals as it reaches them.
#[derive(Debug)]
pub struct Navigator {
    grid: PhysicalGrid,
    finder: PathFinder,
    field: DistanceField,
    path: Path,
    goals_reached: u64,
}

impl Navigator {
    /// Places the agent on `position` heading for `goal`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] or [`MazeError::NotPassable`] when
    /// either cell is not a passable cell of `grid`, and
    /// [`MazeError::Unreachable`] when the two are not connected.
    pub fn new(grid: PhysicalGrid, position: CellCoord, goal: CellCoord) -> Result<Self, MazeError> {
        ensure_passable(&grid, position)?;
        let mut finder = PathFinder::new();
        let (field, path) = finder.shortest_path(&grid, position, goal)?;
        Ok(Self {
            grid,
            finder,
            field,
            path,
            goals_reached: 0,
        })
    }

    /// Places the agent and its first goal on random passable cells.
    ///
    /// The goal is drawn among the cells connected to the starting cell and
    /// differs from it whenever such a cell exists.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when `grid` has no passable
    /// cell.
    pub fn spawn<R>(grid: PhysicalGrid, rng: &mut R) -> Result<Self, MazeError>
    where
        R: RngCore + ?Sized,
    {
        let (width, height) = grid.dimensions();
        let position = random_path_cell(&grid, rng, None)
            .ok_or(MazeError::InvalidConfiguration { width, height })?;
        let mut navigator = Self::new(grid, position, position)?;
        if let Some(goal) = random_reachable_cell(&navigator.field, rng, Some(position)) {
            navigator.retarget(goal)?;
        }
        Ok(navigator)
    }

    /// Current cell of the agent.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.path.start()
    }

    /// Goal the agent is heading for.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.field.goal()
    }

    /// Remaining path, starting at the agent's position.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Distance field toward the current goal.
    #[must_use]
    pub const fn field(&self) -> &DistanceField {
        &self.field
    }

    /// Maze the agent walks.
    #[must_use]
    pub const fn grid(&self) -> &PhysicalGrid {
        &self.grid
    }

    /// Number of goals reached since the navigator was created.
    #[must_use]
    pub const fn goals_reached(&self) -> u64 {
        self.goals_reached
    }

    /// Moves one cell toward the goal or, on the goal, plans toward a new one.
    ///
    /// Once the path is exhausted the field leads to the agent's own cell, so
    /// new goals are drawn only among cells it reaches. The agent idles when
    /// no other cell is connected to it.
    ///
    /// # Errors
    ///
    /// Propagates path finding errors raised while planning toward a new goal.
    /// The goal counter only moves once the new plan is in place.
    pub fn advance<R>(&mut self, rng: &mut R) -> Result<Advance, MazeError>
    where
        R: RngCore + ?Sized,
    {
        let from = self.position();
        if let Some(to) = self.path.advance() {
            return Ok(Advance::Stepped { from, to });
        }

        let Some(goal) = random_reachable_cell(&self.field, rng, Some(from)) else {
            return Ok(Advance::Idle);
        };
        self.retarget(goal)?;
        self.goals_reached += 1;
        Ok(Advance::Retargeted { goal })
    }

    /// Number of moves left before the agent stands on its goal.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.path.steps()
    }

    /// Replaces the goal and plans the route to it from the current position.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] or [`MazeError::NotPassable`] when
    /// `goal` is not a passable cell and [`MazeError::Unreachable`] when it is
    /// not connected to the agent. The previous plan is kept on error.
    pub fn retarget(&mut self, goal: CellCoord) -> Result<(), MazeError> {
        let position = self.position();
        let (field, path) = self.finder.shortest_path(&self.grid, position, goal)?;
        debug!(
            position = %position,
            goal = %goal,
            steps = path.steps(),
            "planned route to new goal"
        );
        self.field = field;
        self.path = path;
        Ok(())
    }
}

/// Draws a passable cell other than `exclude` by rejection sampling.
///
/// Columns and rows are drawn as `next_u32() % width` and
/// `next_u32() % height` until the draw lands on an eligible cell. Returns
/// `None` without drawing when no eligible cell exists, which covers empty
/// grids and grids whose only passable cell is excluded.
pub fn random_path_cell<R>(
    grid: &PhysicalGrid,
    rng: &mut R,
    exclude: Option<CellCoord>,
) -> Option<CellCoord>
where
    R: RngCore + ?Sized,
{
    let excluded = exclude.map_or(0, |cell| usize::from(grid.is_path(cell)));
    if grid.path_cell_count() <= excluded {
        return None;
    }

    let (width, height) = grid.dimensions();
    loop {
        let column = rng.next_u32() % width;
        let row = rng.next_u32() % height;
        let cell = CellCoord::new(column, row);
        if grid.is_path(cell) && Some(cell) != exclude {
            return Some(cell);
        }
    }
}

/// Draws a cell the distance field reaches, other than `exclude`.
///
/// Sampling follows [`random_path_cell`] over the field's dimensions. Returns
/// `None` without drawing when no eligible cell exists.
pub fn random_reachable_cell<R>(
    field: &DistanceField,
    rng: &mut R,
    exclude: Option<CellCoord>,
) -> Option<CellCoord>
where
    R: RngCore + ?Sized,
{
    let excluded = exclude.map_or(0, |cell| usize::from(field.is_reachable(cell)));
    if field.reachable_count() <= excluded {
        return None;
    }

    let (width, height) = (field.width(), field.height());
    loop {
        let column = rng.next_u32() % width;
        let row = rng.next_u32() % height;
        let cell = CellCoord::new(column, row);
        if field.is_reachable(cell) && Some(cell) != exclude {
            return Some(cell);
        }
    }
}

fn ensure_passable(grid: &PhysicalGrid, cell: CellCoord) -> Result<(), MazeError> {
    let (width, height) = grid.dimensions();
    if !cell.is_within(width, height) {
        return Err(MazeError::OutOfBounds {
            cell,
            width,
            height,
        });
    }
    if !grid.is_path(cell) {
        return Err(MazeError::NotPassable { cell });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_trail_system_random::XorShift32;

    fn grid(rows: &[&str]) -> PhysicalGrid {
        PhysicalGrid::from_rows(rows).expect("rectangular rows")
    }

    fn rng() -> XorShift32 {
        XorShift32::new(2024).expect("non-zero seed")
    }

    #[test]
    fn steps_follow_the_path_then_retarget() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(2, 0);
        let mut navigator = Navigator::new(grid(&["..."]), start, goal).expect("connected cells");
        let mut rng = rng();

        assert_eq!(
            navigator.advance(&mut rng),
            Ok(Advance::Stepped {
                from: start,
                to: CellCoord::new(1, 0)
            })
        );
        assert_eq!(
            navigator.advance(&mut rng),
            Ok(Advance::Stepped {
                from: CellCoord::new(1, 0),
                to: goal
            })
        );
        assert_eq!(navigator.path().len(), 1);

        let outcome = navigator.advance(&mut rng).expect("retarget succeeds");
        let Advance::Retargeted { goal: next_goal } = outcome else {
            panic!("expected retarget, got {outcome:?}");
        };
        assert_ne!(next_goal, goal);
        assert_eq!(navigator.position(), goal);
        assert_eq!(navigator.goal(), next_goal);
        assert_eq!(navigator.goals_reached(), 1);
        assert_eq!(navigator.path().goal(), next_goal);
    }

    #[test]
    fn single_cell_maze_stays_idle() {
        let only = CellCoord::new(0, 0);
        let mut navigator = Navigator::new(grid(&["##", ".#"]), only, only).expect("passable cell");
        let mut rng = rng();

        for _ in 0..16 {
            assert_eq!(navigator.advance(&mut rng), Ok(Advance::Idle));
        }
        assert_eq!(navigator.position(), only);
        assert_eq!(navigator.goal(), only);
        assert_eq!(navigator.goals_reached(), 0);
    }

    #[test]
    fn random_path_cell_handles_degenerate_grids() {
        let mut rng = rng();
        let walls = PhysicalGrid::walls(3, 3).expect("valid dimensions");
        assert_eq!(random_path_cell(&walls, &mut rng, None), None);

        let lone = grid(&["#.#"]);
        let cell = CellCoord::new(1, 0);
        assert_eq!(random_path_cell(&lone, &mut rng, None), Some(cell));
        assert_eq!(random_path_cell(&lone, &mut rng, Some(cell)), None);
    }

    #[test]
    fn random_path_cell_never_returns_excluded_or_walls() {
        let mut rng = rng();
        let maze = grid(&[".#.", "#.#", ".#."]);
        let exclude = CellCoord::new(1, 1);
        for _ in 0..64 {
            let cell = random_path_cell(&maze, &mut rng, Some(exclude)).expect("cells remain");
            assert!(maze.is_path(cell));
            assert_ne!(cell, exclude);
        }
    }

    #[test]
    fn spawn_separates_position_and_goal() {
        let mut rng = rng();
        let navigator = Navigator::spawn(grid(&["....", "...."]), &mut rng).expect("open grid");
        assert_ne!(navigator.position(), navigator.goal());
        assert_eq!(
            navigator.path().len() as u32,
            navigator
                .field()
                .distance(navigator.position())
                .expect("position reaches goal")
                + 1
        );
    }

    #[test]
    fn walls_are_rejected_as_endpoints() {
        let maze = grid(&[".#"]);
        assert_eq!(
            Navigator::new(maze.clone(), CellCoord::new(1, 0), CellCoord::new(0, 0)).err(),
            Some(MazeError::NotPassable {
                cell: CellCoord::new(1, 0)
            })
        );
        assert_eq!(
            Navigator::new(maze, CellCoord::new(0, 0), CellCoord::new(1, 0)).err(),
            Some(MazeError::NotPassable {
                cell: CellCoord::new(1, 0)
            })
        );
    }

    #[test]
    fn failed_retarget_keeps_previous_plan() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(1, 0);
        let mut navigator = Navigator::new(grid(&["..#."]), start, goal).expect("connected cells");

        assert_eq!(
            navigator.retarget(CellCoord::new(3, 0)),
            Err(MazeError::Unreachable {
                start,
                goal: CellCoord::new(3, 0)
            })
        );
        assert_eq!(navigator.goal(), goal);
        assert_eq!(navigator.path().len(), 2);
    }

    #[test]
    fn isolated_cells_are_never_chosen_as_goals() {
        // The bottom-right cell is cut off from the rest of the grid.
        let maze = grid(&["...#", "...#", "..#."]);
        let isolated = CellCoord::new(3, 0);
        let start = CellCoord::new(0, 0);
        let mut navigator = Navigator::new(maze, start, start).expect("passable cell");
        let mut rng = rng();
        let mut retargets = 0;

        for _ in 0..500 {
            match navigator.advance(&mut rng).expect("goals are always connected") {
                Advance::Retargeted { goal } => {
                    retargets += 1;
                    assert_ne!(goal, isolated);
                }
                Advance::Stepped { to, .. } => assert_ne!(to, isolated),
                Advance::Idle => panic!("connected cells remain"),
            }
        }
        assert_eq!(navigator.goals_reached(), retargets);
    }

    #[test]
    fn agent_on_an_isolated_cell_idles() {
        let maze = grid(&["...#", "...#", "..#."]);
        let isolated = CellCoord::new(3, 0);
        let mut navigator = Navigator::new(maze, isolated, isolated).expect("passable cell");
        let mut rng = rng();
        let state = rng.state();

        for _ in 0..8 {
            assert_eq!(navigator.advance(&mut rng), Ok(Advance::Idle));
        }
        assert_eq!(rng.state(), state);
        assert_eq!(navigator.goals_reached(), 0);
    }

    #[test]
    fn spawn_goal_is_connected_to_position() {
        let maze = grid(&["...#", "...#", "..#."]);
        for seed in 1..=40 {
            let mut rng = XorShift32::new(seed).expect("non-zero seed");
            let navigator = Navigator::spawn(maze.clone(), &mut rng).expect("grid has open cells");
            assert_eq!(
                navigator.remaining_steps() as u32,
                navigator
                    .field()
                    .distance(navigator.position())
                    .expect("goal reachable from spawn")
            );
        }
    }

    #[test]
    fn random_reachable_cell_respects_the_field() {
        let maze = grid(&["...#", "...#", "..#."]);
        let mut finder = PathFinder::new();
        let field = finder
            .compute_distance_field(&maze, CellCoord::new(0, 0))
            .expect("passable goal");
        let mut rng = rng();
        for _ in 0..64 {
            let cell = random_reachable_cell(&field, &mut rng, Some(CellCoord::new(0, 0)))
                .expect("connected cells remain");
            assert!(field.is_reachable(cell));
            assert_ne!(cell, CellCoord::new(0, 0));
        }

        let lone = finder
            .compute_distance_field(&maze, CellCoord::new(3, 0))
            .expect("passable goal");
        assert_eq!(
            random_reachable_cell(&lone, &mut rng, Some(CellCoord::new(3, 0))),
            None
        );
    }

    #[test]
    fn failed_set_goal_leaves_counter_and_plan() {
        let maze = grid(&["...#", "...#", "..#."]);
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(1, 0);
        let mut navigator = Navigator::new(maze, start, goal).expect("connected cells");
        let mut rng = rng();
        assert!(matches!(navigator.advance(&mut rng), Ok(Advance::Stepped { .. })));

        let isolated = CellCoord::new(3, 0);
        assert_eq!(
            navigator.retarget(isolated),
            Err(MazeError::Unreachable {
                start: goal,
                goal: isolated
            })
        );
        assert_eq!(navigator.goal(), goal);
        assert_eq!(navigator.goals_reached(), 0);
        assert!(matches!(
            navigator.advance(&mut rng),
            Ok(Advance::Retargeted { .. })
        ));
        assert_eq!(navigator.goals_reached(), 1);
    }
}

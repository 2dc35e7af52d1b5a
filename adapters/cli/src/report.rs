//! Plain-text summaries of a walked scene.

use std::{collections::HashSet, fmt::Write as _};

use maze_trail_core::{CellCoord, Event};
use maze_trail_world::{query, World};

const WALL: char = '#';
const OPEN: char = ' ';
const ROUTE: char = '.';
const AGENT: char = '@';
const GOAL: char = '*';

/// Counters accumulated from the events of one scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SceneTally {
    pub(crate) steps: u64,
    pub(crate) goals: u64,
    pub(crate) idle: u64,
}

impl SceneTally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentStepped { .. } => self.steps += 1,
                Event::GoalSelected { .. } => self.goals += 1,
                Event::AgentIdle { .. } => self.idle += 1,
                Event::SceneGenerated { .. } => {}
            }
        }
    }
}

/// One-paragraph description of the current scene and how it was walked.
pub(crate) fn summary(world: &World, tally: SceneTally) -> String {
    let logical = query::logical_grid(world);
    let grid = query::physical_grid(world);
    let position = query::position(world);
    let goal = query::goal(world);
    let remaining = query::remaining_steps(world);

    let mut text = String::new();
    let _ = writeln!(
        text,
        "scene {}: {}x{} maze ({}x{} cells, {} open), seed {}",
        query::scene(world),
        logical.width(),
        logical.height(),
        grid.width(),
        grid.height(),
        grid.path_cell_count(),
        query::seed(world),
    );
    let _ = write!(
        text,
        "  {} steps, {} goals selected, {} idle; agent at {position} heading for {goal} ({remaining} away)",
        tally.steps, tally.goals, tally.idle,
    );
    text
}

/// Draws the maze top row first, marking the agent, its goal and the route.
pub(crate) fn draw(world: &World) -> String {
    let grid = query::physical_grid(world);
    let route: HashSet<CellCoord> = query::path(world).iter().collect();
    let position = query::position(world);
    let goal = query::goal(world);
    let (width, height) = grid.dimensions();

    let mut text = String::with_capacity((width as usize + 1) * height as usize);
    for row in (0..height).rev() {
        for column in 0..width {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == position {
                AGENT
            } else if cell == goal {
                GOAL
            } else if route.contains(&cell) {
                ROUTE
            } else if grid.is_path(cell) {
                OPEN
            } else {
                WALL
            };
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Trail engine.
//!
//! This crate defines the vocabulary every system speaks: grid coordinates,
//! the four cardinal directions together with their connectivity bits, the
//! per-cell flag byte stored by the physical maze, and the error surface that
//! generators, path finders and navigators report to their callers.
//!
//! Coordinates use a y-up convention inherited from the maze layout: moving
//! [`Direction::Up`] increases the row index while [`Direction::Down`]
//! decreases it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Replaces the maze with a freshly generated one and respawns the agent.
    GenerateScene,
    /// Moves the agent one cell, or picks a new goal once it stands on the
    /// current one.
    Advance,
    /// Sends the agent toward an explicit goal cell.
    SetGoal {
        /// Passable physical cell the agent should head for.
        goal: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new maze replaced the previous one.
    SceneGenerated {
        /// One-based index of the scene since the world was created.
        scene: u64,
        /// Number of logical node columns.
        width: u32,
        /// Number of logical node rows.
        height: u32,
        /// Number of passable physical cells.
        path_cells: usize,
    },
    /// Confirms that the agent moved between two adjacent cells.
    AgentStepped {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after moving.
        to: CellCoord,
    },
    /// Announces a new goal together with the length of the planned route.
    GoalSelected {
        /// Cell the agent now heads for.
        goal: CellCoord,
        /// Number of moves on the planned route to the goal.
        distance: usize,
    },
    /// Reports that the agent had nowhere to go.
    AgentIdle {
        /// Cell the agent occupies.
        cell: CellCoord,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in `direction` when it stays inside a
    /// `width` by `height` grid.
    #[must_use]
    pub fn step(self, direction: Direction, width: u32, height: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Down => (Some(self.column), self.row.checked_sub(1)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        if column < width && row < height {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }

    /// Reports whether the cell lies inside a `width` by `height` grid.
    #[must_use]
    pub const fn is_within(&self, width: u32, height: u32) -> bool {
        self.column < width && self.row < height
    }

    /// Row-major offset of the cell inside a grid `width` cells wide.
    ///
    /// Returns `None` when the offset does not fit the platform's `usize`.
    #[must_use]
    pub fn index(&self, width: u32) -> Option<usize> {
        let column = usize::try_from(self.column).ok()?;
        let row = usize::try_from(self.row).ok()?;
        let width = usize::try_from(width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal directions connecting neighbouring nodes and cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Order in which every system inspects the neighbours of a cell.
    ///
    /// Generation and path reconstruction both walk this sequence so a given
    /// random stream or distance field always yields the same maze and path.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Connectivity bit associated with the direction.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Up => ConnectionMask::UP,
            Self::Left => ConnectionMask::LEFT,
            Self::Down => ConnectionMask::DOWN,
            Self::Right => ConnectionMask::RIGHT,
        }
    }

    /// Direction pointing back toward the origin of a move.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
        }
    }
}

/// Four-bit set recording which cardinal neighbours a logical node joins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionMask(u8);

impl ConnectionMask {
    /// Node connects to the neighbour above it.
    pub const UP: u8 = 0x01;
    /// Node connects to the neighbour left of it.
    pub const LEFT: u8 = 0x02;
    /// Node connects to the neighbour below it.
    pub const DOWN: u8 = 0x04;
    /// Node connects to the neighbour right of it.
    pub const RIGHT: u8 = 0x08;
    /// Union of every direction bit.
    pub const ALL: u8 = Self::UP | Self::LEFT | Self::DOWN | Self::RIGHT;

    /// Mask with no connections.
    pub const EMPTY: Self = Self(0);

    /// Builds a mask from raw bits, discarding anything outside the four
    /// direction bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Raw direction bits.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Reports whether the mask contains a connection toward `direction`.
    #[must_use]
    pub const fn contains(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Returns a copy of the mask with the connection toward `direction` set.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Number of connections recorded in the mask.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Reports whether the mask records no connection at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Flag byte stored for every physical maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellFlags(u8);

impl CellFlags {
    /// Scratch bit used by traversals that need to remember explored cells.
    pub const VISITED: u8 = 0x10;
    /// Cell is passable.
    pub const PATH: u8 = 0x20;

    /// Impassable cell with no scratch state.
    pub const WALL: Self = Self(0);
    /// Passable cell with no scratch state.
    pub const OPEN: Self = Self(Self::PATH);

    /// Raw flag bits.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Reports whether the cell is passable.
    #[must_use]
    pub const fn is_path(&self) -> bool {
        self.0 & Self::PATH != 0
    }

    /// Reports whether a traversal marked the cell.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.0 & Self::VISITED != 0
    }

    /// Sets the passable bit.
    pub fn set_path(&mut self) {
        self.0 |= Self::PATH;
    }

    /// Sets the traversal scratch bit.
    pub fn set_visited(&mut self) {
        self.0 |= Self::VISITED;
    }

    /// Clears the traversal scratch bit.
    pub fn clear_visited(&mut self) {
        self.0 &= !Self::VISITED;
    }
}

/// Errors reported by maze generation, path finding and navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Maze dimensions were zero or too large to lay out.
    #[error("invalid maze dimensions {width}x{height}")]
    InvalidConfiguration {
        /// Requested number of logical columns.
        width: u32,
        /// Requested number of logical rows.
        height: u32,
    },
    /// The start cell is not connected to the goal the distance field was
    /// built from.
    #[error("cell {start} cannot reach goal {goal}")]
    Unreachable {
        /// Cell the path was requested from.
        start: CellCoord,
        /// Goal the path was requested toward.
        goal: CellCoord,
    },
    /// The random source was seeded with its zero fixed point.
    #[error("random source seed must be non-zero")]
    DegenerateSeed,
    /// A coordinate fell outside the grid it was used with.
    #[error("cell {cell} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Width of the grid.
        width: u32,
        /// Height of the grid.
        height: u32,
    },
    /// A coordinate named a wall where a passable cell was required.
    #[error("cell {cell} is a wall")]
    NotPassable {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// A distance field was queried with a goal other than the one it was
    /// seeded from.
    #[error("distance field leads to {field_goal}, not {requested}")]
    GoalMismatch {
        /// Goal the field was computed for.
        field_goal: CellCoord,
        /// Goal supplied by the caller.
        requested: CellCoord,
    },
}

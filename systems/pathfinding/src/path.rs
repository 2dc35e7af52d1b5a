//! Ordered route from a start cell to a goal cell.

use std::collections::VecDeque;

use maze_trail_core::CellCoord;

/// Shortest route through the physical grid, start first and goal last.
///
/// A path always holds at least one cell. Consuming it from the front walks
/// the route; once only the goal remains the path is exhausted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    head: CellCoord,
    rest: VecDeque<CellCoord>,
}

impl Path {
    /// Single-cell path standing on `cell`.
    #[must_use]
    pub fn at(cell: CellCoord) -> Self {
        Self {
            head: cell,
            rest: VecDeque::new(),
        }
    }

    pub(crate) fn with_capacity(start: CellCoord, capacity: usize) -> Self {
        Self {
            head: start,
            rest: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, cell: CellCoord) {
        self.rest.push_back(cell);
    }

    /// Cell the path currently begins at.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.head
    }

    /// Cell the path ends at.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.rest.back().copied().unwrap_or(self.head)
    }

    /// Number of cells on the path, both endpoints included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Number of moves from the start to the goal.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.rest.len()
    }

    /// Reports whether only the goal cell remains.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.rest.is_empty()
    }

    /// Cells from start to goal.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        std::iter::once(self.head).chain(self.rest.iter().copied())
    }

    /// Drops the start cell and returns the new start.
    ///
    /// Returns `None` and leaves the path untouched once only the goal
    /// remains.
    pub fn advance(&mut self) -> Option<CellCoord> {
        let next = self.rest.pop_front()?;
        self.head = next;
        Some(next)
    }
}

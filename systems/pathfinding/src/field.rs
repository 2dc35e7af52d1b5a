//! Dense hop-count grid seeded from a single goal cell.

use maze_trail_core::CellCoord;

/// Sentinel stored for cells the breadth-first search never reached.
pub const UNREACHED: u32 = u32::MAX;

/// Distance from every physical cell to the goal, walking passable cells.
///
/// The field mirrors the dimensions of the grid it was computed from. Walls
/// and cells cut off from the goal hold [`UNREACHED`] so callers can tell them
/// apart from traversable cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DistanceField {
    width: u32,
    height: u32,
    goal: CellCoord,
    distances: Vec<u32>,
    max_distance: u32,
}

impl DistanceField {
    pub(crate) fn unreached(width: u32, height: u32, goal: CellCoord, cell_count: usize) -> Self {
        Self {
            width,
            height,
            goal,
            distances: vec![UNREACHED; cell_count],
            max_distance: 0,
        }
    }

    /// Width of the field in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Goal cell the distances lead to.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Largest finite distance in the field.
    ///
    /// Presentation layers scale per-cell colouring by this value.
    #[must_use]
    pub const fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Hop count from `cell` to the goal, or `None` for walls, unreachable
    /// cells and coordinates outside the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        let index = self.slot(cell)?;
        match self.distances[index] {
            UNREACHED => None,
            distance => Some(distance),
        }
    }

    /// Reports whether `cell` can reach the goal.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Number of cells connected to the goal, the goal included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHED)
            .count()
    }

    pub(crate) fn assign(&mut self, cell: CellCoord, distance: u32) -> bool {
        let Some(index) = self.slot(cell) else {
            return false;
        };
        if self.distances[index] != UNREACHED {
            return false;
        }
        self.distances[index] = distance;
        self.max_distance = self.max_distance.max(distance);
        true
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        if !cell.is_within(self.width, self.height) {
            return None;
        }
        cell.index(self.width)
    }
}

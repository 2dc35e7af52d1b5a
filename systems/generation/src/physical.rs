//! Doubled wall/path grid produced from a logical maze.

use std::fmt;

use maze_trail_core::{CellCoord, CellFlags, Direction, MazeError};
use rand::RngCore;

use crate::LogicalGrid;

const WALL_GLYPH: char = '#';
const PATH_GLYPH: char = '.';

/// `2*width × 2*height` grid of passable and blocked cells.
///
/// Logical node `(x, y)` owns the 2×2 block anchored at `(2x, 2y)`. The anchor
/// is always passable, `(2x, 2y + 1)` opens when the node connects up and
/// `(2x + 1, 2y)` opens when it connects right.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhysicalGrid {
    width: u32,
    height: u32,
    cells: Vec<CellFlags>,
}

impl PhysicalGrid {
    /// Expands a logical maze into its physical wall grid.
    #[must_use]
    pub fn from_logical(logical: &LogicalGrid) -> Self {
        let width = logical.width() * 2;
        let height = logical.height() * 2;
        let cell_count = logical.node_count() * 4;
        let mut grid = Self {
            width,
            height,
            cells: vec![CellFlags::WALL; cell_count],
        };

        for y in 0..logical.height() {
            for x in 0..logical.width() {
                let node = CellCoord::new(x, y);
                let connections = logical.connections(node).unwrap_or_default();
                let anchor = CellCoord::new(x * 2, y * 2);
                grid.open(anchor);
                if connections.contains(Direction::Up) {
                    grid.open(CellCoord::new(anchor.column(), anchor.row() + 1));
                }
                if connections.contains(Direction::Right) {
                    grid.open(CellCoord::new(anchor.column() + 1, anchor.row()));
                }
            }
        }

        grid
    }

    /// Parses a grid drawn with `#` for walls and `.` for paths.
    ///
    /// Rows are listed top to bottom, matching the [`fmt::Display`] output, so
    /// the first row holds the highest row index.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when there are no rows, the
    /// rows are empty, or the rows differ in length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let height = u32::try_from(rows.len()).unwrap_or(0);
        let width = rows
            .first()
            .map_or(0, |row| u32::try_from(row.as_ref().chars().count()).unwrap_or(0));
        let invalid = MazeError::InvalidConfiguration { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }

        let mut cells = Vec::with_capacity(rows.len() * width as usize);
        for row in rows.iter().rev() {
            let line = row.as_ref();
            if line.chars().count() != width as usize {
                return Err(invalid);
            }
            cells.extend(line.chars().map(|glyph| {
                if glyph == WALL_GLYPH {
                    CellFlags::WALL
                } else {
                    CellFlags::OPEN
                }
            }));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid in which every cell is a wall.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when either dimension is
    /// zero or the grid is too large to address.
    pub fn walls(width: u32, height: u32) -> Result<Self, MazeError> {
        let cell_count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|count| *count > 0)
            .ok_or(MazeError::InvalidConfiguration { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![CellFlags::WALL; cell_count],
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Provides the `(width, height)` pair of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Dense cell flags stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellFlags] {
        &self.cells
    }

    /// Flags stored for `cell`, or `None` outside the grid.
    #[must_use]
    pub fn flags(&self, cell: CellCoord) -> Option<CellFlags> {
        self.slot(cell).map(|index| self.cells[index])
    }

    /// Reports whether `cell` is inside the grid and passable.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.flags(cell).is_some_and(|flags| flags.is_path())
    }

    /// Reports whether `cell` carries the traversal scratch mark.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.flags(cell).is_some_and(|flags| flags.is_visited())
    }

    /// Makes `cell` passable.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] when `cell` lies outside the grid.
    pub fn set_path(&mut self, cell: CellCoord) -> Result<(), MazeError> {
        let index = self.slot(cell).ok_or(MazeError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })?;
        self.cells[index].set_path();
        Ok(())
    }

    /// Number of passable cells.
    #[must_use]
    pub fn path_cell_count(&self) -> usize {
        self.cells.iter().filter(|flags| flags.is_path()).count()
    }

    /// Passable cells in row-major order.
    pub fn path_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, flags)| flags.is_path())
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % width, index / width))
            })
    }

    /// Passable neighbours of `cell`, in scan order.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::SCAN_ORDER
            .into_iter()
            .filter_map(move |direction| cell.step(direction, self.width, self.height))
            .filter(move |neighbor| self.is_path(*neighbor))
    }

    /// Opens walls at random: a wall is made passable when the next draw is
    /// divisible by `rate` and it already touches a passable cell.
    ///
    /// One value is drawn per cell in row-major order, whether or not the cell
    /// is already passable. Cells opened earlier in the pass count as
    /// passable neighbours, so a connected grid stays connected. Returns the
    /// number of walls that were opened.
    pub fn mutate<R>(&mut self, rate: u32, rng: &mut R) -> usize
    where
        R: RngCore + ?Sized,
    {
        if rate == 0 {
            return 0;
        }

        let mut opened = 0;
        for row in 0..self.height {
            for column in 0..self.width {
                let cell = CellCoord::new(column, row);
                if rng.next_u32() % rate != 0 || self.is_path(cell) {
                    continue;
                }
                if self.open_neighbors(cell).next().is_some() {
                    self.open(cell);
                    opened += 1;
                }
            }
        }
        opened
    }

    /// Counts the passable cells reachable from `from`.
    ///
    /// Uses the per-cell visited bit as scratch space; every mark is cleared
    /// again before returning. A wall or out-of-bounds start reaches nothing.
    pub fn flood_fill(&mut self, from: CellCoord) -> usize {
        self.clear_visited();
        let Some(start) = self.slot(from) else {
            return 0;
        };
        if !self.cells[start].is_path() {
            return 0;
        }

        self.cells[start].set_visited();
        let mut stack = vec![from];
        let mut reached = 0;

        while let Some(cell) = stack.pop() {
            reached += 1;
            for direction in Direction::SCAN_ORDER {
                let Some(neighbor) = cell.step(direction, self.width, self.height) else {
                    continue;
                };
                let Some(index) = self.slot(neighbor) else {
                    continue;
                };
                let flags = &mut self.cells[index];
                if flags.is_path() && !flags.is_visited() {
                    flags.set_visited();
                    stack.push(neighbor);
                }
            }
        }

        self.clear_visited();
        reached
    }

    /// Reports whether every passable cell can reach every other one.
    pub fn is_connected(&mut self) -> bool {
        let Some(first) = self.path_cells().next() else {
            return true;
        };
        self.flood_fill(first) == self.path_cell_count()
    }

    /// Removes every traversal scratch mark.
    pub fn clear_visited(&mut self) {
        for flags in &mut self.cells {
            flags.clear_visited();
        }
    }

    fn open(&mut self, cell: CellCoord) {
        if let Some(index) = self.slot(cell) {
            self.cells[index].set_path();
        }
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        if !cell.is_within(self.width, self.height) {
            return None;
        }
        cell.index(self.width)
    }
}

impl fmt::Display for PhysicalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height).rev() {
            for column in 0..self.width {
                let glyph = if self.is_path(CellCoord::new(column, row)) {
                    PATH_GLYPH
                } else {
                    WALL_GLYPH
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Ensures the logical dimensions can be doubled and addressed.
pub(crate) fn physical_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    Some((width.checked_mul(2)?, height.checked_mul(2)?))
}

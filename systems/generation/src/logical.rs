//! Undoubled node grid on which the spanning tree is carved.

use std::collections::VecDeque;

use maze_trail_core::{CellCoord, ConnectionMask, Direction, MazeError};

use crate::checked_dimensions;

/// Per-node byte: four connection bits plus a generation scratch bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
struct NodeFlags(u8);

impl NodeFlags {
    const VISITED: u8 = 0x10;

    const fn connections(self) -> ConnectionMask {
        ConnectionMask::from_bits(self.0)
    }

    const fn is_visited(self) -> bool {
        self.0 & Self::VISITED != 0
    }
}

/// `width × height` nodes recording which cardinal neighbours each joins.
///
/// Freshly generated grids form a spanning tree: every node is reachable
/// from every other and there are exactly `width * height - 1` connections.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogicalGrid {
    width: u32,
    height: u32,
    nodes: Vec<NodeFlags>,
}

impl LogicalGrid {
    /// Creates a grid of isolated nodes.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when either dimension is
    /// zero or the doubled physical grid would not fit in memory addressing.
    pub fn new(width: u32, height: u32) -> Result<Self, MazeError> {
        let node_count = checked_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            nodes: vec![NodeFlags::default(); node_count],
        })
    }

    /// Number of node columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of node rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node the carver starts from.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.width / 2, self.height / 2)
    }

    /// Connections recorded for `node`, or `None` outside the grid.
    #[must_use]
    pub fn connections(&self, node: CellCoord) -> Option<ConnectionMask> {
        self.slot(node).map(|index| self.nodes[index].connections())
    }

    /// Neighbours `node` is connected to, in scan order.
    pub fn linked_neighbors(&self, node: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let mask = self.connections(node).unwrap_or_default();
        Direction::SCAN_ORDER
            .into_iter()
            .filter(move |direction| mask.contains(*direction))
            .filter_map(move |direction| node.step(direction, self.width, self.height))
    }

    /// Number of undirected connections.
    ///
    /// Each connection is counted once, from the node below or left of it.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| {
                let mask = node.connections();
                usize::from(mask.contains(Direction::Up)) + usize::from(mask.contains(Direction::Right))
            })
            .sum()
    }

    /// Reports whether the connections form a spanning tree.
    ///
    /// Checks that every connection is mirrored by its neighbour, that no
    /// connection leaves the grid, that there are `node_count - 1` edges, and
    /// that every node is reachable from the centre.
    #[must_use]
    pub fn is_spanning_tree(&self) -> bool {
        if !self.links_are_reciprocal() {
            return false;
        }
        if self.edge_count() + 1 != self.node_count() {
            return false;
        }

        let mut seen = vec![false; self.node_count()];
        let mut queue = VecDeque::new();
        let start = self.center();
        let Some(start_index) = self.slot(start) else {
            return false;
        };
        seen[start_index] = true;
        queue.push_back(start);
        let mut reached = 1;

        while let Some(node) = queue.pop_front() {
            for neighbor in self.linked_neighbors(node) {
                let Some(index) = self.slot(neighbor) else {
                    continue;
                };
                if seen[index] {
                    continue;
                }
                seen[index] = true;
                reached += 1;
                queue.push_back(neighbor);
            }
        }

        reached == self.node_count()
    }

    fn links_are_reciprocal(&self) -> bool {
        (0..self.height).all(|row| {
            (0..self.width).all(|column| {
                let node = CellCoord::new(column, row);
                let mask = self.connections(node).unwrap_or_default();
                Direction::SCAN_ORDER
                    .into_iter()
                    .filter(|direction| mask.contains(*direction))
                    .all(|direction| match node.step(direction, self.width, self.height) {
                        Some(neighbor) => self
                            .connections(neighbor)
                            .is_some_and(|other| other.contains(direction.opposite())),
                        None => false,
                    })
            })
        })
    }

    pub(crate) fn connect(&mut self, from: CellCoord, direction: Direction, to: CellCoord) {
        if let Some(index) = self.slot(from) {
            self.nodes[index].0 |= direction.bit();
        }
        if let Some(index) = self.slot(to) {
            self.nodes[index].0 |= direction.opposite().bit();
        }
    }

    pub(crate) fn mark_visited(&mut self, node: CellCoord) {
        if let Some(index) = self.slot(node) {
            self.nodes[index].0 |= NodeFlags::VISITED;
        }
    }

    pub(crate) fn is_visited(&self, node: CellCoord) -> bool {
        self.slot(node)
            .map_or(true, |index| self.nodes[index].is_visited())
    }

    pub(crate) fn clear_visited(&mut self) {
        for node in &mut self.nodes {
            node.0 &= !NodeFlags::VISITED;
        }
    }

    fn slot(&self, node: CellCoord) -> Option<usize> {
        if !node.is_within(self.width, self.height) {
            return None;
        }
        node.index(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_grid_has_no_edges() {
        let grid = LogicalGrid::new(3, 2).expect("valid dimensions");
        assert_eq!(grid.node_count(), 6);
        assert_eq!(grid.edge_count(), 0);
        assert!(!grid.is_spanning_tree());
    }

    #[test]
    fn connect_sets_reciprocal_bits() {
        let mut grid = LogicalGrid::new(2, 1).expect("valid dimensions");
        let left = CellCoord::new(0, 0);
        let right = CellCoord::new(1, 0);
        grid.connect(left, Direction::Right, right);

        assert_eq!(
            grid.connections(left),
            Some(ConnectionMask::EMPTY.with(Direction::Right))
        );
        assert_eq!(
            grid.connections(right),
            Some(ConnectionMask::EMPTY.with(Direction::Left))
        );
        assert_eq!(grid.edge_count(), 1);
        assert!(grid.is_spanning_tree());
    }

    #[test]
    fn cycle_is_not_a_spanning_tree() {
        let mut grid = LogicalGrid::new(2, 2).expect("valid dimensions");
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(1, 0);
        let c = CellCoord::new(1, 1);
        let d = CellCoord::new(0, 1);
        grid.connect(a, Direction::Right, b);
        grid.connect(b, Direction::Up, c);
        grid.connect(c, Direction::Left, d);
        assert!(grid.is_spanning_tree());

        grid.connect(d, Direction::Down, a);
        assert_eq!(grid.edge_count(), 4);
        assert!(!grid.is_spanning_tree());
    }

    #[test]
    fn visited_marks_do_not_leak_into_connections() {
        let mut grid = LogicalGrid::new(1, 1).expect("valid dimensions");
        let node = CellCoord::new(0, 0);
        grid.mark_visited(node);
        assert!(grid.is_visited(node));
        assert!(grid.connections(node).is_some_and(|mask| mask.is_empty()));

        grid.clear_visited();
        assert!(!grid.is_visited(node));
    }

    #[test]
    fn out_of_bounds_nodes_count_as_visited() {
        let grid = LogicalGrid::new(2, 2).expect("valid dimensions");
        assert!(grid.is_visited(CellCoord::new(2, 0)));
        assert_eq!(grid.connections(CellCoord::new(0, 2)), None);
    }
}

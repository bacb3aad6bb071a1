#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cell graph backing circular maze generation.
//!
//! The grid arranges cells in concentric rings whose sizes come from a
//! [`RingTopology`]. Every cell owns two wall flags: the wall towards its
//! clockwise neighbour and the wall towards its outward neighbour. The
//! counter-clockwise and inward walls of a cell are read from the neighbour
//! that owns them, so each wall exists exactly once.

mod topology;

pub use topology::{RingTopology, MAX_CELLS, REFINED_MIN_CELLS};

use phage_maze_core::{CellAddress, Direction, Neighbor};

/// Wall and visit state of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    visited: bool,
    wall_clockwise: bool,
    wall_outward: bool,
}

impl Cell {
    const fn sealed() -> Self {
        Self {
            visited: false,
            wall_clockwise: true,
            wall_outward: true,
        }
    }

    /// Whether carving already reached the cell.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }

    /// Whether the wall towards the clockwise neighbour stands.
    #[must_use]
    pub const fn wall_clockwise(&self) -> bool {
        self.wall_clockwise
    }

    /// Whether the wall towards the outward neighbour (or the exterior for
    /// the outermost ring) stands.
    #[must_use]
    pub const fn wall_outward(&self) -> bool {
        self.wall_outward
    }
}

/// Authoritative cell storage for one maze generation run.
#[derive(Clone, Debug)]
pub struct MazeGrid {
    topology: RingTopology,
    ring_offsets: Vec<usize>,
    cells: Vec<Cell>,
    inward: Vec<Vec<u32>>,
}

impl MazeGrid {
    /// Creates a grid with every wall standing and no cell visited.
    #[must_use]
    pub fn new(topology: RingTopology) -> Self {
        let mut ring_offsets = Vec::with_capacity(topology.cell_counts().len());
        let mut total = 0usize;
        for &count in topology.cell_counts() {
            ring_offsets.push(total);
            total += count as usize;
        }

        let mut inward = vec![Vec::new(); total];
        for ring in 0..topology.ring_count() {
            let Some(outer_offset) = ring_offsets.get(ring as usize + 1).copied() else {
                continue;
            };
            for index in 0..topology.cell_count(ring).unwrap_or(0) {
                if let Some(outer) = topology.outward_index(ring, index) {
                    inward[outer_offset + outer as usize].push(index);
                }
            }
        }

        tracing::debug!(
            rings = topology.ring_count(),
            cells = total,
            "initialised maze grid"
        );

        Self {
            topology,
            ring_offsets,
            cells: vec![Cell::sealed(); total],
            inward,
        }
    }

    /// Ring layout the grid was built from.
    #[must_use]
    pub const fn topology(&self) -> &RingTopology {
        &self.topology
    }

    /// Number of cells across all rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the address names a cell of this grid.
    #[must_use]
    pub fn contains(&self, address: CellAddress) -> bool {
        self.slot(address).is_some()
    }

    /// Retrieves the state of a cell.
    #[must_use]
    pub fn cell(&self, address: CellAddress) -> Option<&Cell> {
        self.slot(address).map(|slot| &self.cells[slot])
    }

    /// Iterates over every cell ring by ring, in index order.
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &Cell)> + '_ {
        self.addresses().zip(self.cells.iter())
    }

    /// Iterates over every address ring by ring, in index order.
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.topology
            .cell_counts()
            .iter()
            .enumerate()
            .flat_map(|(ring, &count)| (0..count).map(move |index| CellAddress::new(ring as u32, index)))
    }

    /// All neighbours of a cell in clockwise, counter-clockwise, outward,
    /// inward order.
    ///
    /// Radial neighbours are reciprocal: the inward neighbours of a cell are
    /// exactly the inner cells whose outward index lands on it.
    #[must_use]
    pub fn neighbors(&self, address: CellAddress) -> Vec<Neighbor> {
        let Some(slot) = self.slot(address) else {
            return Vec::new();
        };
        let ring = address.ring();
        let index = address.index();
        let count = self.topology.cell_count(ring).unwrap_or(0);

        let mut neighbors = Vec::with_capacity(4);
        neighbors.push(Neighbor::new(
            CellAddress::new(ring, (index + 1) % count),
            Direction::Clockwise,
        ));
        neighbors.push(Neighbor::new(
            CellAddress::new(ring, (index + count - 1) % count),
            Direction::CounterClockwise,
        ));
        if let Some(outer) = self.topology.outward_index(ring, index) {
            neighbors.push(Neighbor::new(
                CellAddress::new(ring + 1, outer),
                Direction::Outward,
            ));
        }
        if ring > 0 {
            neighbors.extend(
                self.inward[slot]
                    .iter()
                    .map(|&inner| Neighbor::new(CellAddress::new(ring - 1, inner), Direction::Inward)),
            );
        }
        neighbors
    }

    /// Neighbours that carving has not reached yet.
    #[must_use]
    pub fn unvisited_neighbors(&self, address: CellAddress) -> Vec<Neighbor> {
        let mut neighbors = self.neighbors(address);
        neighbors.retain(|neighbor| {
            self.cell(neighbor.cell)
                .is_some_and(|cell| !cell.visited)
        });
        neighbors
    }

    /// Neighbours reachable through an open wall.
    #[must_use]
    pub fn passages(&self, address: CellAddress) -> Vec<Neighbor> {
        let mut neighbors = self.neighbors(address);
        neighbors.retain(|neighbor| !self.wall_between(address, *neighbor));
        neighbors
    }

    /// Reports whether the wall separating `address` from `neighbor` stands.
    ///
    /// Unknown addresses are treated as walled off.
    #[must_use]
    pub fn wall_between(&self, address: CellAddress, neighbor: Neighbor) -> bool {
        let (owner, clockwise) = wall_owner(address, neighbor);
        self.cell(owner).map_or(true, |cell| {
            if clockwise {
                cell.wall_clockwise
            } else {
                cell.wall_outward
            }
        })
    }

    /// Marks a cell as reached by carving.
    pub fn mark_visited(&mut self, address: CellAddress) {
        if let Some(slot) = self.slot(address) {
            self.cells[slot].visited = true;
        }
    }

    /// Removes the wall separating `address` from `neighbor`.
    ///
    /// Outward and clockwise moves clear the flag on the originating cell;
    /// inward and counter-clockwise moves clear it on the target.
    pub fn remove_wall(&mut self, address: CellAddress, neighbor: Neighbor) {
        let (owner, clockwise) = wall_owner(address, neighbor);
        if let Some(slot) = self.slot(owner) {
            let cell = &mut self.cells[slot];
            if clockwise {
                cell.wall_clockwise = false;
            } else {
                cell.wall_outward = false;
            }
        }
    }

    /// Opens the outward wall of a cell regardless of carving state.
    pub fn open_outward(&mut self, address: CellAddress) {
        if let Some(slot) = self.slot(address) {
            self.cells[slot].wall_outward = false;
        }
    }

    fn slot(&self, address: CellAddress) -> Option<usize> {
        let offset = *self.ring_offsets.get(address.ring() as usize)?;
        let count = self.topology.cell_count(address.ring())?;
        (address.index() < count).then(|| offset + address.index() as usize)
    }
}

fn wall_owner(address: CellAddress, neighbor: Neighbor) -> (CellAddress, bool) {
    match neighbor.direction {
        Direction::Clockwise => (address, true),
        Direction::CounterClockwise => (neighbor.cell, true),
        Direction::Outward => (address, false),
        Direction::Inward => (neighbor.cell, false),
    }
}

/// Read-only analyses of a grid.
pub mod query {
    use std::collections::VecDeque;

    use phage_maze_core::CellAddress;

    use super::MazeGrid;

    /// Number of open walls between two cells of the grid.
    ///
    /// Entrances on the outermost ring lead outside and are not counted.
    #[must_use]
    pub fn open_connection_count(grid: &MazeGrid) -> usize {
        let outermost = grid.topology().outermost_ring();
        grid.cells()
            .map(|(address, cell)| {
                let clockwise = usize::from(!cell.wall_clockwise());
                let outward =
                    usize::from(!cell.wall_outward() && Some(address.ring()) != outermost);
                clockwise + outward
            })
            .sum()
    }

    /// Number of cells reachable from `start` through open walls, `start`
    /// included.
    #[must_use]
    pub fn reachable_count(grid: &MazeGrid, start: CellAddress) -> usize {
        let Some(start_slot) = grid.slot(start) else {
            return 0;
        };

        let mut seen = vec![false; grid.len()];
        seen[start_slot] = true;
        let mut queue = VecDeque::from([start]);
        let mut reached = 0;

        while let Some(address) = queue.pop_front() {
            reached += 1;
            for neighbor in grid.passages(address) {
                if let Some(slot) = grid.slot(neighbor.cell) {
                    if !seen[slot] {
                        seen[slot] = true;
                        queue.push_back(neighbor.cell);
                    }
                }
            }
        }

        reached
    }

    /// Cells of the outermost ring whose outward wall is open.
    #[must_use]
    pub fn entrance_cells(grid: &MazeGrid) -> Vec<CellAddress> {
        let Some(outermost) = grid.topology().outermost_ring() else {
            return Vec::new();
        };
        grid.cells()
            .filter(|(address, cell)| address.ring() == outermost && !cell.wall_outward())
            .map(|(address, _)| address)
            .collect()
    }

    /// Reports whether every cell has been visited.
    #[must_use]
    pub fn fully_visited(grid: &MazeGrid) -> bool {
        grid.cells().all(|(_, cell)| cell.visited())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phage_maze_core::{ResolvedSizing, TopologyVariant};

    fn grid(variant: TopologyVariant, rings: u32) -> MazeGrid {
        MazeGrid::new(RingTopology::build(
            variant,
            ResolvedSizing {
                center_radius: 1.5,
                ring_width: 1.0,
            },
            rings,
        ))
    }

    #[test]
    fn new_grid_is_sealed_and_unvisited() {
        let grid = grid(TopologyVariant::Refined, 3);
        assert_eq!(grid.len(), 57);
        assert!(grid
            .cells()
            .all(|(_, cell)| cell.wall_clockwise() && cell.wall_outward() && !cell.visited()));
        assert_eq!(query::open_connection_count(&grid), 0);
    }

    #[test]
    fn circumferential_neighbours_wrap() {
        let grid = grid(TopologyVariant::Refined, 1);
        let neighbors = grid.neighbors(CellAddress::new(0, 0));
        assert_eq!(
            neighbors,
            vec![
                Neighbor::new(CellAddress::new(0, 1), Direction::Clockwise),
                Neighbor::new(CellAddress::new(0, 12), Direction::CounterClockwise),
            ]
        );
    }

    #[test]
    fn innermost_ring_has_no_inward_and_outermost_no_outward() {
        let grid = grid(TopologyVariant::Refined, 2);
        assert!(grid
            .neighbors(CellAddress::new(0, 3))
            .iter()
            .all(|neighbor| neighbor.direction != Direction::Inward));
        assert!(grid
            .neighbors(CellAddress::new(1, 3))
            .iter()
            .all(|neighbor| neighbor.direction != Direction::Outward));
    }

    #[test]
    fn radial_neighbours_are_reciprocal() {
        for variant in [TopologyVariant::Refined, TopologyVariant::Classic] {
            let grid = grid(variant, 5);
            for address in grid.addresses() {
                for neighbor in grid.neighbors(address) {
                    if neighbor.direction.is_radial() {
                        let back = grid.neighbors(neighbor.cell);
                        assert!(
                            back.contains(&Neighbor::new(address, neighbor.direction.opposite())),
                            "{address:?} -> {neighbor:?} has no reverse link",
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn removing_walls_follows_ownership_rules() {
        let mut grid = grid(TopologyVariant::Refined, 2);
        let origin = CellAddress::new(0, 0);

        let ccw = Neighbor::new(CellAddress::new(0, 12), Direction::CounterClockwise);
        grid.remove_wall(origin, ccw);
        assert!(!grid.cell(CellAddress::new(0, 12)).expect("cell").wall_clockwise());
        assert!(grid.cell(origin).expect("cell").wall_clockwise());

        let outer = CellAddress::new(1, 0);
        let inward = grid
            .neighbors(outer)
            .into_iter()
            .find(|neighbor| neighbor.direction == Direction::Inward)
            .expect("ring one cell zero sits above ring zero cell zero");
        grid.remove_wall(outer, inward);
        assert!(!grid.cell(origin).expect("cell").wall_outward());
        assert_eq!(query::open_connection_count(&grid), 2);
        assert!(grid
            .passages(origin)
            .contains(&Neighbor::new(outer, Direction::Outward)));
    }

    #[test]
    fn unvisited_neighbours_skip_visited_cells() {
        let mut grid = grid(TopologyVariant::Refined, 1);
        grid.mark_visited(CellAddress::new(0, 1));
        let unvisited = grid.unvisited_neighbors(CellAddress::new(0, 0));
        assert_eq!(unvisited.len(), 1);
        assert_eq!(unvisited[0].direction, Direction::CounterClockwise);
    }

    #[test]
    fn unknown_addresses_are_ignored() {
        let mut grid = grid(TopologyVariant::Refined, 1);
        let outside = CellAddress::new(0, 99);
        assert!(grid.neighbors(outside).is_empty());
        grid.mark_visited(outside);
        grid.open_outward(CellAddress::new(5, 0));
        assert!(!query::fully_visited(&grid));
        assert_eq!(query::reachable_count(&grid, outside), 0);
    }

    #[test]
    fn entrances_only_count_outermost_ring() {
        let mut grid = grid(TopologyVariant::Refined, 2);
        grid.open_outward(CellAddress::new(1, 4));
        assert_eq!(query::entrance_cells(&grid), vec![CellAddress::new(1, 4)]);
        assert_eq!(query::open_connection_count(&grid), 0);
    }
}

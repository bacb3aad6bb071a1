#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first carving over a circular maze grid.
//!
//! The carver turns a sealed [`MazeGrid`] into a perfect maze: every cell is
//! reachable from every other cell through exactly one path. A curviness
//! probability biases each step towards staying inside the current ring,
//! which produces long winding corridors instead of radial spikes.

use phage_maze_core::{CellAddress, Direction, Neighbor};
use phage_maze_grid::MazeGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness owned by a single generation run.
pub type MazeRng = ChaCha8Rng;

/// Creates the deterministic random source used for a run.
#[must_use]
pub fn seeded_rng(seed: u64) -> MazeRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A single wall removal performed while carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CarveStep {
    /// Cell the step started from.
    pub from: CellAddress,
    /// Newly visited cell.
    pub to: CellAddress,
    /// Direction travelled from `from` to `to`.
    pub direction: Direction,
}

/// Ordered record of a carving run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CarveLog {
    /// Ring-zero cell the walk started from; `None` for an empty grid.
    pub start: Option<CellAddress>,
    /// Steps in the order they were taken.
    pub steps: Vec<CarveStep>,
}

impl CarveLog {
    /// Number of steps that crossed a ring boundary.
    #[must_use]
    pub fn radial_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.direction.is_radial())
            .count()
    }
}

/// Depth-first carver with a configurable circumferential bias.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Carver {
    curviness: f32,
}

impl Carver {
    /// Creates a carver. Curviness is clamped into `[0, 1]`, NaN counts as zero.
    #[must_use]
    pub fn new(curviness: f32) -> Self {
        let curviness = if curviness.is_nan() {
            0.0
        } else {
            curviness.clamp(0.0, 1.0)
        };
        Self { curviness }
    }

    /// Probability of restricting a step to circumferential moves.
    #[must_use]
    pub const fn curviness(&self) -> f32 {
        self.curviness
    }

    /// Carves a spanning tree into `grid` starting from a random ring-zero cell.
    ///
    /// Walls are removed only between a visited cell and an unvisited
    /// neighbour, so the result holds exactly `cells - 1` open connections.
    pub fn carve<R>(&self, grid: &mut MazeGrid, rng: &mut R) -> CarveLog
    where
        R: Rng + ?Sized,
    {
        let Some(first_ring) = grid.topology().cell_count(0).filter(|&count| count > 0) else {
            return CarveLog::default();
        };

        let start = CellAddress::new(0, rng.gen_range(0..first_ring));
        grid.mark_visited(start);

        let mut stack = vec![start];
        let mut steps = Vec::with_capacity(grid.len().saturating_sub(1));

        while let Some(&current) = stack.last() {
            let candidates = grid.unvisited_neighbors(current);
            if candidates.is_empty() {
                let _ = stack.pop();
                continue;
            }

            let next = self.choose(&candidates, rng);
            grid.remove_wall(current, next);
            grid.mark_visited(next.cell);
            stack.push(next.cell);
            steps.push(CarveStep {
                from: current,
                to: next.cell,
                direction: next.direction,
            });
        }

        tracing::debug!(
            cells = grid.len(),
            steps = steps.len(),
            curviness = self.curviness,
            "carved maze"
        );

        CarveLog {
            start: Some(start),
            steps,
        }
    }

    fn choose<R>(&self, candidates: &[Neighbor], rng: &mut R) -> Neighbor
    where
        R: Rng + ?Sized,
    {
        let circumferential: Vec<Neighbor> = candidates
            .iter()
            .copied()
            .filter(|neighbor| neighbor.direction.is_circumferential())
            .collect();

        let pool = if !circumferential.is_empty() && rng.gen_bool(f64::from(self.curviness)) {
            circumferential.as_slice()
        } else {
            candidates
        };

        pool[rng.gen_range(0..pool.len())]
    }
}

/// Opens `count` randomly drawn outermost-ring cells to the exterior.
///
/// Draws are independent so the same cell can be picked more than once.
/// Returns the drawn cells in order; an empty grid yields no entrances.
pub fn carve_entrances<R>(grid: &mut MazeGrid, count: u32, rng: &mut R) -> Vec<CellAddress>
where
    R: Rng + ?Sized,
{
    let Some(ring) = grid.topology().outermost_ring() else {
        return Vec::new();
    };
    let cells = grid.topology().cell_count(ring).unwrap_or(0);
    if cells == 0 {
        return Vec::new();
    }

    let entrances: Vec<CellAddress> = (0..count)
        .map(|_| CellAddress::new(ring, rng.gen_range(0..cells)))
        .collect();
    for &entrance in &entrances {
        grid.open_outward(entrance);
    }

    tracing::debug!(requested = count, ring, "opened entrances");
    entrances
}

#[cfg(test)]
mod tests {
    use super::*;
    use phage_maze_core::{ResolvedSizing, TopologyVariant};
    use phage_maze_grid::{query, RingTopology};

    fn sealed(rings: u32) -> MazeGrid {
        MazeGrid::new(RingTopology::build(
            TopologyVariant::Refined,
            ResolvedSizing {
                center_radius: 1.5,
                ring_width: 1.0,
            },
            rings,
        ))
    }

    #[test]
    fn curviness_is_clamped() {
        assert_eq!(Carver::new(2.0).curviness(), 1.0);
        assert_eq!(Carver::new(-1.0).curviness(), 0.0);
        assert_eq!(Carver::new(f32::NAN).curviness(), 0.0);
        assert_eq!(Carver::new(0.25).curviness(), 0.25);
    }

    fn pick_shares(carver: Carver, candidates: &[Neighbor], draws: usize) -> Vec<f64> {
        let mut rng = seeded_rng(0x5eed_cafe);
        let mut picks = vec![0usize; candidates.len()];
        for _ in 0..draws {
            let choice = carver.choose(candidates, &mut rng);
            let slot = candidates
                .iter()
                .position(|&candidate| candidate == choice)
                .expect("choice comes from the candidates");
            picks[slot] += 1;
        }
        picks
            .into_iter()
            .map(|count| count as f64 / draws as f64)
            .collect()
    }

    fn ring_cell_with_one_outward_exit() -> Vec<Neighbor> {
        let mut grid = sealed(3);
        let cell = CellAddress::new(1, 0);
        for neighbor in grid.neighbors(cell) {
            if neighbor.direction == Direction::Inward {
                grid.mark_visited(neighbor.cell);
            }
        }
        let candidates = grid.unvisited_neighbors(cell);

        let circumferential = candidates
            .iter()
            .filter(|neighbor| neighbor.direction.is_circumferential())
            .count();
        assert_eq!(circumferential, 2);
        assert_eq!(candidates.len(), 3);
        assert!(candidates
            .iter()
            .any(|neighbor| neighbor.direction == Direction::Outward));
        candidates
    }

    #[test]
    fn zero_curviness_weights_every_candidate_equally() {
        let candidates = ring_cell_with_one_outward_exit();
        let shares = pick_shares(Carver::new(0.0), &candidates, 30_000);

        for (candidate, share) in candidates.iter().zip(&shares) {
            assert!(
                (share - 1.0 / 3.0).abs() < 0.02,
                "{:?} picked with share {share}",
                candidate.direction
            );
        }
    }

    #[test]
    fn curviness_shifts_weight_onto_ring_neighbours() {
        let candidates = ring_cell_with_one_outward_exit();
        let outward = candidates
            .iter()
            .position(|neighbor| neighbor.direction == Direction::Outward)
            .expect("outward candidate");

        let half = pick_shares(Carver::new(0.5), &candidates, 30_000);
        assert!((half[outward] - 1.0 / 6.0).abs() < 0.02, "{}", half[outward]);

        let full = pick_shares(Carver::new(1.0), &candidates, 30_000);
        assert_eq!(full[outward], 0.0);
    }

    #[test]
    fn carving_visits_every_cell_once() {
        let mut grid = sealed(4);
        let log = Carver::new(0.5).carve(&mut grid, &mut seeded_rng(7));

        assert_eq!(log.steps.len(), grid.len() - 1);
        assert!(query::fully_visited(&grid));
        assert_eq!(log.start.map(|start| start.ring()), Some(0));
    }

    #[test]
    fn carving_an_empty_grid_is_a_no_op() {
        let mut grid = sealed(0);
        let log = Carver::new(0.5).carve(&mut grid, &mut seeded_rng(7));
        assert_eq!(log, CarveLog::default());
    }

    #[test]
    fn entrances_open_outermost_walls() {
        let mut grid = sealed(3);
        let entrances = carve_entrances(&mut grid, 4, &mut seeded_rng(3));

        assert_eq!(entrances.len(), 4);
        assert!(entrances.iter().all(|entrance| entrance.ring() == 2));
        for entrance in &entrances {
            assert!(!grid.cell(*entrance).expect("entrance exists").wall_outward());
        }
        let mut distinct = entrances.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(query::entrance_cells(&grid), distinct);
    }

    #[test]
    fn entrances_on_empty_grid_are_empty() {
        let mut grid = sealed(0);
        assert!(carve_entrances(&mut grid, 4, &mut seeded_rng(3)).is_empty());
    }
}

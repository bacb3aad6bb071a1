#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-shot maze generation pipeline.
//!
//! A [`Generator`] validates its [`MazeConfig`] once and then runs the full
//! pipeline synchronously on every [`Generator::generate`] call: build the
//! ring topology, seal every cell, carve a spanning tree, open entrances on
//! the outermost ring and finally emit wall geometry.

use phage_maze_core::{resolve_seed, CellAddress, ConfigError, MazeConfig};
use phage_maze_grid::{MazeGrid, RingTopology};
use phage_maze_system_carving::{carve_entrances, seeded_rng, CarveLog, Carver};
use phage_maze_system_geometry::{GeometryEmitter, MazeGeometry};

/// Everything produced by one generation run.
#[derive(Clone, Debug)]
pub struct GeneratedMaze {
    /// Carved cell graph.
    pub grid: MazeGrid,
    /// Emitted walls, all hidden.
    pub geometry: MazeGeometry,
    /// Ordered carving steps.
    pub carve_log: CarveLog,
    /// Outermost-ring cells opened to the exterior, in draw order.
    pub entrances: Vec<CellAddress>,
    /// Seed actually used; replaying with it reproduces the maze.
    pub seed: u64,
}

/// Validated maze generation pipeline.
#[derive(Clone, Debug)]
pub struct Generator {
    config: MazeConfig,
    topology: RingTopology,
}

impl Generator {
    /// Validates the configuration and prepares the ring topology.
    pub fn new(config: MazeConfig) -> Result<Self, ConfigError> {
        let topology = RingTopology::from_config(&config)?;
        Ok(Self { config, topology })
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub const fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Ring layout shared by every maze this generator produces.
    #[must_use]
    pub const fn topology(&self) -> &RingTopology {
        &self.topology
    }

    /// Generates a maze. A configured seed of zero draws a fresh seed per call.
    #[must_use]
    pub fn generate(&self) -> GeneratedMaze {
        self.generate_with_seed(self.config.seed)
    }

    /// Generates a maze with an explicit seed, ignoring the configured one.
    #[must_use]
    pub fn generate_with_seed(&self, seed: u64) -> GeneratedMaze {
        let seed = resolve_seed(seed);
        let mut rng = seeded_rng(seed);

        let mut grid = MazeGrid::new(self.topology.clone());
        tracing::debug!(
            rings = self.topology.ring_count(),
            cells = grid.len(),
            seed,
            "built ring topology"
        );

        let carve_log = Carver::new(self.config.curviness).carve(&mut grid, &mut rng);
        let entrances = carve_entrances(&mut grid, self.config.entrances, &mut rng);
        let geometry = GeometryEmitter::new(self.config.wall_thickness, self.config.arc_resolution)
            .emit(&grid);

        tracing::info!(
            seed,
            rings = self.topology.ring_count(),
            cells = grid.len(),
            walls = geometry.len(),
            entrances = entrances.len(),
            "generated maze"
        );

        GeneratedMaze {
            grid,
            geometry,
            carve_log,
            entrances,
            seed,
        }
    }
}

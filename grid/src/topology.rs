//! Ring topology builder.

use std::f32::consts::TAU;

use phage_maze_core::{ConfigError, MazeConfig, ResolvedSizing, TopologyVariant};

/// Cell count floor applied by the refined layout.
pub const REFINED_MIN_CELLS: u32 = 4;

/// Largest total number of cells a topology may hold.
pub const MAX_CELLS: usize = 1 << 22;

/// Smallest ring that still forms a cycle with distinct clockwise and
/// counter-clockwise neighbours.
const MIN_CYCLE_CELLS: u32 = 3;

/// Immutable mapping from ring index to cell count and radii.
#[derive(Clone, Debug, PartialEq)]
pub struct RingTopology {
    variant: TopologyVariant,
    center_radius: f32,
    ring_width: f32,
    cell_counts: Vec<u32>,
}

impl RingTopology {
    /// Builds the topology for already validated radii.
    #[must_use]
    pub fn build(variant: TopologyVariant, sizing: ResolvedSizing, rings: u32) -> Self {
        let ResolvedSizing {
            center_radius,
            ring_width,
        } = sizing;

        let cell_counts = (0..rings)
            .map(|ring| raw_cell_count(variant, sizing, ring) as u32)
            .collect();

        Self {
            variant,
            center_radius,
            ring_width,
            cell_counts,
        }
    }

    /// Validates the configuration and builds the matching topology.
    ///
    /// Rings too small to form a cycle are rejected, which can only happen
    /// with the classic layout around very small nuclei. Layouts whose total
    /// exceeds [`MAX_CELLS`] are rejected before any ring is allocated.
    pub fn from_config(config: &MazeConfig) -> Result<Self, ConfigError> {
        let sizing = config.validate()?;

        let mut total = 0.0_f64;
        for ring in 0..config.rings {
            total += f64::from(raw_cell_count(config.variant, sizing, ring));
            if !(total <= MAX_CELLS as f64) {
                return Err(ConfigError::TooManyCells {
                    ring,
                    cells: total,
                    limit: MAX_CELLS,
                });
            }
        }

        let topology = Self::build(config.variant, sizing, config.rings);

        if let Some((ring, &cells)) = topology
            .cell_counts
            .iter()
            .enumerate()
            .find(|(_, &cells)| cells < MIN_CYCLE_CELLS)
        {
            return Err(ConfigError::DegenerateRing {
                ring: ring as u32,
                cells,
            });
        }

        Ok(topology)
    }

    /// Layout variant used to derive counts and radial mappings.
    #[must_use]
    pub const fn variant(&self) -> TopologyVariant {
        self.variant
    }

    /// Number of rings.
    #[must_use]
    pub fn ring_count(&self) -> u32 {
        self.cell_counts.len() as u32
    }

    /// Cell count of every ring, innermost first.
    #[must_use]
    pub fn cell_counts(&self) -> &[u32] {
        &self.cell_counts
    }

    /// Cell count of a single ring.
    #[must_use]
    pub fn cell_count(&self, ring: u32) -> Option<u32> {
        self.cell_counts.get(ring as usize).copied()
    }

    /// Total number of cells across all rings.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cell_counts.iter().map(|&count| count as usize).sum()
    }

    /// Index of the outermost ring, if any ring exists.
    #[must_use]
    pub fn outermost_ring(&self) -> Option<u32> {
        self.ring_count().checked_sub(1)
    }

    /// Radius of the nucleus enclosed by ring zero.
    #[must_use]
    pub const fn center_radius(&self) -> f32 {
        self.center_radius
    }

    /// Radial width shared by all rings.
    #[must_use]
    pub const fn ring_width(&self) -> f32 {
        self.ring_width
    }

    /// Radius of the boundary between `ring` and the ring inside it.
    #[must_use]
    pub fn inner_radius(&self, ring: u32) -> f32 {
        self.center_radius + ring as f32 * self.ring_width
    }

    /// Radius of the boundary between `ring` and the ring outside it.
    #[must_use]
    pub fn outer_radius(&self, ring: u32) -> f32 {
        self.inner_radius(ring) + self.ring_width
    }

    /// Angular span in radians covered by a cell, counter-clockwise from +x.
    #[must_use]
    pub fn angular_span(&self, ring: u32, index: u32) -> Option<(f32, f32)> {
        let count = self.cell_count(ring)?;
        if index >= count {
            return None;
        }
        let step = TAU / count as f32;
        Some((index as f32 * step, (index + 1) as f32 * step))
    }

    /// Index of the cell in the next ring that `index` opens onto.
    ///
    /// Returns `None` for the outermost ring or an out-of-range address.
    #[must_use]
    pub fn outward_index(&self, ring: u32, index: u32) -> Option<u32> {
        let inner = self.cell_count(ring)?;
        let outer = self.cell_count(ring + 1)?;
        if index >= inner {
            return None;
        }

        let mapped = match self.variant {
            TopologyVariant::Refined => {
                let numerator = (2 * u64::from(index) + 1) * u64::from(outer);
                (numerator / (2 * u64::from(inner))) as u32
            }
            TopologyVariant::Classic => {
                let position = index as f32 / inner as f32 * outer as f32;
                position.round_ties_even() as u32
            }
        };

        Some(mapped.min(outer - 1))
    }
}

/// Cell count of a ring before conversion, so callers can bound it first.
fn raw_cell_count(variant: TopologyVariant, sizing: ResolvedSizing, ring: u32) -> f32 {
    let ResolvedSizing {
        center_radius,
        ring_width,
    } = sizing;
    let ring = ring as f32;
    match variant {
        TopologyVariant::Refined => {
            let mid = center_radius + (ring + 0.5) * ring_width;
            (TAU * mid / ring_width)
                .round_ties_even()
                .max(REFINED_MIN_CELLS as f32)
        }
        TopologyVariant::Classic => {
            let inner = center_radius + ring * ring_width;
            (TAU * inner / ring_width).round_ties_even()
        }
    }
}

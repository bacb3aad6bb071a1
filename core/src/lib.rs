#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the phage maze workspace.
//!
//! This crate defines the vocabulary that connects the maze grid, the pure
//! generation systems, and the tail controller. The grid stores cells keyed by
//! [`CellAddress`], systems walk it through [`Neighbor`] values tagged with a
//! [`Direction`], and hosts drive the tail through [`TailCommand`] values while
//! observing the resulting [`TailEvent`] stream.

mod config;
mod tail;

pub use config::{
    ConfigError, MazeConfig, ResolvedSizing, RingSizing, TailConfig, TopologyVariant,
};
pub use tail::{PenetrationEndReason, TailCommand, TailEvent, TailState, TipBody};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Replaces the "draw a fresh seed" sentinel with an actual non-zero seed.
///
/// Non-zero seeds are returned unchanged so the run stays reproducible.
#[must_use]
pub fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    rand::thread_rng().gen_range(1..=u64::MAX)
}

/// Location of a single maze cell expressed as ring and in-ring index.
///
/// Ring zero is the innermost ring. Indices increase counter-clockwise from
/// the positive x axis, so index `i + 1` is the cell across the clockwise wall
/// of cell `i` in the wall-flag convention used by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    ring: u32,
    index: u32,
}

impl CellAddress {
    /// Creates a new cell address.
    #[must_use]
    pub const fn new(ring: u32, index: u32) -> Self {
        Self { ring, index }
    }

    /// Zero-based ring index, counted outward from the nucleus.
    #[must_use]
    pub const fn ring(&self) -> u32 {
        self.ring
    }

    /// Zero-based position of the cell within its ring.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

/// Directions connecting a cell with its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Next cell within the same ring.
    Clockwise,
    /// Previous cell within the same ring.
    CounterClockwise,
    /// Cell in the next ring away from the nucleus.
    Outward,
    /// Cell in the previous ring toward the nucleus.
    Inward,
}

impl Direction {
    /// Reports whether the direction stays within a ring.
    #[must_use]
    pub const fn is_circumferential(self) -> bool {
        matches!(self, Self::Clockwise | Self::CounterClockwise)
    }

    /// Reports whether the direction crosses a ring boundary.
    #[must_use]
    pub const fn is_radial(self) -> bool {
        !self.is_circumferential()
    }

    /// Direction that leads back to the originating cell.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::Outward => Self::Inward,
            Self::Inward => Self::Outward,
        }
    }
}

/// Neighbouring cell paired with the direction used to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighbor {
    /// Address of the neighbouring cell.
    pub cell: CellAddress,
    /// Direction travelled from the originating cell.
    pub direction: Direction,
}

impl Neighbor {
    /// Creates a new neighbour descriptor.
    #[must_use]
    pub const fn new(cell: CellAddress, direction: Direction) -> Self {
        Self { cell, direction }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded placement of maze-bearing cells around a focus point.

use glam::Vec2;
use phage_maze_core::{resolve_seed, ConfigError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Candidate positions tried per cell before giving up on it.
pub const MAX_ATTEMPTS: u32 = 30;

/// Probability that a cell receives an independent vertical scale.
const STRETCH_CHANCE: f64 = 0.7;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of cells to place per spawn pass.
    pub count: u32,
    /// Radius of the disc around the focus point that cells are placed in.
    pub spawn_radius: f32,
    /// Minimum centre-to-centre distance between placed cells.
    pub min_distance: f32,
    /// Inclusive lower and upper bound for cell scales.
    pub scale_range: [f32; 2],
    /// Random seed; zero draws a fresh seed.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 20,
            spawn_radius: 50.0,
            min_distance: 5.0,
            scale_range: [0.8, 1.5],
            seed: 0,
        }
    }
}

impl Config {
    /// Rejects radii, distances and scale bounds the spawner cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_radius >= 0.0) || !self.spawn_radius.is_finite() {
            return Err(ConfigError::InvalidSpawn {
                field: "spawn_radius",
                reason: "must be a finite non-negative number",
            });
        }
        if !(self.min_distance >= 0.0) || !self.min_distance.is_finite() {
            return Err(ConfigError::InvalidSpawn {
                field: "min_distance",
                reason: "must be a finite non-negative number",
            });
        }
        let [low, high] = self.scale_range;
        if !(low > 0.0) || !high.is_finite() || low > high {
            return Err(ConfigError::InvalidSpawn {
                field: "scale_range",
                reason: "bounds must be positive, finite and ordered",
            });
        }
        Ok(())
    }
}

/// A placed cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnedCell {
    /// World-space centre.
    pub position: Vec2,
    /// Horizontal and vertical scale.
    pub scale: Vec2,
}

/// Places non-overlapping cells inside a disc.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    seed: u64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a spawner after validating the configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        Ok(Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Seed actually driving the spawner.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Places up to `count` cells around `center`, appending them to `out`.
    ///
    /// Candidates closer than the minimum distance to a cell placed earlier
    /// in the same pass are rejected; a cell without a free spot after
    /// [`MAX_ATTEMPTS`] candidates is skipped.
    pub fn spawn(&mut self, center: Vec2, out: &mut Vec<SpawnedCell>) {
        let first = out.len();
        let mut skipped = 0u32;

        for _ in 0..self.config.count {
            let Some(position) = self.find_position(center, &out[first..]) else {
                skipped += 1;
                continue;
            };
            let scale = self.next_scale();
            out.push(SpawnedCell { position, scale });
        }

        tracing::debug!(
            placed = out.len() - first,
            skipped,
            seed = self.seed,
            "spawned cells"
        );
    }

    fn find_position(&mut self, center: Vec2, placed: &[SpawnedCell]) -> Option<Vec2> {
        (0..MAX_ATTEMPTS).find_map(|_| {
            let candidate = center + self.point_in_disc();
            placed
                .iter()
                .all(|cell| cell.position.distance(candidate) >= self.config.min_distance)
                .then_some(candidate)
        })
    }

    fn point_in_disc(&mut self) -> Vec2 {
        let radius = self.config.spawn_radius * self.rng.gen::<f32>().sqrt();
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        Vec2::from_angle(angle) * radius
    }

    fn next_scale(&mut self) -> Vec2 {
        let [low, high] = self.config.scale_range;
        let x = self.rng.gen_range(low..=high);
        let y = if self.rng.gen_bool(STRETCH_CHANCE) {
            self.rng.gen_range(low..=high)
        } else {
            x
        };
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn inverted_scale_range_is_rejected() {
        let config = Config {
            scale_range: [2.0, 1.0],
            ..Config::default()
        };
        assert!(matches!(
            Spawning::new(config),
            Err(ConfigError::InvalidSpawn {
                field: "scale_range",
                ..
            })
        ));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let config = Config {
            spawn_radius: -1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_seed_is_replaced() {
        let spawning = Spawning::new(Config::default()).expect("valid config");
        assert_ne!(spawning.seed(), 0);
    }
}

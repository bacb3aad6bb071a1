//! Construction-time configuration for maze generation and the tail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selects which of the two ring layouts the topology builder produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyVariant {
    /// Cell counts sampled at each ring's mid radius, floored at four cells,
    /// with outward indices mapped through cell centres.
    #[default]
    Refined,
    /// Cell counts sampled at each ring's inner radius without a floor, with
    /// outward indices mapped by rounding the proportional position.
    Classic,
}

/// Describes how ring radii are derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingSizing {
    /// Rings grow outward from the nucleus by a fixed width.
    Explicit {
        /// Radius of the nucleus enclosed by ring zero.
        center_radius: f32,
        /// Radial width of every ring.
        ring_width: f32,
    },
    /// Rings share the space between the nucleus and the padded outer edge.
    Fitted {
        /// Outer radius of the whole cell, padding included.
        total_radius: f32,
        /// Radius of the nucleus enclosed by ring zero.
        center_radius: f32,
        /// Gap kept free between the outermost ring and `total_radius`.
        outer_padding: f32,
    },
}

impl Default for RingSizing {
    fn default() -> Self {
        Self::Explicit {
            center_radius: 1.5,
            ring_width: 1.0,
        }
    }
}

impl RingSizing {
    /// Resolves the sizing into a nucleus radius and a ring width.
    ///
    /// A fitted layout with zero rings resolves to the full available span so
    /// that degenerate mazes still describe sane radii.
    pub fn resolve(&self, rings: u32) -> Result<ResolvedSizing, ConfigError> {
        let (center_radius, ring_width) = match *self {
            Self::Explicit {
                center_radius,
                ring_width,
            } => (center_radius, ring_width),
            Self::Fitted {
                total_radius,
                center_radius,
                outer_padding,
            } => {
                if !(outer_padding >= 0.0) {
                    return Err(ConfigError::NegativePadding {
                        padding: outer_padding,
                    });
                }
                let span = total_radius - outer_padding - center_radius;
                (center_radius, span / rings.max(1) as f32)
            }
        };

        if !(center_radius > 0.0) || !center_radius.is_finite() {
            return Err(ConfigError::NonPositiveRadius {
                radius: center_radius,
            });
        }
        if !(ring_width > 0.0) || !ring_width.is_finite() {
            return Err(ConfigError::NonPositiveRingWidth { width: ring_width });
        }

        Ok(ResolvedSizing {
            center_radius,
            ring_width,
        })
    }
}

/// Ring radii after validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedSizing {
    /// Radius of the nucleus enclosed by ring zero.
    pub center_radius: f32,
    /// Radial width of every ring.
    pub ring_width: f32,
}

/// Parameters controlling a single maze generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Number of concentric rings. Zero produces an empty maze.
    pub rings: u32,
    /// How ring radii are derived.
    pub sizing: RingSizing,
    /// Which ring layout the topology builder produces.
    pub variant: TopologyVariant,
    /// Thickness of every emitted wall in world units.
    pub wall_thickness: f32,
    /// Number of openings carved into the outermost ring.
    pub entrances: u32,
    /// Probability of restricting a carving step to circumferential moves.
    pub curviness: f32,
    /// Number of straight quads approximating each arc wall.
    pub arc_resolution: u32,
    /// Random seed; zero draws a fresh seed for every run.
    pub seed: u64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rings: 10,
            sizing: RingSizing::default(),
            variant: TopologyVariant::Refined,
            wall_thickness: 0.1,
            entrances: 4,
            curviness: 0.5,
            arc_resolution: 5,
            seed: 0,
        }
    }
}

impl MazeConfig {
    /// Checks every field and resolves the ring sizing.
    pub fn validate(&self) -> Result<ResolvedSizing, ConfigError> {
        let sizing = self.sizing.resolve(self.rings)?;

        if !(self.wall_thickness > 0.0) || !self.wall_thickness.is_finite() {
            return Err(ConfigError::NonPositiveThickness {
                thickness: self.wall_thickness,
            });
        }
        if self.wall_thickness >= 2.0 * sizing.center_radius {
            return Err(ConfigError::ThicknessExceedsRadius {
                thickness: self.wall_thickness,
                radius: sizing.center_radius,
            });
        }
        if !(0.0..=1.0).contains(&self.curviness) {
            return Err(ConfigError::CurvinessOutOfRange {
                curviness: self.curviness,
            });
        }
        if self.arc_resolution == 0 {
            return Err(ConfigError::ZeroArcResolution);
        }
        if self.entrances == 0 {
            return Err(ConfigError::ZeroEntrances);
        }

        Ok(sizing)
    }
}

/// Speeds governing the tail controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Distance the tip travels per second while extending.
    pub extension_speed: f32,
    /// Steering rate in degrees per second at full input.
    pub rotation_speed: f32,
    /// Distance the tip travels per second while retracting.
    pub retraction_speed: f32,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            extension_speed: 2.0,
            rotation_speed: 150.0,
            retraction_speed: 4.0,
        }
    }
}

impl TailConfig {
    /// Rejects non-positive or non-finite speeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("extension_speed", self.extension_speed),
            ("rotation_speed", self.rotation_speed),
            ("retraction_speed", self.retraction_speed),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveSpeed { field, value });
            }
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected before any generation work starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The nucleus radius must be a positive finite number.
    #[error("center radius must be positive, got {radius}")]
    NonPositiveRadius {
        /// Offending radius.
        radius: f32,
    },
    /// Ring width must be a positive finite number.
    #[error("ring width must be positive, got {width}")]
    NonPositiveRingWidth {
        /// Offending width, after fitting when applicable.
        width: f32,
    },
    /// Outer padding cannot be negative.
    #[error("outer padding must not be negative, got {padding}")]
    NegativePadding {
        /// Offending padding.
        padding: f32,
    },
    /// Walls need a positive thickness.
    #[error("wall thickness must be positive, got {thickness}")]
    NonPositiveThickness {
        /// Offending thickness.
        thickness: f32,
    },
    /// Spokes at the innermost radius cannot be wider than the nucleus.
    #[error("wall thickness {thickness} does not fit inside center radius {radius}")]
    ThicknessExceedsRadius {
        /// Configured wall thickness.
        thickness: f32,
        /// Resolved nucleus radius.
        radius: f32,
    },
    /// Curviness is a probability.
    #[error("curviness must lie within [0, 1], got {curviness}")]
    CurvinessOutOfRange {
        /// Offending curviness.
        curviness: f32,
    },
    /// Arcs need at least one segment.
    #[error("arc resolution must be at least 1")]
    ZeroArcResolution,
    /// At least one entrance is required.
    #[error("at least one entrance is required")]
    ZeroEntrances,
    /// A ring ended up with too few cells to form a cycle.
    #[error("ring {ring} would contain only {cells} cells")]
    DegenerateRing {
        /// Ring index.
        ring: u32,
        /// Computed cell count.
        cells: u32,
    },
    /// The rings would hold more cells than a maze may allocate.
    #[error("ring {ring} brings the maze to {cells} cells, above the limit of {limit}")]
    TooManyCells {
        /// First ring at which the running total exceeds the limit.
        ring: u32,
        /// Running cell total up to and including that ring.
        cells: f64,
        /// Largest accepted total.
        limit: usize,
    },
    /// A speed must be a positive finite number.
    #[error("{field} must be positive, got {value}")]
    NonPositiveSpeed {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A spawn parameter is out of range.
    #[error("invalid spawn setting {field}: {reason}")]
    InvalidSpawn {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: &'static str,
    },
}

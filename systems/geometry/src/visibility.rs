//! Cosmetic wall visibility and the proximity detector that drives it.

use glam::Vec2;

use crate::{MazeWall, WallId};

/// Cosmetic visibility toggle exposed by every emitted wall.
///
/// Toggling visibility never changes the wall's collider.
pub trait WallVisibility {
    /// Makes the wall visible.
    fn reveal(&mut self);

    /// Hides the wall.
    fn hide(&mut self);

    /// Reports whether the wall is currently visible.
    fn is_visible(&self) -> bool;
}

/// Visibility transition reported by [`ProximityDetector::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityChange {
    /// The wall entered the detector's range and was revealed.
    Revealed(WallId),
    /// The wall left the detector's range and was hidden.
    Hidden(WallId),
}

/// Reveals walls close to a point and hides them again once it moves away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityDetector {
    radius: f32,
}

impl ProximityDetector {
    /// Creates a detector with the provided trigger radius.
    ///
    /// Negative or NaN radii collapse to zero, which only detects walls the
    /// point is inside of.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    /// Trigger radius in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Reports whether the wall's collider lies within range of `point`.
    #[must_use]
    pub fn in_range(&self, point: Vec2, wall: &MazeWall) -> bool {
        distance_to_polygon(point, wall.collider()) <= self.radius
    }

    /// Reveals walls entering range and hides walls leaving it.
    ///
    /// Only actual transitions are reported, in wall order.
    pub fn update(&self, point: Vec2, walls: &mut [MazeWall], out: &mut Vec<VisibilityChange>) {
        for wall in walls.iter_mut() {
            let near = self.in_range(point, wall);
            match (near, wall.is_visible()) {
                (true, false) => {
                    wall.reveal();
                    out.push(VisibilityChange::Revealed(wall.id()));
                }
                (false, true) => {
                    wall.hide();
                    out.push(VisibilityChange::Hidden(wall.id()));
                }
                _ => {}
            }
        }
    }
}

fn distance_to_polygon(point: Vec2, polygon: &[Vec2]) -> f32 {
    if polygon.is_empty() {
        return f32::INFINITY;
    }
    if contains(polygon, point) {
        return 0.0;
    }

    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(&a, &b)| distance_to_segment(point, a, b))
        .fold(f32::INFINITY, f32::min)
}

fn contains(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    for (&a, &b) in polygon.iter().zip(polygon.iter().cycle().skip(1)) {
        if (a.y > point.y) != (b.y > point.y) {
            let crossing = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < crossing {
                inside = !inside;
            }
        }
    }
    inside
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let edge = b - a;
    let length_squared = edge.length_squared();
    if length_squared == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(edge) / length_squared).clamp(0.0, 1.0);
    point.distance(a + edge * t)
}

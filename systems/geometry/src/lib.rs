#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Converts a carved maze grid into wall meshes and collision polygons.
//!
//! Every standing wall flag becomes one [`MazeWall`]: outward flags produce
//! arcs along the ring's outer boundary, clockwise flags produce spokes along
//! the boundary shared with the clockwise neighbour. Walls start hidden and
//! are revealed by a proximity detector; visibility never touches collision.

mod visibility;

pub use visibility::{ProximityDetector, VisibilityChange, WallVisibility};

use glam::Vec2;
use phage_maze_core::CellAddress;
use phage_maze_grid::MazeGrid;
use serde::{Deserialize, Serialize};

/// Triangulated 2D mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in world units.
    pub vertices: Vec<Vec2>,
    /// Vertex index triples.
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    fn push_quad_strip(&mut self, near: &[Vec2], far: &[Vec2]) {
        let base = self.vertices.len() as u32;
        for (&a, &b) in near.iter().zip(far) {
            self.vertices.push(a);
            self.vertices.push(b);
        }
        for step in 0..near.len().saturating_sub(1) as u32 {
            let i = base + 2 * step;
            self.triangles.push([i, i + 2, i + 1]);
            self.triangles.push([i + 2, i + 3, i + 1]);
        }
    }

    fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|[a, b, c]| [a + base, b + base, c + base]),
        );
    }
}

/// Identifier of a wall within one emitted maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Polar description of an emitted wall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum WallShape {
    /// Wall along a ring boundary, derived from a cell's outward flag.
    Arc {
        /// Cell owning the wall flag.
        cell: CellAddress,
        /// Centre-line radius.
        radius: f32,
        /// Start angle in radians.
        start_angle: f32,
        /// End angle in radians.
        end_angle: f32,
    },
    /// Straight wall across a ring, derived from a cell's clockwise flag.
    Spoke {
        /// Cell owning the wall flag.
        cell: CellAddress,
        /// Angle of the centre line in radians.
        angle: f32,
        /// Radius at which the spoke starts.
        inner_radius: f32,
        /// Radius at which the spoke ends.
        outer_radius: f32,
    },
}

impl WallShape {
    /// Cell whose wall flag produced the shape.
    #[must_use]
    pub const fn cell(&self) -> CellAddress {
        match *self {
            Self::Arc { cell, .. } | Self::Spoke { cell, .. } => cell,
        }
    }
}

/// Independent renderable and collidable wall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeWall {
    id: WallId,
    shape: WallShape,
    mesh: Mesh,
    quads: Vec<[Vec2; 4]>,
    collider: Vec<Vec2>,
    visible: bool,
}

impl MazeWall {
    /// Identifier of the wall.
    #[must_use]
    pub const fn id(&self) -> WallId {
        self.id
    }

    /// Polar description of the wall.
    #[must_use]
    pub const fn shape(&self) -> &WallShape {
        &self.shape
    }

    /// Triangulated wall mesh.
    #[must_use]
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Closed outline of the wall used for collision.
    #[must_use]
    pub fn collider(&self) -> &[Vec2] {
        &self.collider
    }
}

impl WallVisibility for MazeWall {
    fn reveal(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Complete set of walls emitted for a maze.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MazeGeometry {
    walls: Vec<MazeWall>,
}

impl MazeGeometry {
    /// Emitted walls in emission order.
    #[must_use]
    pub fn walls(&self) -> &[MazeWall] {
        &self.walls
    }

    /// Mutable access for visibility toggling.
    #[must_use]
    pub fn walls_mut(&mut self) -> &mut [MazeWall] {
        &mut self.walls
    }

    /// Looks up a wall by identifier.
    #[must_use]
    pub fn wall(&self, id: WallId) -> Option<&MazeWall> {
        self.walls.get(id.get() as usize)
    }

    /// Number of emitted walls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Reports whether no wall was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Concatenates every wall into one mesh with one collider path per quad.
    #[must_use]
    pub fn merged(&self) -> MergedGeometry {
        let mut merged = MergedGeometry::default();
        for wall in &self.walls {
            merged.mesh.append(&wall.mesh);
            merged
                .collider_paths
                .extend(wall.quads.iter().map(|&[near_a, far_a, near_b, far_b]| {
                    [near_a, near_b, far_b, far_a]
                }));
        }
        merged
    }
}

/// Whole-maze mesh paired with a multi-path collider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedGeometry {
    /// Every wall mesh with re-based indices.
    pub mesh: Mesh,
    /// One four-point collider path per quad.
    pub collider_paths: Vec<[Vec2; 4]>,
}

/// Walks a finished grid and produces wall geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryEmitter {
    thickness: f32,
    arc_resolution: u32,
}

impl GeometryEmitter {
    /// Creates an emitter. An arc resolution of zero is raised to one.
    #[must_use]
    pub fn new(thickness: f32, arc_resolution: u32) -> Self {
        Self {
            thickness,
            arc_resolution: arc_resolution.max(1),
        }
    }

    /// Emits one wall per standing outward or clockwise flag.
    ///
    /// Walls are produced ring by ring and cell by cell, the outward arc of a
    /// cell before its clockwise spoke.
    #[must_use]
    pub fn emit(&self, grid: &MazeGrid) -> MazeGeometry {
        let topology = grid.topology();
        let mut walls = Vec::new();

        for (address, cell) in grid.cells() {
            let Some((start_angle, end_angle)) =
                topology.angular_span(address.ring(), address.index())
            else {
                continue;
            };
            let inner_radius = topology.inner_radius(address.ring());
            let outer_radius = topology.outer_radius(address.ring());

            if cell.wall_outward() {
                let id = WallId::new(walls.len() as u32);
                walls.push(self.arc(id, address, outer_radius, start_angle, end_angle));
            }
            if cell.wall_clockwise() {
                let id = WallId::new(walls.len() as u32);
                walls.push(self.spoke(id, address, end_angle, inner_radius, outer_radius));
            }
        }

        tracing::debug!(
            walls = walls.len(),
            thickness = self.thickness,
            arc_resolution = self.arc_resolution,
            "emitted maze geometry"
        );

        MazeGeometry { walls }
    }

    fn arc(
        &self,
        id: WallId,
        cell: CellAddress,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    ) -> MazeWall {
        let half = self.thickness / 2.0;
        let step = (end_angle - start_angle) / self.arc_resolution as f32;
        let angles = (0..=self.arc_resolution).map(move |k| start_angle + k as f32 * step);
        let near: Vec<Vec2> = angles
            .clone()
            .map(|angle| polar(radius - half, angle))
            .collect();
        let far: Vec<Vec2> = angles.map(|angle| polar(radius + half, angle)).collect();

        let quads = quads(&near, &far);
        let mut collider = near.clone();
        collider.extend(far.iter().rev());
        let mut mesh = Mesh::default();
        mesh.push_quad_strip(&near, &far);

        MazeWall {
            id,
            shape: WallShape::Arc {
                cell,
                radius,
                start_angle,
                end_angle,
            },
            mesh,
            quads,
            collider,
            visible: false,
        }
    }

    fn spoke(
        &self,
        id: WallId,
        cell: CellAddress,
        angle: f32,
        inner_radius: f32,
        outer_radius: f32,
    ) -> MazeWall {
        let inner_half = self.half_angle(inner_radius);
        let outer_half = self.half_angle(outer_radius);
        let near = [
            polar(inner_radius, angle + inner_half),
            polar(outer_radius, angle + outer_half),
        ];
        let far = [
            polar(inner_radius, angle - inner_half),
            polar(outer_radius, angle - outer_half),
        ];

        let mut mesh = Mesh::default();
        mesh.push_quad_strip(&near, &far);

        MazeWall {
            id,
            shape: WallShape::Spoke {
                cell,
                angle,
                inner_radius,
                outer_radius,
            },
            mesh,
            quads: quads(&near, &far),
            collider: vec![near[0], near[1], far[1], far[0]],
            visible: false,
        }
    }

    /// Angular half-width that keeps the chord at `radius` equal to the
    /// wall thickness.
    fn half_angle(&self, radius: f32) -> f32 {
        (self.thickness / 2.0 / radius).clamp(-1.0, 1.0).asin()
    }
}

fn polar(radius: f32, angle: f32) -> Vec2 {
    Vec2::from_angle(angle) * radius
}

fn quads(near: &[Vec2], far: &[Vec2]) -> Vec<[Vec2; 4]> {
    near.windows(2)
        .zip(far.windows(2))
        .map(|(n, f)| [n[0], f[0], n[1], f[1]])
        .collect()
}

use std::collections::HashSet;

use glam::Vec2;
use phage_maze_core::MazeConfig;
use phage_maze_grid::{MazeGrid, RingTopology};
use phage_maze_system_carving::{carve_entrances, seeded_rng, Carver};
use phage_maze_system_geometry::{
    GeometryEmitter, MazeGeometry, ProximityDetector, VisibilityChange, WallId, WallShape,
    WallVisibility,
};

fn carved(seed: u64) -> (MazeGrid, MazeGeometry) {
    let config = MazeConfig {
        rings: 5,
        ..MazeConfig::default()
    };
    let mut grid = MazeGrid::new(RingTopology::from_config(&config).expect("valid configuration"));
    let mut rng = seeded_rng(seed);
    let _ = Carver::new(config.curviness).carve(&mut grid, &mut rng);
    let _ = carve_entrances(&mut grid, config.entrances, &mut rng);
    let geometry = GeometryEmitter::new(config.wall_thickness, config.arc_resolution).emit(&grid);
    (grid, geometry)
}

fn sealed() -> MazeGeometry {
    let config = MazeConfig {
        rings: 3,
        ..MazeConfig::default()
    };
    let grid = MazeGrid::new(RingTopology::from_config(&config).expect("valid configuration"));
    GeometryEmitter::new(config.wall_thickness, config.arc_resolution).emit(&grid)
}

#[test]
fn every_standing_flag_has_exactly_one_wall() {
    let (grid, geometry) = carved(11);

    let mut arcs = HashSet::new();
    let mut spokes = HashSet::new();
    for wall in geometry.walls() {
        let fresh = match wall.shape() {
            WallShape::Arc { cell, .. } => arcs.insert(*cell),
            WallShape::Spoke { cell, .. } => spokes.insert(*cell),
        };
        assert!(fresh, "duplicate wall for {:?}", wall.shape().cell());
    }

    for (address, cell) in grid.cells() {
        assert_eq!(cell.wall_outward(), arcs.contains(&address), "{address:?}");
        assert_eq!(cell.wall_clockwise(), spokes.contains(&address), "{address:?}");
    }
}

#[test]
fn walls_start_hidden_and_reveal_keeps_collider() {
    let (_, mut geometry) = carved(12);
    assert!(geometry.walls().iter().all(|wall| !wall.is_visible()));

    let wall = &mut geometry.walls_mut()[0];
    let collider = wall.collider().to_vec();
    wall.reveal();
    assert!(wall.is_visible());
    assert_eq!(wall.collider(), collider.as_slice());
    wall.hide();
    assert!(!wall.is_visible());
    assert_eq!(wall.collider(), collider.as_slice());
}

#[test]
fn proximity_detector_toggles_nearby_walls() {
    let mut geometry = sealed();
    let detector = ProximityDetector::new(0.47);
    let point = Vec2::new(2.0, 0.0);

    let mut changes = Vec::new();
    detector.update(point, geometry.walls_mut(), &mut changes);
    assert_eq!(changes.len(), 3, "two ring-zero arcs and one spoke sit near the point");
    assert!(changes
        .iter()
        .all(|change| matches!(change, VisibilityChange::Revealed(_))));
    for change in &changes {
        if let VisibilityChange::Revealed(id) = change {
            let wall = geometry.wall(*id).expect("revealed wall exists");
            assert!(wall.is_visible());
            assert!(detector.in_range(point, wall));
        }
    }

    let mut repeated = Vec::new();
    detector.update(point, geometry.walls_mut(), &mut repeated);
    assert!(repeated.is_empty(), "stationary point must not toggle walls");

    let mut away = Vec::new();
    detector.update(Vec2::new(100.0, 100.0), geometry.walls_mut(), &mut away);
    assert_eq!(away.len(), changes.len());
    assert!(away
        .iter()
        .all(|change| matches!(change, VisibilityChange::Hidden(_))));
    assert!(geometry.walls().iter().all(|wall| !wall.is_visible()));
}

#[test]
fn wall_ids_follow_emission_order() {
    let (_, geometry) = carved(14);
    for (position, wall) in geometry.walls().iter().enumerate() {
        assert_eq!(wall.id(), WallId::new(position as u32));
    }
    assert_eq!(
        geometry.walls().first().map(|wall| wall.shape().cell().ring()),
        Some(0)
    );
}

#[test]
fn empty_grid_emits_nothing() {
    let config = MazeConfig {
        rings: 0,
        ..MazeConfig::default()
    };
    let grid = MazeGrid::new(RingTopology::from_config(&config).expect("valid configuration"));
    let geometry = GeometryEmitter::new(0.1, 5).emit(&grid);
    assert!(geometry.is_empty());
    assert!(geometry.merged().mesh.vertices.is_empty());
}

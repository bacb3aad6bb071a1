use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use glam::Vec2;
use phage_maze_core::{PenetrationEndReason, TailCommand, TailConfig, TailEvent, TailState};
use phage_maze_system_tail::{TailController, WAYPOINT_SPACING};

const STEP: Duration = Duration::from_millis(16);

fn equal_speeds() -> TailConfig {
    TailConfig {
        extension_speed: 3.0,
        rotation_speed: 90.0,
        retraction_speed: 3.0,
    }
}

fn penetrate(tail: &mut TailController, events: &mut Vec<TailEvent>) {
    tail.handle(
        TailCommand::StartPenetration {
            root: Vec2::new(1.0, -2.0),
            heading: Vec2::new(1.0, 1.0),
        },
        events,
    );
}

#[test]
fn retracting_as_long_as_extending_returns_to_root() {
    let mut tail = TailController::new(equal_speeds()).expect("valid speeds");
    let mut events = Vec::new();
    penetrate(&mut tail, &mut events);

    let steps = 60;
    for step in 0..steps {
        let input = if step < 30 { 0.6 } else { -0.4 };
        tail.handle(TailCommand::Steer { input }, &mut events);
        tail.handle(TailCommand::Tick { dt: STEP }, &mut events);
    }
    assert!(tail.path().len() > 10);

    tail.handle(TailCommand::StartRetraction, &mut events);
    let mut previous = tail.path().len();
    let mut last_tip = tail.tip().map(|tip| tip.position());
    for _ in 0..steps {
        tail.handle(TailCommand::Tick { dt: STEP }, &mut events);
        if tail.state() == TailState::Idle {
            break;
        }
        assert!(tail.path().len() <= previous, "path grew during retraction");
        previous = tail.path().len();
        last_tip = tail.tip().map(|tip| tip.position());
    }

    assert_eq!(tail.state(), TailState::Idle);
    assert_eq!(
        events.last(),
        Some(&TailEvent::PenetrationEnded {
            reason: PenetrationEndReason::ReachedRoot
        })
    );
    let last_tip = last_tip.expect("tip existed before the final step");
    assert!(last_tip.distance(Vec2::new(1.0, -2.0)) <= 3.0 * STEP.as_secs_f32() + WAYPOINT_SPACING);
}

#[test]
fn live_path_end_follows_the_tip() {
    let mut tail = TailController::new(TailConfig::default()).expect("valid speeds");
    let mut events = Vec::new();
    penetrate(&mut tail, &mut events);
    for _ in 0..40 {
        tail.handle(TailCommand::Tick { dt: STEP }, &mut events);
    }
    tail.handle(TailCommand::StartRetraction, &mut events);

    for _ in 0..5 {
        tail.handle(TailCommand::Tick { dt: STEP }, &mut events);
        let tip = tail.tip().expect("still retracting").position();
        assert_eq!(tail.path().last(), Some(&tip));
    }
}

#[test]
fn tail_events_are_deterministic_for_script() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "tail replay diverged");
    assert!(first.1 > 0);
}

fn replay() -> (u64, usize) {
    let mut tail = TailController::new(TailConfig::default()).expect("valid speeds");
    let mut events = Vec::new();
    penetrate(&mut tail, &mut events);

    for step in 0..120 {
        if step % 25 == 10 {
            tail.handle(
                TailCommand::WallCollision {
                    normal: Vec2::new(-1.0, 0.2),
                },
                &mut events,
            );
        }
        tail.handle(
            TailCommand::Steer {
                input: (step as f32 * 0.1).sin(),
            },
            &mut events,
        );
        tail.handle(TailCommand::Tick { dt: STEP }, &mut events);
        if step == 80 {
            tail.handle(TailCommand::StartRetraction, &mut events);
        }
        if step == 90 {
            tail.handle(TailCommand::StopRetraction, &mut events);
        }
        if step == 95 {
            tail.handle(TailCommand::StartRetraction, &mut events);
        }
    }

    let mut hasher = DefaultHasher::new();
    let mut waypoints = 0;
    for event in &events {
        match event {
            TailEvent::WaypointRecorded { position, .. } => {
                waypoints += 1;
                position.to_array().map(f32::to_bits).hash(&mut hasher);
            }
            TailEvent::HeadingReflected { heading } => {
                heading.to_array().map(f32::to_bits).hash(&mut hasher);
            }
            TailEvent::WaypointDropped { remaining } => remaining.hash(&mut hasher),
            other => format!("{other:?}").hash(&mut hasher),
        }
    }
    (hasher.finish(), waypoints)
}

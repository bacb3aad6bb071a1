//! Message surface of the tail controller.

use std::time::Duration;

use glam::Vec2;

/// Commands that drive the tail controller.
///
/// Hosts forward input, physics-step ticks, and contact notifications as
/// commands; the controller answers with [`TailEvent`] values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TailCommand {
    /// Spawns a fresh tip at the root and begins extending, cancelling any
    /// run already in progress.
    StartPenetration {
        /// Fixed world-space anchor of the tail.
        root: Vec2,
        /// Initial heading of the tip. Normalised by the controller.
        heading: Vec2,
    },
    /// Updates the steering axis applied while extending.
    Steer {
        /// Steering axis in `-1.0..=1.0`; positive values turn clockwise.
        input: f32,
    },
    /// Advances the controller by one simulation step.
    Tick {
        /// Simulated time elapsed since the previous step.
        dt: Duration,
    },
    /// Reports that the tip touched a maze wall.
    WallCollision {
        /// Contact normal pointing away from the wall.
        normal: Vec2,
    },
    /// Reports that the tip touched the maze nucleus.
    NucleusContact,
    /// Begins or resumes retracting along the recorded path.
    StartRetraction,
    /// Pauses retraction in place.
    StopRetraction,
    /// Destroys the tip immediately.
    CutTail,
}

/// Events emitted by the tail controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TailEvent {
    /// A new tip was spawned at the root.
    PenetrationStarted {
        /// Root the path is anchored to.
        root: Vec2,
    },
    /// The tip moved far enough to record another waypoint.
    WaypointRecorded {
        /// Recorded tip position.
        position: Vec2,
        /// Path length after recording, root included.
        waypoints: usize,
    },
    /// The heading was mirrored off a wall.
    HeadingReflected {
        /// Heading after reflection.
        heading: Vec2,
    },
    /// The tip switched to retraction or resumed it.
    RetractionStarted,
    /// Retraction was paused in place.
    RetractionPaused,
    /// The tip reached a waypoint during retraction and it was removed.
    WaypointDropped {
        /// Path length after removal, root included.
        remaining: usize,
    },
    /// The tip was destroyed; the owning navigator should leave penetration mode.
    PenetrationEnded {
        /// Why the run finished.
        reason: PenetrationEndReason,
    },
}

/// Reasons a penetration run finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PenetrationEndReason {
    /// Retraction brought the tip back to the root.
    ReachedRoot,
    /// The host cut the tail.
    Cut,
    /// The tip reached the nucleus.
    NucleusReached,
}

/// Lifecycle state of the tail controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TailState {
    /// No tip exists.
    #[default]
    Idle,
    /// The tip travels forward along its heading.
    Extending,
    /// The tip travels back along the recorded path.
    Retracting {
        /// Whether retraction is currently halted in place.
        paused: bool,
    },
}

/// How the host should simulate the tip body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TipBody {
    /// Driven by the physics host and able to collide.
    Dynamic,
    /// Moved directly by the controller.
    Kinematic,
}

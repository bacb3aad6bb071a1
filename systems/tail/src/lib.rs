#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step-driven controller for the phage tail.
//!
//! The tail extends from a fixed root along a steerable heading, recording
//! waypoints as it goes, bounces off maze walls and can retract back along
//! the recorded path. Hosts drive it with [`TailCommand`] values, one `Tick`
//! per physics step, and react to the [`TailEvent`] values it emits.

use glam::Vec2;
use phage_maze_core::{
    ConfigError, PenetrationEndReason, TailCommand, TailConfig, TailEvent, TailState, TipBody,
};

/// Distance the tip must travel from the last waypoint before another one is
/// recorded.
pub const WAYPOINT_SPACING: f32 = 0.1;

/// Distance the tip is pushed along a wall normal after a collision.
pub const COLLISION_NUDGE: f32 = 0.05;

/// Distance under which a retracting tip counts as having reached a waypoint.
pub const ARRIVAL_TOLERANCE: f32 = 0.01;

/// The moving end of the tail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TailTip {
    position: Vec2,
    heading: Vec2,
    body: TipBody,
}

impl TailTip {
    /// Current world-space position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit heading the tip extends along.
    #[must_use]
    pub const fn heading(&self) -> Vec2 {
        self.heading
    }

    /// How the host should simulate the tip body.
    #[must_use]
    pub const fn body(&self) -> TipBody {
        self.body
    }
}

/// Stateful tail controller.
#[derive(Clone, Debug)]
pub struct TailController {
    config: TailConfig,
    state: TailState,
    tip: Option<TailTip>,
    path: Vec<Vec2>,
    steering: f32,
}

impl TailController {
    /// Creates an idle controller after validating its speeds.
    pub fn new(config: TailConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: TailState::Idle,
            tip: None,
            path: Vec::new(),
            steering: 0.0,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TailState {
        self.state
    }

    /// Active tip, if a run is in progress.
    #[must_use]
    pub const fn tip(&self) -> Option<&TailTip> {
        self.tip.as_ref()
    }

    /// Recorded path, root first. While retracting the last point follows
    /// the tip.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Reports whether the tail is retracting, paused or not.
    #[must_use]
    pub const fn is_retracting(&self) -> bool {
        matches!(self.state, TailState::Retracting { .. })
    }

    /// Applies a command and appends the resulting events to `out`.
    ///
    /// Commands that make no sense in the current state are ignored.
    pub fn handle(&mut self, command: TailCommand, out: &mut Vec<TailEvent>) {
        match command {
            TailCommand::StartPenetration { root, heading } => self.start(root, heading, out),
            TailCommand::Steer { input } => {
                if self.state == TailState::Extending {
                    self.steering = if input.is_nan() {
                        0.0
                    } else {
                        input.clamp(-1.0, 1.0)
                    };
                }
            }
            TailCommand::Tick { dt } => {
                let dt = dt.as_secs_f32();
                match self.state {
                    TailState::Extending => self.extend(dt, out),
                    TailState::Retracting { paused: false } => self.retract(dt, out),
                    TailState::Idle | TailState::Retracting { paused: true } => {}
                }
            }
            TailCommand::WallCollision { normal } => self.bounce(normal, out),
            TailCommand::NucleusContact => {
                if self.state != TailState::Idle {
                    self.finish(PenetrationEndReason::NucleusReached, out);
                }
            }
            TailCommand::StartRetraction => self.start_retraction(out),
            TailCommand::StopRetraction => {
                if self.state == (TailState::Retracting { paused: false }) {
                    self.transition(TailState::Retracting { paused: true });
                    out.push(TailEvent::RetractionPaused);
                }
            }
            TailCommand::CutTail => {
                if self.state != TailState::Idle {
                    self.finish(PenetrationEndReason::Cut, out);
                }
            }
        }
    }

    fn start(&mut self, root: Vec2, heading: Vec2, out: &mut Vec<TailEvent>) {
        if self.state != TailState::Idle {
            tracing::debug!(state = ?self.state, "restarting active penetration");
        }

        self.tip = Some(TailTip {
            position: root,
            heading: heading.try_normalize().unwrap_or(Vec2::Y),
            body: TipBody::Dynamic,
        });
        self.path.clear();
        self.path.push(root);
        self.steering = 0.0;
        self.transition(TailState::Extending);
        out.push(TailEvent::PenetrationStarted { root });
    }

    fn extend(&mut self, dt: f32, out: &mut Vec<TailEvent>) {
        let Some(tip) = self.tip.as_mut() else {
            return;
        };

        let degrees = -self.steering * self.config.rotation_speed * dt;
        if degrees != 0.0 {
            tip.heading = Vec2::from_angle(degrees.to_radians())
                .rotate(tip.heading)
                .normalize_or_zero();
        }
        tip.position += tip.heading * self.config.extension_speed * dt;

        let last = self.path.last().copied().unwrap_or(tip.position);
        if tip.position.distance(last) > WAYPOINT_SPACING {
            self.path.push(tip.position);
            out.push(TailEvent::WaypointRecorded {
                position: tip.position,
                waypoints: self.path.len(),
            });
        }
    }

    fn bounce(&mut self, normal: Vec2, out: &mut Vec<TailEvent>) {
        if self.state != TailState::Extending {
            return;
        }
        let Some(tip) = self.tip.as_mut() else {
            return;
        };
        let Some(normal) = normal.try_normalize() else {
            return;
        };

        tip.position += normal * COLLISION_NUDGE;
        let reflected = tip.heading - 2.0 * tip.heading.dot(normal) * normal;
        tip.heading = reflected.try_normalize().unwrap_or(normal);
        out.push(TailEvent::HeadingReflected {
            heading: tip.heading,
        });
    }

    fn start_retraction(&mut self, out: &mut Vec<TailEvent>) {
        match self.state {
            TailState::Extending => {
                let Some(tip) = self.tip.as_mut() else {
                    return;
                };
                tip.body = TipBody::Kinematic;
                if self.path.last() != Some(&tip.position) {
                    self.path.push(tip.position);
                }
                self.transition(TailState::Retracting { paused: false });
                out.push(TailEvent::RetractionStarted);

                if self.path.len() <= 1 {
                    self.finish(PenetrationEndReason::ReachedRoot, out);
                }
            }
            TailState::Retracting { paused: true } => {
                self.transition(TailState::Retracting { paused: false });
                out.push(TailEvent::RetractionStarted);
            }
            TailState::Idle | TailState::Retracting { paused: false } => {}
        }
    }

    fn retract(&mut self, dt: f32, out: &mut Vec<TailEvent>) {
        let Some(mut position) = self.tip.map(|tip| tip.position) else {
            return;
        };
        let mut budget = self.config.retraction_speed * dt;

        loop {
            let Some(&target) = self.path.len().checked_sub(2).and_then(|i| self.path.get(i))
            else {
                self.finish(PenetrationEndReason::ReachedRoot, out);
                return;
            };

            let distance = position.distance(target);
            if distance <= budget + ARRIVAL_TOLERANCE {
                position = target;
                budget = (budget - distance).max(0.0);
                let _ = self.path.pop();
                out.push(TailEvent::WaypointDropped {
                    remaining: self.path.len(),
                });
                if self.path.len() <= 1 {
                    self.finish(PenetrationEndReason::ReachedRoot, out);
                    return;
                }
                if budget <= 0.0 {
                    break;
                }
            } else {
                position += (target - position) / distance * budget;
                if let Some(last) = self.path.last_mut() {
                    *last = position;
                }
                break;
            }
        }

        if let Some(tip) = self.tip.as_mut() {
            tip.position = position;
        }
    }

    fn finish(&mut self, reason: PenetrationEndReason, out: &mut Vec<TailEvent>) {
        self.tip = None;
        self.path.clear();
        self.steering = 0.0;
        self.transition(TailState::Idle);
        tracing::debug!(?reason, "penetration ended");
        out.push(TailEvent::PenetrationEnded { reason });
    }

    fn transition(&mut self, next: TailState) {
        tracing::trace!(from = ?self.state, to = ?next, "tail state change");
        self.state = next;
    }
}

//! First-person free-look locomotion.

use std::time::Duration;

use glam::Vec3;
use outbreak_core::{Heading, Movement, WorldPosition, WORLD_HALF_EXTENT};

use crate::{
    collaborators::{Locomotion, MouseDelta, Pose},
    DriverError,
};

const DEFAULT_WALK_SPEED: f32 = 30.0;
const DEFAULT_RUN_MULTIPLIER: f32 = 3.0;
const DEFAULT_SENSITIVITY: f32 = 0.0025;
const PITCH_LIMIT: f32 = 1.4;

/// Yaw/pitch camera that walks on the ground plane.
///
/// The eye height never changes and the position is kept inside the arena.
#[derive(Clone, Copy, Debug)]
pub struct FreeLook {
    walk_speed: f32,
    run_multiplier: f32,
    sensitivity: f32,
}

impl FreeLook {
    /// Creates a controller moving `walk_speed` units per second, scaled by
    /// `run_multiplier` while running, and turning `sensitivity` radians per
    /// mouse unit.
    pub fn new(
        walk_speed: f32,
        run_multiplier: f32,
        sensitivity: f32,
    ) -> Result<Self, DriverError> {
        if !walk_speed.is_finite() || walk_speed < 0.0 {
            return Err(DriverError::InvalidConfiguration {
                field: "walk_speed",
                reason: format!("expected a non-negative speed, got {walk_speed}"),
            });
        }
        if !run_multiplier.is_finite() || run_multiplier < 1.0 {
            return Err(DriverError::InvalidConfiguration {
                field: "run_multiplier",
                reason: format!("expected a multiplier of at least 1, got {run_multiplier}"),
            });
        }
        if !sensitivity.is_finite() {
            return Err(DriverError::InvalidConfiguration {
                field: "sensitivity",
                reason: format!("expected a finite sensitivity, got {sensitivity}"),
            });
        }

        Ok(Self {
            walk_speed,
            run_multiplier,
            sensitivity,
        })
    }
}

impl Default for FreeLook {
    fn default() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            run_multiplier: DEFAULT_RUN_MULTIPLIER,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Locomotion for FreeLook {
    fn integrate(
        &mut self,
        pose: Pose,
        movement: Movement,
        running: bool,
        look: MouseDelta,
        dt: Duration,
    ) -> Pose {
        let heading = Vec3::new(pose.heading.x(), pose.heading.y(), pose.heading.z());
        let heading = heading.try_normalize().unwrap_or(Vec3::Z);

        let yaw = heading.x.atan2(heading.z) - look.x * self.sensitivity;
        let pitch = (heading.y.clamp(-1.0, 1.0).asin() - look.y * self.sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let right = Vec3::new(-yaw.cos(), 0.0, yaw.sin());
        let mut direction = Vec3::ZERO;
        if movement.contains(Movement::FORWARD) {
            direction += forward;
        }
        if movement.contains(Movement::BACK) {
            direction -= forward;
        }
        if movement.contains(Movement::RIGHT) {
            direction += right;
        }
        if movement.contains(Movement::LEFT) {
            direction -= right;
        }

        let speed = if running {
            self.walk_speed * self.run_multiplier
        } else {
            self.walk_speed
        };
        let step = direction.normalize_or_zero() * speed * dt.as_secs_f32();
        let x = (pose.position.x() + step.x).clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT);
        let z = (pose.position.z() + step.z).clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT);

        Pose {
            position: WorldPosition::new(x, pose.position.y(), z),
            heading: Heading::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos()),
        }
    }
}

//! Player pose, movement intent, and the clamped health meter.

use outbreak_core::{Heading, Movement, PlayerSnapshot, WorldPosition, MAX_HEALTH};

const SPAWN_POSITION: WorldPosition = WorldPosition::new(0.0, 6.0, -20.0);

/// Authoritative player state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: WorldPosition,
    heading: Heading,
    movement: Movement,
    running: bool,
    health: f32,
}

impl Player {
    /// Creates a player at the level entrance with full health.
    pub(crate) fn spawn() -> Self {
        Self {
            position: SPAWN_POSITION,
            heading: Heading::FORWARD,
            movement: Movement::IDLE,
            running: false,
            health: MAX_HEALTH,
        }
    }

    pub(crate) fn set_movement(&mut self, movement: Movement, running: bool) {
        self.movement = movement;
        self.running = running;
    }

    pub(crate) fn set_pose(&mut self, position: WorldPosition, heading: Heading) {
        self.position = position;
        self.heading = heading;
    }

    /// Removes health, never dropping below zero. Returns the amount actually removed.
    pub(crate) fn damage(&mut self, amount: f32) -> f32 {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        before - self.health
    }

    /// Adds health, never exceeding [`MAX_HEALTH`].
    pub(crate) fn restore(&mut self, amount: f32) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.health = (self.health + amount).min(MAX_HEALTH);
    }

    pub(crate) fn health(&self) -> f32 {
        self.health
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            heading: self.heading,
            movement: self.movement,
            running: self.running,
            health: self.health,
        }
    }
}

//! Seams to the platform: input, audio, locomotion, and time.

use std::{
    path::Path,
    time::{Duration, Instant},
};

use anyhow::Result as AnyResult;
use outbreak_core::{Heading, Movement, WorldPosition};

/// Keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Quits the program.
    Escape,
    /// Moves forward.
    W,
    /// Moves backward.
    S,
    /// Strafes left.
    A,
    /// Strafes right.
    D,
    /// Run modifier.
    Shift,
    /// Toggles the instructions overlay.
    Tab,
    /// Confirms the title screen.
    Enter,
    /// Forces victory.
    F12,
    /// Any other key, identified by the platform key code.
    Other(u32),
}

/// Mouse buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button; fires.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
}

/// Discrete input event delivered by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// A mouse button was pressed.
    MouseDown(MouseButton),
    /// A mouse button was released.
    MouseUp(MouseButton),
}

/// Relative mouse motion accumulated since the previous sample.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MouseDelta {
    /// Horizontal motion; positive turns right.
    pub x: f32,
    /// Vertical motion; positive looks down.
    pub y: f32,
}

/// Non-blocking source of player input.
pub trait InputSource {
    /// Returns the next pending event, if any.
    fn poll(&mut self) -> Option<InputEvent>;

    /// Samples the mouse motion since the previous call.
    fn mouse_delta(&mut self) -> MouseDelta;
}

/// Opaque handle to a loaded sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// Creates a handle from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// How a sound is mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    /// Played at a fixed volume regardless of listener position.
    Flat,
    /// Attenuated and panned relative to the listener.
    Positional,
}

/// Audio device used to play sounds.
pub trait AudioBackend {
    /// Loads a sound from disk.
    fn load(&mut self, path: &Path, mode: PlaybackMode) -> AnyResult<SoundHandle>;

    /// Starts playback from the beginning.
    fn play(&mut self, sound: SoundHandle, looped: bool);

    /// Stops playback.
    fn stop(&mut self, sound: SoundHandle);

    /// Reports whether the sound is currently audible.
    fn is_playing(&self, sound: SoundHandle) -> bool;

    /// Moves a positional sound.
    fn set_position(&mut self, sound: SoundHandle, position: WorldPosition);

    /// Moves the listener.
    fn set_listener(&mut self, position: WorldPosition, heading: Heading);
}

/// Camera pose of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Eye position.
    pub position: WorldPosition,
    /// View direction.
    pub heading: Heading,
}

/// Integrates the player's pose from movement intent and mouse look.
pub trait Locomotion {
    /// Returns the pose after `dt` of movement.
    fn integrate(
        &mut self,
        pose: Pose,
        movement: Movement,
        running: bool,
        look: MouseDelta,
        dt: Duration,
    ) -> Pose;
}

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&mut self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that advances by a fixed step every time it is read.
#[derive(Clone, Copy, Debug)]
pub struct SteppedClock {
    now: Duration,
    step: Duration,
}

impl SteppedClock {
    /// Creates a clock starting at zero.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> Duration {
        let current = self.now;
        self.now = self.now.saturating_add(self.step);
        current
    }
}

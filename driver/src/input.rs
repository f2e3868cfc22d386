//! Translation of raw input events into game intents.

use outbreak_core::{GameState, Movement};

use crate::collaborators::{InputEvent, Key, MouseButton};

/// Action requested by a single input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    Quit,
    ToggleInstructions,
    Confirm,
    ForceVictory,
    Attack,
}

/// Tracks held movement keys and maps events to intents.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InputTranslator {
    movement: Movement,
    running: bool,
}

impl InputTranslator {
    /// Handles one event. Movement, run, and attack inputs only register while playing.
    pub(crate) fn translate(&mut self, event: InputEvent, state: GameState) -> Option<Intent> {
        let playing = state.is_playing();
        match event {
            InputEvent::KeyDown(Key::Escape) => Some(Intent::Quit),
            InputEvent::KeyDown(Key::Tab) => Some(Intent::ToggleInstructions),
            InputEvent::KeyDown(Key::Enter) if state == GameState::Title => Some(Intent::Confirm),
            InputEvent::KeyDown(Key::F12) => Some(Intent::ForceVictory),
            InputEvent::KeyDown(Key::Shift) if playing => {
                self.running = true;
                None
            }
            InputEvent::KeyDown(key) if playing => {
                if let Some(direction) = direction(key) {
                    self.movement = self.movement.with(direction);
                }
                None
            }
            InputEvent::KeyUp(Key::Shift) if playing => {
                self.running = false;
                None
            }
            InputEvent::KeyUp(key) if playing => {
                if let Some(direction) = direction(key) {
                    self.movement = self.movement.without(direction);
                }
                None
            }
            InputEvent::MouseDown(MouseButton::Left) if playing => Some(Intent::Attack),
            _ => None,
        }
    }

    pub(crate) fn movement(&self) -> Movement {
        self.movement
    }

    pub(crate) fn running(&self) -> bool {
        self.running
    }
}

fn direction(key: Key) -> Option<Movement> {
    match key {
        Key::W => Some(Movement::FORWARD),
        Key::S => Some(Movement::BACK),
        Key::A => Some(Movement::LEFT),
        Key::D => Some(Movement::RIGHT),
        _ => None,
    }
}

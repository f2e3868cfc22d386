//! Scripted input sources for headless runs.

use std::collections::VecDeque;

use outbreak_driver::{InputEvent, InputSource, Key, MouseButton, MouseDelta};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DIRECTIONS: [Key; 4] = [Key::W, Key::A, Key::S, Key::D];
const STEER_CHANCE: f64 = 0.04;
const RUN_TOGGLE_CHANCE: f64 = 0.02;
const FIRE_CHANCE: f64 = 0.1;
const MAX_TURN: f32 = 6.0;

/// Input source used by the headless binary.
#[derive(Debug)]
pub(crate) enum HeadlessInput {
    /// Produces no input; the game stays on the title screen.
    Idle,
    /// Plays the game with seeded random input.
    Autopilot(Autopilot),
}

impl InputSource for HeadlessInput {
    fn poll(&mut self) -> Option<InputEvent> {
        match self {
            Self::Idle => None,
            Self::Autopilot(autopilot) => autopilot.poll(),
        }
    }

    fn mouse_delta(&mut self) -> MouseDelta {
        match self {
            Self::Idle => MouseDelta::default(),
            Self::Autopilot(autopilot) => autopilot.mouse_delta(),
        }
    }
}

/// Confirms the title screen, then wanders, turns, and fires at random.
///
/// Every tick gets its own batch of events; the batch ends when `poll`
/// returns `None`.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    pending: VecDeque<InputEvent>,
    batch_open: bool,
    confirmed: bool,
    held: Option<Key>,
    running: bool,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: VecDeque::new(),
            batch_open: false,
            confirmed: false,
            held: None,
            running: false,
        }
    }

    fn plan_batch(&mut self) {
        if !self.confirmed {
            self.confirmed = true;
            self.pending.push_back(InputEvent::KeyDown(Key::Enter));
            return;
        }

        if self.rng.gen_bool(STEER_CHANCE) {
            if let Some(key) = self.held.take() {
                self.pending.push_back(InputEvent::KeyUp(key));
            }
            let index = self.rng.gen_range(0..=DIRECTIONS.len());
            if let Some(key) = DIRECTIONS.get(index).copied() {
                self.held = Some(key);
                self.pending.push_back(InputEvent::KeyDown(key));
            }
        }

        if self.rng.gen_bool(RUN_TOGGLE_CHANCE) {
            self.running = !self.running;
            self.pending.push_back(if self.running {
                InputEvent::KeyDown(Key::Shift)
            } else {
                InputEvent::KeyUp(Key::Shift)
            });
        }

        if self.rng.gen_bool(FIRE_CHANCE) {
            self.pending.push_back(InputEvent::MouseDown(MouseButton::Left));
            self.pending.push_back(InputEvent::MouseUp(MouseButton::Left));
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self) -> Option<InputEvent> {
        if !self.batch_open {
            self.batch_open = true;
            self.plan_batch();
        }

        let event = self.pending.pop_front();
        if event.is_none() {
            self.batch_open = false;
        }
        event
    }

    fn mouse_delta(&mut self) -> MouseDelta {
        MouseDelta {
            x: self.rng.gen_range(-MAX_TURN..MAX_TURN),
            y: 0.0,
        }
    }
}

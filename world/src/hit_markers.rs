//! Fixed-capacity ring of transient hit markers.

use std::time::Duration;

use outbreak_core::{HitMarkerSnapshot, WorldPosition, HIT_MARKER_CAPACITY};

#[derive(Clone, Copy, Debug, Default)]
struct HitMarker {
    position: WorldPosition,
    remaining: Duration,
}

/// Round-robin buffer; a new marker replaces the oldest slot whether or not it expired.
#[derive(Clone, Debug)]
pub(crate) struct HitMarkerRing {
    slots: [HitMarker; HIT_MARKER_CAPACITY],
    next: usize,
}

impl HitMarkerRing {
    pub(crate) fn new() -> Self {
        Self {
            slots: [HitMarker::default(); HIT_MARKER_CAPACITY],
            next: 0,
        }
    }

    pub(crate) fn push(&mut self, position: WorldPosition, duration: Duration) {
        self.slots[self.next] = HitMarker {
            position,
            remaining: duration,
        };
        self.next = (self.next + 1) % HIT_MARKER_CAPACITY;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        for slot in &mut self.slots {
            slot.remaining = slot.remaining.saturating_sub(dt);
        }
    }

    pub(crate) fn live(&self) -> Vec<HitMarkerSnapshot> {
        self.slots
            .iter()
            .filter(|slot| !slot.remaining.is_zero())
            .map(|slot| HitMarkerSnapshot {
                position: slot.position,
                remaining: slot.remaining,
            })
            .collect()
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Outbreak adapters.
//!
//! The crate supplies the frustum-backed [`SpatialQuery`] used for culling and
//! attack tests, the per-frame [`Scene`] description, and the
//! [`RenderingBackend`] seam that presents it.
//!
//! [`SpatialQuery`]: outbreak_core::SpatialQuery

mod frustum;
mod scene;

use anyhow::Result as AnyResult;
use log::debug;

pub use frustum::{ray_vs_sphere, FrustumSpatialQuery, Projection, RenderingError};
pub use scene::{
    FirstAidPresentation, HealthBand, HitMarkerPresentation, Hud, MonsterPresentation, Scene,
    SiteEffectPresentation,
};

/// Rendering backend capable of presenting Outbreak scenes.
pub trait RenderingBackend {
    /// Presents a single captured frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend that draws nothing and only keeps frame statistics.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    frames: u64,
    last_hud: Option<Hud>,
}

impl HeadlessBackend {
    /// Creates a new headless backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Heads-up display of the most recently presented frame.
    #[must_use]
    pub fn last_hud(&self) -> Option<Hud> {
        self.last_hud
    }
}

impl RenderingBackend for HeadlessBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames = self.frames.saturating_add(1);
        self.last_hud = Some(scene.hud);
        debug!(
            "frame {}: {} monsters, {} first aid, {} markers in view",
            self.frames,
            scene.monsters.len(),
            scene.first_aid.len(),
            scene.hit_markers.len()
        );
        Ok(())
    }
}

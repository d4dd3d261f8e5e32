//! Scene: the per-frame state machine tying store, physics and renderer together.
//!
//! A [`Scene`] owns one [`ComponentStore`](ember_ecs::ComponentStore), one
//! camera, an optional physics world and a list of frame scripts.
//! [`Scene::update`] runs one frame in a fixed order: clock and camera,
//! one physics step, clear, scripts and draws, physics sync, submit.
//!
//! # Invariants
//! - Physics steps exactly once per update.
//! - Every store mutation of a frame happens before that frame is submitted.
//! - Bodies are created once, before the first update; any later start is an error.
//! - A frame that fails is aborted, never left open.

mod clock;
mod config;
pub mod demo;
mod entity;
mod scene;

pub use clock::FrameClock;
pub use config::{ConfigError, EngineConfig};
pub use entity::{Entity, EntityMut};
pub use scene::{Scene, SceneState};

use ember_assets::AssetError;
use ember_common::EntityHandle;
use ember_ecs::EcsError;
use ember_physics::PhysicsError;
use ember_render::RenderError;

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("scene already started")]
    AlreadyStarted,
    #[error("scene cannot start after it has run")]
    StartAfterRun,
    #[error("entity {0} has no physics body")]
    NotSimulated(EntityHandle),
}

//! rapier3d physics integration.
//!
//! The [`PhysicsWorld`] owns a rapier simulation. The scene creates bodies
//! and colliders through it once at start, steps it once per frame, and
//! reads body translations back into entity transforms.
//!
//! # Invariants
//! - rapier owns body and collider storage; the ECS only keeps handles.
//! - Every body and collider lookup by a stale handle is an error, never a panic.

mod config;
mod world;

pub use config::PhysicsConfig;
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
pub use world::{BodyDesc, BodyKind, ColliderShape, PhysicsWorld};

/// Errors from physics operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("invalid trimesh collider: {0}")]
    InvalidTrimesh(String),
    #[error("rigid body {0:?} does not exist")]
    UnknownBody(RigidBodyHandle),
}

//! Entity-component store for the ember runtime.
//!
//! Each component kind has its own table keyed by [`EntityHandle`]. Tables
//! keep insertion order, and a view over several kinds walks the first
//! kind's table in that order, so draw order is stable frame to frame.
//!
//! # Invariants
//! - A table holds at most one value per entity; writing again overwrites in place.
//! - Handles grow monotonically and are never reused, even after destruction.
//! - Absent components are `None`, never a default-constructed value.
//! - The set of component kinds is closed and checked at compile time.

mod component;
mod components;
mod store;
mod table;
mod view;

pub use component::{Component, ComponentKind};
pub use components::{Identity, Material, MaterialUniforms, MeshRef, RigidBody, Tag};
pub use ember_common::{EntityHandle, Transform};
pub use store::ComponentStore;
pub use table::Table;
pub use view::{View, ViewQuery};

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("entity {entity} has no {kind} component")]
    MissingComponent {
        entity: EntityHandle,
        kind: ComponentKind,
    },
    #[error("entity {0} is not alive")]
    DeadEntity(EntityHandle),
}

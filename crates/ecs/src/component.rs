use crate::store::ComponentStore;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Run-time name of a component kind, used for diagnostics and kind-list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Identity,
    Tag,
    Transform,
    Mesh,
    Material,
    RigidBody,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Identity,
        ComponentKind::Tag,
        ComponentKind::Transform,
        ComponentKind::Mesh,
        ComponentKind::Material,
        ComponentKind::RigidBody,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Identity => "identity",
            ComponentKind::Tag => "tag",
            ComponentKind::Transform => "transform",
            ComponentKind::Mesh => "mesh",
            ComponentKind::Material => "material",
            ComponentKind::RigidBody => "rigid_body",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A type stored in one of the store's tables.
///
/// Sealed: only the kinds listed in [`ComponentKind`] implement it, which is
/// what lets the store hold one concrete table per kind.
pub trait Component: sealed::Sealed + Sized + 'static {
    const KIND: ComponentKind;

    #[doc(hidden)]
    fn table(store: &ComponentStore) -> &Table<Self>;

    #[doc(hidden)]
    fn table_mut(store: &mut ComponentStore) -> &mut Table<Self>;
}

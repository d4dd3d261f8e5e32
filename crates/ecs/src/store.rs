use crate::component::{Component, ComponentKind, sealed};
use crate::components::{Identity, Material, MeshRef, RigidBody, Tag};
use crate::table::Table;
use crate::view::{View, ViewQuery};
use crate::EcsError;
use ember_common::{EntityHandle, Transform};
use std::collections::BTreeSet;

/// Per-kind component tables plus the entity allocator.
///
/// One field per component kind; the [`Component`] impls below route a type
/// to its table, so every typed operation is checked at compile time.
#[derive(Debug, Default)]
pub struct ComponentStore {
    next_entity: u64,
    destroyed: BTreeSet<EntityHandle>,
    identities: Table<Identity>,
    tags: Table<Tag>,
    transforms: Table<Transform>,
    meshes: Table<MeshRef>,
    materials: Table<Material>,
    rigid_bodies: Table<RigidBody>,
}

macro_rules! impl_component {
    ($ty:ty, $field:ident, $kind:expr) => {
        impl sealed::Sealed for $ty {}

        impl Component for $ty {
            const KIND: ComponentKind = $kind;

            fn table(store: &ComponentStore) -> &Table<Self> {
                &store.$field
            }

            fn table_mut(store: &mut ComponentStore) -> &mut Table<Self> {
                &mut store.$field
            }
        }
    };
}

impl_component!(Identity, identities, ComponentKind::Identity);
impl_component!(Tag, tags, ComponentKind::Tag);
impl_component!(Transform, transforms, ComponentKind::Transform);
impl_component!(MeshRef, meshes, ComponentKind::Mesh);
impl_component!(Material, materials, ComponentKind::Material);
impl_component!(RigidBody, rigid_bodies, ComponentKind::RigidBody);

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next unused handle. The first is `#0`.
    pub fn create_entity(&mut self) -> EntityHandle {
        let entity = EntityHandle(self.next_entity);
        self.next_entity += 1;
        entity
    }

    /// Whether the handle was allocated and not destroyed.
    pub fn is_alive(&self, entity: EntityHandle) -> bool {
        entity.0 < self.next_entity && !self.destroyed.contains(&entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.next_entity as usize - self.destroyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles in allocation order.
    pub fn entities(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        (0..self.next_entity)
            .map(EntityHandle)
            .filter(|e| !self.destroyed.contains(e))
    }

    /// Insert or overwrite a component. An overwrite keeps the entity's
    /// position in the table's iteration order.
    pub fn add_component<C: Component>(
        &mut self,
        entity: EntityHandle,
        value: C,
    ) -> Result<&mut C, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        tracing::debug!(%entity, kind = %C::KIND, "add component");
        Ok(C::table_mut(self).insert(entity, value))
    }

    pub fn get_component<C: Component>(&self, entity: EntityHandle) -> Option<&C> {
        C::table(self).get(entity)
    }

    pub fn get_component_mut<C: Component>(&mut self, entity: EntityHandle) -> Option<&mut C> {
        C::table_mut(self).get_mut(entity)
    }

    /// Like [`get_component`](Self::get_component), but a missing component is an error.
    pub fn require<C: Component>(&self, entity: EntityHandle) -> Result<&C, EcsError> {
        self.get_component(entity)
            .ok_or(EcsError::MissingComponent {
                entity,
                kind: C::KIND,
            })
    }

    pub fn remove_component<C: Component>(&mut self, entity: EntityHandle) -> Option<C> {
        C::table_mut(self).remove(entity)
    }

    pub fn has<C: Component>(&self, entity: EntityHandle) -> bool {
        C::table(self).contains(entity)
    }

    /// Run-time kind lookup.
    pub fn contains(&self, kind: ComponentKind, entity: EntityHandle) -> bool {
        match kind {
            ComponentKind::Identity => self.identities.contains(entity),
            ComponentKind::Tag => self.tags.contains(entity),
            ComponentKind::Transform => self.transforms.contains(entity),
            ComponentKind::Mesh => self.meshes.contains(entity),
            ComponentKind::Material => self.materials.contains(entity),
            ComponentKind::RigidBody => self.rigid_bodies.contains(entity),
        }
    }

    /// Remove every component of the entity and retire its handle.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: EntityHandle) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.identities.remove(entity);
        self.tags.remove(entity);
        self.transforms.remove(entity);
        self.meshes.remove(entity);
        self.materials.remove(entity);
        self.rigid_bodies.remove(entity);
        self.destroyed.insert(entity);
        tracing::debug!(%entity, "destroyed entity");
        true
    }

    /// Read-only access to the table for one kind.
    pub fn table<C: Component>(&self) -> &Table<C> {
        C::table(self)
    }

    /// Lazy intersection over the given kinds, in the first kind's insertion order.
    pub fn view<Q: ViewQuery>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Entities holding every listed kind, in the first kind's insertion order.
    pub fn entities_with(&self, kinds: &[ComponentKind]) -> Vec<EntityHandle> {
        let Some((first, rest)) = kinds.split_first() else {
            return Vec::new();
        };
        self.handles_of(*first)
            .into_iter()
            .filter(|e| rest.iter().all(|k| self.contains(*k, *e)))
            .collect()
    }

    fn handles_of(&self, kind: ComponentKind) -> Vec<EntityHandle> {
        match kind {
            ComponentKind::Identity => self.identities.handles().collect(),
            ComponentKind::Tag => self.tags.handles().collect(),
            ComponentKind::Transform => self.transforms.handles().collect(),
            ComponentKind::Mesh => self.meshes.handles().collect(),
            ComponentKind::Material => self.materials.handles().collect(),
            ComponentKind::RigidBody => self.rigid_bodies.handles().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_assets::{Mesh, primitives};
    use ember_common::BufferHandle;
    use glam::Vec3;
    use std::sync::Arc;

    fn shared_mesh() -> Arc<Mesh> {
        Arc::new(Mesh::new(
            "triangle",
            primitives::triangle(),
            BufferHandle(0),
            BufferHandle(1),
        ))
    }

    #[test]
    fn handles_start_at_zero_and_increase() {
        let mut store = ComponentStore::new();
        assert_eq!(store.create_entity(), EntityHandle(0));
        assert_eq!(store.create_entity(), EntityHandle(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn last_write_wins() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Tag::from("first")).unwrap();
        store.add_component(e, Tag::from("second")).unwrap();
        assert_eq!(store.get_component::<Tag>(e).unwrap().as_str(), "second");
        assert_eq!(store.table::<Tag>().len(), 1);
    }

    #[test]
    fn absent_component_is_none() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        assert!(store.get_component::<Transform>(e).is_none());
        assert!(store.get_component::<Transform>(EntityHandle(99)).is_none());
        assert_eq!(
            store.require::<Transform>(e).unwrap_err(),
            EcsError::MissingComponent {
                entity: e,
                kind: ComponentKind::Transform
            }
        );
    }

    #[test]
    fn add_to_unallocated_handle_fails() {
        let mut store = ComponentStore::new();
        assert_eq!(
            store.add_component(EntityHandle(3), Tag::from("x")).unwrap_err(),
            EcsError::DeadEntity(EntityHandle(3))
        );
    }

    #[test]
    fn add_component_returns_stored_value() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        let t = store.add_component(e, Transform::default()).unwrap();
        t.position.x = 4.0;
        assert_eq!(store.get_component::<Transform>(e).unwrap().position.x, 4.0);
    }

    #[test]
    fn destroyed_handles_are_not_reused() {
        let mut store = ComponentStore::new();
        let a = store.create_entity();
        store.add_component(a, Tag::from("a")).unwrap();
        store.add_component(a, Transform::default()).unwrap();
        assert!(store.destroy_entity(a));
        assert!(!store.destroy_entity(a));
        assert!(!store.is_alive(a));
        assert!(store.get_component::<Tag>(a).is_none());
        assert!(store.add_component(a, Tag::from("again")).is_err());
        assert_eq!(store.create_entity(), EntityHandle(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entities().collect::<Vec<_>>(), vec![EntityHandle(1)]);
    }

    #[test]
    fn view_intersects_in_first_table_order() {
        let mut store = ComponentStore::new();
        let e0 = store.create_entity();
        let e1 = store.create_entity();
        let e2 = store.create_entity();
        store.add_component(e2, Transform::default()).unwrap();
        store.add_component(e0, Transform::default()).unwrap();
        store.add_component(e1, Transform::default()).unwrap();
        store.add_component(e0, Tag::from("zero")).unwrap();
        store.add_component(e2, Tag::from("two")).unwrap();

        let hits: Vec<EntityHandle> = store.view::<(Transform, Tag)>().map(|(e, _)| e).collect();
        assert_eq!(hits, vec![e2, e0]);

        let tags: Vec<&str> = store
            .view::<(Tag, Transform)>()
            .map(|(_, (tag, _))| tag.as_str())
            .collect();
        assert_eq!(tags, vec!["zero", "two"]);
    }

    #[test]
    fn view_of_nothing_is_empty() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Transform::default()).unwrap();
        assert_eq!(store.view::<()>().count(), 0);
        assert!(store.entities_with(&[]).is_empty());
    }

    #[test]
    fn views_are_repeatable() {
        let mut store = ComponentStore::new();
        for i in 0..5 {
            let e = store.create_entity();
            store.add_component(e, Transform::from_position(Vec3::splat(i as f32))).unwrap();
            if i % 2 == 0 {
                store.add_component(e, Material::basic()).unwrap();
            }
        }
        let first: Vec<_> = store.view::<(Transform, Material)>().map(|(e, _)| e).collect();
        let second: Vec<_> = store.view::<(Transform, Material)>().map(|(e, _)| e).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn entities_with_matches_typed_view() {
        let mut store = ComponentStore::new();
        for i in 0..6 {
            let e = store.create_entity();
            store.add_component(e, Transform::default()).unwrap();
            if i % 3 != 0 {
                store.add_component(e, RigidBody::dynamic()).unwrap();
            }
        }
        let typed: Vec<_> = store.view::<(Transform, RigidBody)>().map(|(e, _)| e).collect();
        let dynamic = store.entities_with(&[ComponentKind::Transform, ComponentKind::RigidBody]);
        assert_eq!(typed, dynamic);
        assert_eq!(dynamic.len(), 4);
    }

    #[test]
    fn entities_share_one_mesh() {
        let mut store = ComponentStore::new();
        let mesh = shared_mesh();
        let a = store.create_entity();
        let b = store.create_entity();
        store.add_component(a, MeshRef::new(mesh.clone())).unwrap();
        store.add_component(b, MeshRef::new(mesh.clone())).unwrap();
        store.add_component(a, Transform::from_position(Vec3::X)).unwrap();
        store.add_component(b, Transform::from_position(Vec3::Y)).unwrap();

        let views: Vec<_> = store.view::<(MeshRef, Transform)>().collect();
        assert_eq!(views.len(), 2);
        assert!(views[0].1.0.shares(views[1].1.0));
        assert_ne!(views[0].1.1.position, views[1].1.1.position);
        assert_eq!(Arc::strong_count(&mesh), 3);
    }

    #[test]
    fn six_kind_view() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Identity::new()).unwrap();
        store.add_component(e, Tag::from("full")).unwrap();
        store.add_component(e, Transform::default()).unwrap();
        store.add_component(e, MeshRef::new(shared_mesh())).unwrap();
        store.add_component(e, Material::default()).unwrap();
        store.add_component(e, RigidBody::fixed()).unwrap();
        let other = store.create_entity();
        store.add_component(other, Identity::new()).unwrap();

        let hits: Vec<_> = store
            .view::<(Identity, Tag, Transform, MeshRef, Material, RigidBody)>()
            .map(|(e, _)| e)
            .collect();
        assert_eq!(hits, vec![e]);
        assert!(ComponentKind::ALL.iter().all(|k| store.contains(*k, e)));
    }

    #[test]
    fn remove_component_returns_value() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Tag::from("gone")).unwrap();
        assert_eq!(store.remove_component::<Tag>(e), Some(Tag::from("gone")));
        assert!(!store.has::<Tag>(e));
        assert!(store.remove_component::<Tag>(e).is_none());
    }
}

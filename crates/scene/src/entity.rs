use crate::{Scene, SceneError};
use ember_common::EntityHandle;
use ember_ecs::{Component, Tag};

/// Read-only view of one entity in a scene.
#[derive(Clone, Copy)]
pub struct Entity<'a> {
    handle: EntityHandle,
    scene: &'a Scene,
}

impl<'a> Entity<'a> {
    pub(crate) fn new(handle: EntityHandle, scene: &'a Scene) -> Self {
        Self { handle, scene }
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn get<C: Component>(&self) -> Option<&'a C> {
        self.scene.store().get_component(self.handle)
    }

    pub fn has<C: Component>(&self) -> bool {
        self.scene.store().has::<C>(self.handle)
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.get::<Tag>().map(Tag::as_str)
    }
}

/// Mutable access to one entity in a scene.
pub struct EntityMut<'a> {
    handle: EntityHandle,
    scene: &'a mut Scene,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(handle: EntityHandle, scene: &'a mut Scene) -> Self {
        Self { handle, scene }
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        self.scene.store().get_component(self.handle)
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.scene.store_mut().get_component_mut(self.handle)
    }

    pub fn has<C: Component>(&self) -> bool {
        self.scene.store().has::<C>(self.handle)
    }

    /// Attach or overwrite a component; returns the stored value.
    pub fn insert<C: Component>(&mut self, value: C) -> Result<&mut C, SceneError> {
        Ok(self.scene.store_mut().add_component(self.handle, value)?)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<C: Component>(mut self, value: C) -> Result<Self, SceneError> {
        self.insert(value)?;
        Ok(self)
    }

    pub fn as_entity(&self) -> Entity<'_> {
        Entity::new(self.handle, &*self.scene)
    }
}

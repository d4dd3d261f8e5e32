use crate::{EngineConfig, Entity, EntityMut, FrameClock, SceneError};
use ember_common::EntityHandle;
use ember_ecs::{ComponentStore, Identity, Material, MeshRef, RigidBody, Tag, Transform};
use ember_input::InputState;
use ember_physics::{BodyDesc, ColliderShape, PhysicsWorld};
use ember_render::{Camera, FrameStats, RenderBackend, RenderError, Renderer};
use glam::Vec3;

type FrameScript = Box<dyn FnMut(&mut ComponentStore, &FrameClock)>;

/// Lifecycle of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Built, not yet started or updated.
    Constructed,
    /// Physics bodies created; no frame run yet.
    Started,
    /// At least one update has run.
    Running,
}

/// Owns the component store, camera, physics world and frame scripts.
pub struct Scene {
    store: ComponentStore,
    camera: Camera,
    physics: Option<PhysicsWorld>,
    scripts: Vec<FrameScript>,
    clock: FrameClock,
    state: SceneState,
}

impl Default for Scene {
    /// Default camera, no physics.
    fn default() -> Self {
        Self::new(Camera::default(), None)
    }
}

impl Scene {
    pub fn new(camera: Camera, physics: Option<PhysicsWorld>) -> Self {
        Self {
            store: ComponentStore::new(),
            camera,
            physics,
            scripts: Vec::new(),
            clock: FrameClock::default(),
            state: SceneState::Constructed,
        }
    }

    /// Camera and physics built from config; physics is skipped when disabled.
    pub fn from_config(config: &EngineConfig) -> Self {
        let physics = config
            .physics
            .enabled
            .then(|| PhysicsWorld::new(&config.physics));
        Self::new(Camera::new(&config.camera), physics)
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics.as_ref()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Create an entity with a fresh identity, the given tag and a default transform.
    pub fn add_entity(&mut self, tag: &str) -> Result<EntityMut<'_>, SceneError> {
        let handle = self.store.create_entity();
        self.store.add_component(handle, Identity::new())?;
        self.store.add_component(handle, Tag::from(tag))?;
        self.store.add_component(handle, Transform::default())?;
        Ok(EntityMut::new(handle, self))
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<Entity<'_>> {
        self.store
            .is_alive(handle)
            .then(|| Entity::new(handle, self))
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<EntityMut<'_>> {
        if self.store.is_alive(handle) {
            Some(EntityMut::new(handle, self))
        } else {
            None
        }
    }

    /// First entity, in tag insertion order, carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityHandle> {
        self.store
            .view::<(Tag,)>()
            .find(|(_, (t,))| t.as_str() == tag)
            .map(|(e, _)| e)
    }

    /// Register game logic run every frame before draws are recorded.
    pub fn add_script(&mut self, script: impl FnMut(&mut ComponentStore, &FrameClock) + 'static) {
        self.scripts.push(Box::new(script));
    }

    /// Create a physics body for every entity with a tag, transform and rigid
    /// body, plus a trimesh collider when the entity has a mesh.
    pub fn on_start(&mut self) -> Result<(), SceneError> {
        match self.state {
            SceneState::Constructed => {}
            SceneState::Started => return Err(SceneError::AlreadyStarted),
            SceneState::Running => return Err(SceneError::StartAfterRun),
        }
        if let Some(physics) = self.physics.as_mut() {
            let pending: Vec<_> = self
                .store
                .view::<(Tag, Transform, RigidBody)>()
                .map(|(entity, (tag, transform, body))| {
                    let shape = self
                        .store
                        .get_component::<MeshRef>(entity)
                        .map(|mesh| ColliderShape::trimesh(&mesh.data));
                    (entity, tag.0.clone(), transform.position, body.kind, shape)
                })
                .collect();

            for (entity, tag, position, kind, shape) in pending {
                let body = physics.create_rigid_body(&BodyDesc {
                    kind,
                    translation: position,
                });
                let collider = match shape {
                    Some(shape) => Some(physics.create_collider(&shape, body)?),
                    None => None,
                };
                tracing::debug!(%entity, tag = %tag, ?kind, has_collider = collider.is_some(), "created body");
                if let Some(rb) = self.store.get_component_mut::<RigidBody>(entity) {
                    rb.body = Some(body);
                    rb.collider = collider;
                }
            }
            tracing::info!(bodies = physics.body_count(), "scene started");
        } else {
            tracing::info!("scene started without physics");
        }
        self.state = SceneState::Started;
        Ok(())
    }

    /// Run one frame and submit it through `renderer`.
    pub fn update<B: RenderBackend>(
        &mut self,
        dt: f32,
        input: &InputState,
        renderer: &mut Renderer<B>,
    ) -> Result<FrameStats, SceneError> {
        self.clock.advance(dt);
        self.camera.update(self.clock.dt, input);

        if let Some(physics) = self.physics.as_mut() {
            physics.step();
        }

        renderer.begin_frame()?;
        self.state = SceneState::Running;

        for script in &mut self.scripts {
            script(&mut self.store, &self.clock);
        }
        let drawn = self.record_draws(renderer);
        self.sync_physics();

        // A failed frame is dropped so the next update can acquire a new one.
        match drawn.and_then(|()| renderer.end_frame()) {
            Ok(stats) => Ok(stats),
            Err(e) => {
                renderer.abort_frame();
                Err(e.into())
            }
        }
    }

    fn record_draws<B: RenderBackend>(&self, renderer: &mut Renderer<B>) -> Result<(), RenderError> {
        for (_, (transform, mesh, material)) in self.store.view::<(Transform, MeshRef, Material)>() {
            renderer.render_mesh(transform, mesh, material, &self.camera)?;
        }
        Ok(())
    }

    /// Copy body translations into transforms.
    fn sync_physics(&mut self) {
        let Some(physics) = self.physics.as_ref() else {
            return;
        };
        let moved: Vec<(EntityHandle, Vec3)> = self
            .store
            .view::<(Transform, RigidBody)>()
            .filter_map(|(entity, (_, rb))| {
                let body = rb.body?;
                physics.translation(body).map(|t| (entity, t))
            })
            .collect();
        for (entity, translation) in moved {
            if let Some(transform) = self.store.get_component_mut::<Transform>(entity) {
                transform.position = translation;
            }
        }
    }

    /// Teleport an entity's body to `position`, stop it, and move its transform.
    pub fn reset_body(&mut self, entity: EntityHandle, position: Vec3) -> Result<(), SceneError> {
        let rb = *self.store.require::<RigidBody>(entity)?;
        let (Some(body), Some(physics)) = (rb.body, self.physics.as_mut()) else {
            return Err(SceneError::NotSimulated(entity));
        };
        physics.reset_body(body, position)?;
        if let Some(transform) = self.store.get_component_mut::<Transform>(entity) {
            transform.position = position;
        }
        tracing::debug!(%entity, ?position, "reset body");
        Ok(())
    }

    /// Remove an entity, its components and its physics body.
    pub fn destroy_entity(&mut self, entity: EntityHandle) -> bool {
        let body = self
            .store
            .get_component::<RigidBody>(entity)
            .and_then(|rb| rb.body);
        if let (Some(body), Some(physics)) = (body, self.physics.as_mut()) {
            physics.remove_body(body);
        }
        self.store.destroy_entity(entity)
    }
}

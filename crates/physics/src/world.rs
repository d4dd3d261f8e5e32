use crate::{PhysicsConfig, PhysicsError};
use ember_assets::MeshData;
use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Mass added to every dynamic body. An open or flat trimesh contributes
/// none, and a massless body ignores gravity.
const BASE_DYNAMIC_MASS: Real = 1.0;

/// How the solver treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Fully simulated.
    Dynamic,
    /// Immovable.
    Static,
}

/// Descriptor for a new rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub translation: Vec3,
}

/// Collider geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Triangle mesh built from raw vertex and index arrays.
    TriMesh {
        vertices: Vec<[f32; 3]>,
        indices: Vec<[u32; 3]>,
    },
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

impl ColliderShape {
    pub fn trimesh(mesh: &MeshData) -> Self {
        Self::TriMesh {
            vertices: mesh.positions.clone(),
            indices: mesh.triangles(),
        }
    }
}

/// Owns the rapier simulation state.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let [gx, gy, gz] = config.gravity;
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = config.timestep;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gx, gy, gz],
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            steps: 0,
        }
    }

    pub fn create_rigid_body(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let t = desc.translation;
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().additional_mass(BASE_DYNAMIC_MASS),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let handle = self
            .bodies
            .insert(builder.translation(vector![t.x, t.y, t.z]).build());
        tracing::debug!(?handle, kind = ?desc.kind, translation = ?t, "created rigid body");
        handle
    }

    /// Attach a collider to an existing body.
    pub fn create_collider(
        &mut self,
        shape: &ColliderShape,
        body: RigidBodyHandle,
    ) -> Result<ColliderHandle, PhysicsError> {
        if !self.bodies.contains(body) {
            return Err(PhysicsError::UnknownBody(body));
        }
        let builder = match shape {
            ColliderShape::TriMesh { vertices, indices } => {
                validate_trimesh(vertices, indices)?;
                let points = vertices.iter().map(|v| point![v[0], v[1], v[2]]).collect();
                ColliderBuilder::trimesh(points, indices.clone())
            }
            ColliderShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
            ColliderShape::Ball { radius } => ColliderBuilder::ball(*radius),
        };
        let handle =
            self.colliders
                .insert_with_parent(builder.build(), body, &mut self.bodies);
        Ok(handle)
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.steps += 1;
    }

    /// Current translation of a body, or `None` for an unknown handle.
    pub fn translation(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.bodies
            .get(body)
            .map(|rb| {
                let t = rb.translation();
                Vec3::new(t.x, t.y, t.z)
            })
    }

    /// Teleport a body and zero its linear and angular velocity.
    pub fn reset_body(
        &mut self,
        body: RigidBodyHandle,
        translation: Vec3,
    ) -> Result<(), PhysicsError> {
        let rb = self
            .bodies
            .get_mut(body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        rb.set_translation(vector![translation.x, translation.y, translation.z], true);
        rb.set_linvel(Vector::zeros(), true);
        rb.set_angvel(Vector::zeros(), true);
        Ok(())
    }

    /// Remove a body and every collider attached to it.
    pub fn remove_body(&mut self, body: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                body,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

fn validate_trimesh(vertices: &[[f32; 3]], indices: &[[u32; 3]]) -> Result<(), PhysicsError> {
    if vertices.is_empty() || indices.is_empty() {
        return Err(PhysicsError::InvalidTrimesh("mesh has no triangles".into()));
    }
    let n = vertices.len() as u32;
    if let Some(tri) = indices.iter().find(|tri| tri.iter().any(|&i| i >= n)) {
        return Err(PhysicsError::InvalidTrimesh(format!(
            "triangle {tri:?} references a vertex past {n}"
        )));
    }
    Ok(())
}

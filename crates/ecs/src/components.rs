use ember_assets::Mesh;
use ember_common::{PipelineKind, TextureHandle};
use ember_physics::{BodyKind, ColliderHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

/// Immutable unique identifier, set once when the entity is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub Uuid);

impl Identity {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Shared reference to uploaded geometry. Cloning shares the mesh.
#[derive(Debug, Clone)]
pub struct MeshRef(pub Arc<Mesh>);

impl MeshRef {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self(mesh)
    }

    /// Whether two references point at the same mesh.
    pub fn shares(&self, other: &MeshRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for MeshRef {
    type Target = Mesh;

    fn deref(&self) -> &Mesh {
        &self.0
    }
}

/// Extra per-material uniform data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialUniforms {
    /// RGBA multiplier applied by tinted pipelines.
    pub tint: [f32; 4],
}

impl Default for MaterialUniforms {
    fn default() -> Self {
        Self {
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Selects the pipeline a mesh is drawn with.
///
/// A material without a pipeline tag is drawn with [`PipelineKind::BASIC_MESH`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub pipeline: Option<PipelineKind>,
    pub uniforms: Option<MaterialUniforms>,
    pub texture: Option<TextureHandle>,
}

impl Material {
    pub fn new(pipeline: impl Into<PipelineKind>) -> Self {
        Self {
            pipeline: Some(pipeline.into()),
            ..Self::default()
        }
    }

    pub fn basic() -> Self {
        Self::new(PipelineKind::BASIC_MESH)
    }

    /// Tinted pipeline with the given RGBA tint.
    pub fn tinted(tint: [f32; 4]) -> Self {
        Self {
            pipeline: Some(PipelineKind::TINTED_MESH),
            uniforms: Some(MaterialUniforms { tint }),
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// The pipeline this material resolves to.
    pub fn pipeline_kind(&self) -> PipelineKind {
        self.pipeline.clone().unwrap_or_default()
    }
}

/// Physics participation. Handles are filled in when the scene starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub body: Option<RigidBodyHandle>,
    pub collider: Option<ColliderHandle>,
}

impl RigidBody {
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            body: None,
            collider: None,
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyKind::Dynamic)
    }

    pub fn fixed() -> Self {
        Self::new(BodyKind::Static)
    }

    pub fn is_wired(&self) -> bool {
        self.body.is_some()
    }
}

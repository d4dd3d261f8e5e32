use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A GPU buffer owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferHandle(pub u64);

/// A compiled render pipeline owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineHandle(pub u64);

/// A bound-resource set linking a uniform buffer to a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindGroupHandle(pub u64);

/// A texture owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Tag selecting which compiled pipeline and uniform layout a draw uses.
///
/// Built-in kinds are associated constants; custom kinds can be registered
/// at runtime under any name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PipelineKind(Cow<'static, str>);

impl PipelineKind {
    pub const BASIC_MESH: PipelineKind = PipelineKind(Cow::Borrowed("basic_mesh"));
    pub const TINTED_MESH: PipelineKind = PipelineKind(Cow::Borrowed("tinted_mesh"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PipelineKind {
    fn default() -> Self {
        Self::BASIC_MESH
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for PipelineKind {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_compare_by_name() {
        assert_eq!(PipelineKind::new("basic_mesh"), PipelineKind::BASIC_MESH);
        assert_eq!(PipelineKind::from("tinted_mesh"), PipelineKind::TINTED_MESH);
        assert_ne!(PipelineKind::BASIC_MESH, PipelineKind::TINTED_MESH);
    }

    #[test]
    fn default_kind_is_basic_mesh() {
        assert_eq!(PipelineKind::default().as_str(), "basic_mesh");
    }
}

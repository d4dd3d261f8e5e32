use serde::{Deserialize, Serialize};

/// Physics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// When false the scene runs without a physics world.
    pub enabled: bool,
    pub gravity: [f32; 3],
    /// Fixed simulation step, in seconds.
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gravity: [0.0, -0.25, 0.0],
            timestep: 1.0 / 60.0,
        }
    }
}

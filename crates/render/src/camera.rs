use ember_input::{Action, InputState};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Starting pose and tuning for [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Radians; 0 looks down -Z.
    pub yaw: f32,
    /// Radians.
    pub pitch: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub rotate_speed: f32,
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            yaw: 0.0,
            pitch: 0.0,
            move_speed: 10.0,
            rotate_speed: PI / 1.5,
            pitch_limit: 1.55,
        }
    }
}

/// Fly camera driven by held keys.
/// Camera motion lives outside the component store.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub rotate_speed: f32,
    pub pitch_limit: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            yaw: config.yaw,
            pitch: config.pitch.clamp(-config.pitch_limit, config.pitch_limit),
            move_speed: config.move_speed,
            rotate_speed: config.rotate_speed,
            pitch_limit: config.pitch_limit,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            -self.pitch.cos() * self.yaw.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move and turn according to the actions held in `input`.
    ///
    /// Translation uses the basis from before this frame's rotation.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        let step = self.move_speed * dt;
        let turn = self.rotate_speed * dt;
        let (forward, right, up) = (self.forward(), self.right(), self.up());

        let mut delta = Vec3::ZERO;
        if input.is_action_held(Action::MoveForward) {
            delta += forward;
        }
        if input.is_action_held(Action::MoveBackward) {
            delta -= forward;
        }
        if input.is_action_held(Action::StrafeLeft) {
            delta -= right;
        }
        if input.is_action_held(Action::StrafeRight) {
            delta += right;
        }
        if input.is_action_held(Action::MoveUp) {
            delta += up;
        }
        if input.is_action_held(Action::MoveDown) {
            delta -= up;
        }
        self.position += delta * step;

        if input.is_action_held(Action::YawLeft) {
            self.yaw -= turn;
        }
        if input.is_action_held(Action::YawRight) {
            self.yaw += turn;
        }
        if input.is_action_held(Action::PitchUp) {
            self.pitch -= turn;
        }
        if input.is_action_held(Action::PitchDown) {
            self.pitch += turn;
        }
        self.pitch = self.pitch.clamp(-self.pitch_limit, self.pitch_limit);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }
}

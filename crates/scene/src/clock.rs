/// Frame timing handed to scripts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Frames started so far; 1 during the first update.
    pub frame: u64,
    /// Seconds since the scene's first update, including this frame's `dt`.
    pub elapsed: f32,
    /// Seconds since the previous update.
    pub dt: f32,
}

impl FrameClock {
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame += 1;
        self.elapsed += dt;
        self.dt = dt;
    }
}

//! Level geometry, the follow camera and the minimal arcade body used by
//! every moving entity.
//!
//! Positions are in world pixels with the origin at the top-left of the
//! level. Bodies are centre-origin, like sprites.

/// Level extents
pub const WORLD_WIDTH: f32 = 2000.0;
pub const WORLD_HEIGHT: f32 = 600.0;

/// Visible slice of the level
pub const VIEW_WIDTH: f32 = 800.0;
pub const VIEW_HEIGHT: f32 = 600.0;

/// Top surface of the ground strip
pub const GROUND_TOP: f32 = 564.0;

/// World gravity in px/s²
pub const GRAVITY: f32 = 600.0;

/// Fixed simulation step
pub const FRAME_MS: u64 = 16;

/// Fraction of the remaining distance the camera covers each step
const CAMERA_LERP: f32 = 0.05;

/// Horizontal camera that trails the player and stays inside the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scroll_x: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self { scroll_x: 0.0 }
    }

    fn target_for(x: f32) -> f32 {
        (x - VIEW_WIDTH / 2.0).clamp(0.0, WORLD_WIDTH - VIEW_WIDTH)
    }

    /// Ease towards centring `x`
    pub fn follow(&mut self, x: f32) {
        let target = Self::target_for(x);
        self.scroll_x += (target - self.scroll_x) * CAMERA_LERP;
    }

    /// Jump straight to centring `x`
    pub fn snap_to(&mut self, x: f32) {
        self.scroll_x = Self::target_for(x);
    }

    pub fn is_visible(&self, x: f32) -> bool {
        x >= self.scroll_x && x <= self.scroll_x + VIEW_WIDTH
    }
}

/// Arcade-style body: velocity integration, extra per-body gravity and
/// resting on the ground strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Added on top of world gravity
    pub gravity: f32,
    /// Collides with the ground strip
    pub collides: bool,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            gravity: 0.0,
            collides: true,
            on_ground: false,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn stop(&mut self) {
        self.set_velocity(0.0, 0.0);
    }

    /// Advance by `dt_ms` of simulated time
    pub fn integrate(&mut self, dt_ms: u64) {
        let dt = dt_ms as f32 / 1000.0;
        self.vy += (GRAVITY + self.gravity) * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        self.on_ground = false;
        if self.collides && self.vy >= 0.0 && self.bottom() >= GROUND_TOP {
            self.y = GROUND_TOP - self.height / 2.0;
            self.vy = 0.0;
            self.on_ground = true;
        }
    }

    /// Keep the body fully inside the level
    pub fn clamp_to_world(&mut self) {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        self.x = self.x.clamp(half_w, WORLD_WIDTH - half_w);
        if self.y > WORLD_HEIGHT - half_h {
            self.y = WORLD_HEIGHT - half_h;
            self.vy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lands_on_ground() {
        let mut body = Body::new(100.0, 400.0, 32.0, 48.0);
        for _ in 0..200 {
            body.integrate(FRAME_MS);
        }
        assert!(body.on_ground);
        assert_eq!(body.bottom(), GROUND_TOP);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn test_body_passes_through_ground_without_collision() {
        let mut body = Body::new(100.0, 540.0, 32.0, 48.0);
        body.collides = false;
        body.integrate(FRAME_MS);
        body.integrate(FRAME_MS);
        assert!(!body.on_ground);
        assert!(body.y > 540.0);
    }

    #[test]
    fn test_camera_eases_and_clamps() {
        let mut camera = Camera::new();
        camera.follow(1000.0);
        // 5% of the way to 600
        assert!((camera.scroll_x - 30.0).abs() < 1e-3);

        camera.snap_to(5000.0);
        assert_eq!(camera.scroll_x, WORLD_WIDTH - VIEW_WIDTH);

        camera.snap_to(-20.0);
        assert_eq!(camera.scroll_x, 0.0);
    }

    #[test]
    fn test_clamp_to_world() {
        let mut body = Body::new(-50.0, 700.0, 32.0, 48.0);
        body.clamp_to_world();
        assert_eq!(body.x, 16.0);
        assert_eq!(body.y, WORLD_HEIGHT - 24.0);
    }
}

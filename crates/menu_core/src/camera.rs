use glam::{Mat4, Vec2, Vec3};
use settings::CameraSettings;

const WORLD_UP: Vec3 = Vec3::Y;
/// Distance multiplier per zoom step towards the cube.
const ZOOM_STEP: f32 = 0.9;

/// Perspective camera looking at the cube from the configured eye.
///
/// Depth maps to `0..1` (wgpu convention); the same matrix feeds the
/// renderer and the pointer ray cast. Zoom only slides the eye along its
/// line of sight, within `min_distance..=max_distance`.
#[derive(Debug, Clone)]
pub struct CubeCamera {
    home_eye: Vec3,
    eye: Vec3,
    target: Vec3,
    fov_y_deg: f32,
    near: f32,
    far: f32,
    min_distance: f32,
    max_distance: f32,
    viewport_size: (u32, u32),
}

impl CubeCamera {
    pub fn new(settings: &CameraSettings, initial_viewport: (u32, u32)) -> Self {
        let eye = Vec3::from_array(settings.eye);
        Self {
            home_eye: eye,
            eye,
            target: Vec3::ZERO,
            fov_y_deg: settings.fov_degrees,
            near: settings.near,
            far: settings.far,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            viewport_size: initial_viewport,
        }
    }

    /// Move the eye `steps` zoom steps closer (negative: farther away).
    /// Returns whether the eye moved.
    pub fn zoom(&mut self, steps: f32) -> bool {
        if !steps.is_finite() || steps == 0.0 {
            return false;
        }
        let offset = self.eye - self.target;
        let current = offset.length();
        if current <= f32::EPSILON {
            return false;
        }
        let wanted =
            (current * ZOOM_STEP.powf(steps)).clamp(self.min_distance, self.max_distance);
        if (wanted - current).abs() <= current * 1e-6 {
            return false;
        }
        self.eye = self.target + offset * (wanted / current);
        true
    }

    /// Put the eye back where the settings placed it.
    pub fn reset(&mut self) -> bool {
        if self.eye == self.home_eye {
            return false;
        }
        self.eye = self.home_eye;
        true
    }

    /// Eye distance from the cube center.
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Store new viewport dimensions. Returns `false` when nothing changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.viewport_size == (width, height) {
            return false;
        }
        self.viewport_size = (width, height);
        true
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    pub fn aspect(&self) -> f32 {
        let (w, h) = self.viewport_size;
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, WORLD_UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect().max(0.001),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert a pixel position (origin top-left) into normalized device
    /// coordinates. `None` for an empty viewport.
    pub fn screen_to_ndc(&self, position: Vec2) -> Option<Vec2> {
        let (w, h) = self.viewport_size;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Vec2::new(
            position.x / w as f32 * 2.0 - 1.0,
            -(position.y / h as f32) * 2.0 + 1.0,
        ))
    }

    /// Project a world-space point to pixel coordinates.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let (w, h) = self.viewport_size;
        if w == 0 || h == 0 {
            return None;
        }
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * w as f32,
            (1.0 - ndc.y) * 0.5 * h as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CubeCamera {
        CubeCamera::new(&CameraSettings::default(), (800, 600))
    }

    #[test]
    fn repeated_resize_is_a_no_op() {
        let mut camera = camera();
        assert!(camera.resize(1024, 768));
        let before = camera.view_projection();
        assert!(!camera.resize(1024, 768));
        assert_eq!(camera.view_projection(), before);
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let screen = camera().world_to_screen(Vec3::ZERO).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn ndc_flips_vertical_axis() {
        let camera = camera();
        assert_eq!(
            camera.screen_to_ndc(Vec2::new(0.0, 0.0)),
            Some(Vec2::new(-1.0, 1.0))
        );
        assert_eq!(
            camera.screen_to_ndc(Vec2::new(800.0, 600.0)),
            Some(Vec2::new(1.0, -1.0))
        );
    }

    #[test]
    fn zoom_is_clamped_to_distance_range() {
        let mut camera = camera();
        let home = camera.distance();
        assert!(camera.zoom(1.0));
        assert!((camera.distance() - home * 0.9).abs() < 1e-4);

        assert!(camera.zoom(100.0));
        assert!((camera.distance() - 1.5).abs() < 1e-4);
        assert!(!camera.zoom(1.0));

        assert!(camera.zoom(-100.0));
        assert!((camera.distance() - 8.0).abs() < 1e-4);
        assert!(!camera.zoom(-1.0));
    }

    #[test]
    fn zoom_keeps_looking_at_the_cube() {
        let mut camera = camera();
        camera.zoom(3.0);
        let screen = camera.world_to_screen(Vec3::ZERO).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn reset_restores_configured_eye() {
        let mut camera = camera();
        let before = camera.view_projection();
        assert!(!camera.reset());
        camera.zoom(-4.0);
        assert_ne!(camera.view_projection(), before);
        assert!(camera.reset());
        assert_eq!(camera.view_projection(), before);
    }

    #[test]
    fn degenerate_zoom_input_is_ignored() {
        let mut camera = camera();
        assert!(!camera.zoom(0.0));
        assert!(!camera.zoom(f32::NAN));
    }

    #[test]
    fn empty_viewport_has_no_ndc() {
        let mut camera = camera();
        camera.resize(0, 600);
        assert_eq!(camera.screen_to_ndc(Vec2::new(10.0, 10.0)), None);
        assert_eq!(camera.aspect(), 1.0);
    }
}

//! Pointer classification: which face, if any, lies under a screen point and
//! whether the point falls in that face's navigation zone.

use glam::{Mat4, Vec2, Vec3};

use crate::{camera::CubeCamera, face::CubeFace, orientation::Orientation};

/// Float slack so that coordinates sitting exactly on a zone edge classify as
/// outside the active band.
const ZONE_EPSILON: f32 = 1e-5;
/// Rays closer to parallel than this never enter a slab.
const PARALLEL_EPSILON: f32 = 1e-9;

/// A ray in world or cube-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Result of casting a pointer ray at the cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickResult {
    /// The ray misses the cube; the pointer is on the background.
    NoHit,
    /// The ray enters the cube through `face`, at `uv` in that face's texture space.
    Hit { face: CubeFace, uv: Vec2 },
}

/// What a press on a given target is allowed to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    FaceActive(CubeFace),
    FaceRotate(CubeFace),
}

impl PointerTarget {
    /// Face whose active zone lies under the pointer, if any.
    pub fn tap_face(self) -> Option<CubeFace> {
        match self {
            PointerTarget::FaceActive(face) => Some(face),
            _ => None,
        }
    }
}

/// Ray casts pointer positions against the cube box only.
#[derive(Debug, Clone)]
pub struct CubePicker {
    half_extent: f32,
    active_zone_fraction: f32,
}

impl CubePicker {
    pub fn new(cube_size: f32, active_zone_fraction: f32) -> Self {
        Self {
            half_extent: cube_size * 0.5,
            active_zone_fraction,
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Model matrix of the cube for the given pose.
    pub fn model_matrix(&self, orientation: &Orientation) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.half_extent),
            orientation.rotation(),
            Vec3::ZERO,
        )
    }

    /// World-space ray from the camera through a pixel.
    pub fn screen_ray(&self, camera: &CubeCamera, position: Vec2) -> Option<Ray> {
        let ndc = camera.screen_to_ndc(position)?;
        let view_proj = camera.view_projection();
        if view_proj.determinant().abs() <= f32::EPSILON {
            return None;
        }
        let inverse = view_proj.inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).normalize_or_zero();
        if direction == Vec3::ZERO || !near.is_finite() {
            return None;
        }
        Some(Ray {
            origin: near,
            direction,
        })
    }

    pub fn pick(
        &self,
        camera: &CubeCamera,
        orientation: &Orientation,
        position: Vec2,
    ) -> PickResult {
        match self.screen_ray(camera, position) {
            Some(ray) => self.intersect(orientation, &ray),
            None => PickResult::NoHit,
        }
    }

    /// Intersect a world-space ray with the posed cube.
    pub fn intersect(&self, orientation: &Orientation, ray: &Ray) -> PickResult {
        let model = self.model_matrix(orientation);
        if model.determinant().abs() <= f32::EPSILON {
            return PickResult::NoHit;
        }
        // Cube-local space is the unit box [-1, 1]^3.
        let local = ray.transformed(&model.inverse());
        intersect_unit_box(&local)
    }

    pub fn classify(&self, pick: PickResult) -> PointerTarget {
        match pick {
            PickResult::NoHit => PointerTarget::Background,
            PickResult::Hit { face, uv } if is_active_zone(uv, self.active_zone_fraction) => {
                PointerTarget::FaceActive(face)
            }
            PickResult::Hit { face, .. } => PointerTarget::FaceRotate(face),
        }
    }

    pub fn target_at(
        &self,
        camera: &CubeCamera,
        orientation: &Orientation,
        position: Vec2,
    ) -> PointerTarget {
        self.classify(self.pick(camera, orientation, position))
    }
}

/// True when `uv` lies strictly inside the central band covering `fraction`
/// of the face on both axes.
pub fn is_active_zone(uv: Vec2, fraction: f32) -> bool {
    let margin = (1.0 - fraction) * 0.5;
    let low = margin + ZONE_EPSILON;
    let high = 1.0 - margin - ZONE_EPSILON;
    uv.x > low && uv.x < high && uv.y > low && uv.y < high
}

/// Slab test against [-1, 1]^3. Hits only count when the ray starts outside
/// the box and enters it in front of the origin.
fn intersect_unit_box(ray: &Ray) -> PickResult {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = None;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < PARALLEL_EPSILON {
            if !(-1.0..=1.0).contains(&o) {
                return PickResult::NoHit;
            }
            continue;
        }
        let t0 = (-1.0 - o) / d;
        let t1 = (1.0 - o) / d;
        let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        if near > t_enter {
            t_enter = near;
            enter_axis = Some((axis, d < 0.0));
        }
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return PickResult::NoHit;
        }
    }

    let Some((axis, positive)) = enter_axis else {
        return PickResult::NoHit;
    };
    if t_enter < 0.0 {
        return PickResult::NoHit;
    }

    let face = CubeFace::from_axis(axis, positive);
    let point = ray.at(t_enter);
    let (u_axis, v_axis) = face.texture_axes();
    let uv = Vec2::new(
        (point.dot(u_axis) + 1.0) * 0.5,
        (point.dot(v_axis) + 1.0) * 0.5,
    )
    .clamp(Vec2::ZERO, Vec2::ONE);
    PickResult::Hit { face, uv }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings::CameraSettings;

    fn picker() -> CubePicker {
        CubePicker::new(1.6, 0.6)
    }

    fn camera() -> CubeCamera {
        CubeCamera::new(&CameraSettings::default(), (800, 600))
    }

    fn face_point(face: CubeFace, u: f32, v: f32, half: f32) -> Vec3 {
        let (u_axis, v_axis) = face.texture_axes();
        (face.normal() + u_axis * (u * 2.0 - 1.0) + v_axis * (v * 2.0 - 1.0)) * half
    }

    #[test]
    fn zone_edges_and_corners_are_rotate_eligible() {
        let samples = [
            (0.2, 0.5),
            (0.8, 0.5),
            (0.5, 0.2),
            (0.5, 0.8),
            (0.2, 0.2),
            (0.2, 0.8),
            (0.8, 0.2),
            (0.8, 0.8),
            (0.0, 0.5),
            (1.0, 1.0),
        ];
        for (u, v) in samples {
            assert!(!is_active_zone(Vec2::new(u, v), 0.6), "({u}, {v})");
        }
    }

    #[test]
    fn zone_interior_is_active() {
        let samples = [(0.5, 0.5), (0.21, 0.21), (0.79, 0.79), (0.21, 0.79), (0.3, 0.6)];
        for (u, v) in samples {
            assert!(is_active_zone(Vec2::new(u, v), 0.6), "({u}, {v})");
        }
    }

    #[test]
    fn every_face_classifies_the_same_way() {
        let picker = picker();
        for face in CubeFace::ALL {
            let active = picker.classify(PickResult::Hit {
                face,
                uv: Vec2::new(0.5, 0.5),
            });
            assert_eq!(active, PointerTarget::FaceActive(face));
            let rotate = picker.classify(PickResult::Hit {
                face,
                uv: Vec2::new(0.8, 0.5),
            });
            assert_eq!(rotate, PointerTarget::FaceRotate(face));
        }
        assert_eq!(picker.classify(PickResult::NoHit), PointerTarget::Background);
    }

    #[test]
    fn axis_aligned_rays_hit_the_facing_side() {
        let picker = picker();
        let pose = Orientation::default();
        for face in CubeFace::ALL {
            let ray = Ray {
                origin: face.normal() * 5.0,
                direction: -face.normal(),
            };
            match picker.intersect(&pose, &ray) {
                PickResult::Hit { face: hit, uv } => {
                    assert_eq!(hit, face);
                    assert!((uv - Vec2::splat(0.5)).length() < 1e-5);
                }
                PickResult::NoHit => panic!("{face:?} missed"),
            }
        }
    }

    #[test]
    fn uv_follows_face_texture_axes() {
        let picker = picker();
        let pose = Orientation::default();
        let target = face_point(CubeFace::Front, 0.9, 0.25, picker.half_extent());
        let ray = Ray {
            origin: Vec3::new(target.x, target.y, 4.0),
            direction: Vec3::NEG_Z,
        };
        match picker.intersect(&pose, &ray) {
            PickResult::Hit { face, uv } => {
                assert_eq!(face, CubeFace::Front);
                assert!((uv - Vec2::new(0.9, 0.25)).length() < 1e-5, "{uv:?}");
            }
            PickResult::NoHit => panic!("front missed"),
        }
    }

    #[test]
    fn rays_pointing_away_or_starting_inside_miss() {
        let picker = picker();
        let pose = Orientation::default();
        let away = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::Z,
        };
        assert_eq!(picker.intersect(&pose, &away), PickResult::NoHit);
        let inside = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        assert_eq!(picker.intersect(&pose, &inside), PickResult::NoHit);
    }

    #[test]
    fn rotation_moves_faces_under_a_fixed_ray() {
        let picker = picker();
        let quarter_turn = Orientation::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        // Turning +90° about Y brings the left face (-X) round to +Z.
        match picker.intersect(&quarter_turn, &ray) {
            PickResult::Hit { face, .. } => assert_eq!(face, CubeFace::Left),
            PickResult::NoHit => panic!("missed"),
        }
    }

    #[test]
    fn screen_center_of_a_face_hits_it() {
        let picker = picker();
        let camera = camera();
        let pose = Orientation::default();
        for face in [CubeFace::Front, CubeFace::Right, CubeFace::Top] {
            let center = face.normal() * picker.half_extent();
            let screen = camera.world_to_screen(center).unwrap();
            match picker.pick(&camera, &pose, screen) {
                PickResult::Hit { face: hit, uv } => {
                    assert_eq!(hit, face);
                    assert!((uv - Vec2::splat(0.5)).length() < 5e-3, "{uv:?}");
                }
                PickResult::NoHit => panic!("{face:?} missed"),
            }
            assert_eq!(
                picker.target_at(&camera, &pose, screen),
                PointerTarget::FaceActive(face)
            );
        }
    }

    #[test]
    fn viewport_corner_is_background() {
        let picker = picker();
        let camera = camera();
        let target = picker.target_at(&camera, &Orientation::default(), Vec2::new(1.0, 1.0));
        assert_eq!(target, PointerTarget::Background);
    }

    #[test]
    fn same_inputs_give_same_pick() {
        let picker = picker();
        let camera = camera();
        let pose = Orientation::new(0.4, 1.3, -0.2);
        let position = Vec2::new(410.0, 280.0);
        let first = picker.pick(&camera, &pose, position);
        for _ in 0..10 {
            assert_eq!(picker.pick(&camera, &pose, position), first);
        }
    }
}

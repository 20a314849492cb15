use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "cubemenu";
const APPLICATION: &str = "cubemenu";
const SETTINGS_FILE: &str = "menu.json";

/// Number of faces on the menu cube.
pub const FACE_COUNT: usize = 6;

/// Lowest non-zero frame cap accepted.
pub const MIN_FPS_CAP: f32 = 1.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to resolve platform config directory")]
    MissingProjectDirs,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Everything the menu cube needs for one session. Static once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Label and base color per face, indexed Front, Back, Left, Right, Top, Bottom.
    pub faces: [FaceSettings; FACE_COUNT],
    /// Destination per face index. Faces without an entry are inert.
    pub routes: BTreeMap<usize, String>,
    /// Prefix for relative destinations (e.g. `https://example.org/`).
    pub base_url: Option<String>,
    /// Close the menu window once a destination has been opened.
    pub close_on_navigate: bool,
    pub motion: MotionSettings,
    pub gesture: GestureSettings,
    /// Initial pose in radians.
    pub starting_orientation: OrientationSettings,
    /// Edge length of the cube in world units.
    pub cube_size: f32,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub rendering: RenderingSettings,
    /// Optional FPS cap. 0.0 = uncapped (driven by vsync / driver),
    /// otherwise at least `MIN_FPS_CAP`.
    pub fps_cap: f32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            faces: [
                FaceSettings::new("Front", [0x9a, 0xa4, 0xff]),
                FaceSettings::new("Back", [0xff, 0xb3, 0xb3]),
                FaceSettings::new("Left", [0x9f, 0xe0, 0xc6]),
                FaceSettings::new("Right", [0xf4, 0xd8, 0x8a]),
                FaceSettings::new("Top", [0xca, 0xa8, 0xf3]),
                FaceSettings::new("Bottom", [0x86, 0xc5, 0xf4]),
            ],
            routes: BTreeMap::new(),
            base_url: None,
            close_on_navigate: true,
            motion: MotionSettings::default(),
            gesture: GestureSettings::default(),
            starting_orientation: OrientationSettings::default(),
            cube_size: 1.6,
            camera: CameraSettings::default(),
            lighting: LightingSettings::default(),
            rendering: RenderingSettings::default(),
            fps_cap: 0.0,
        }
    }
}

impl MenuSettings {
    /// Reject values the motion and gesture logic cannot work with.
    ///
    /// Route problems are not reported here: a bad route only makes its face
    /// inert, which the router handles when it builds its table.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let motion = &self.motion;
        if !(motion.inertia_damping > 0.0 && motion.inertia_damping < 1.0) {
            return Err(invalid(
                "motion.inertia_damping",
                format!("{} is not inside (0, 1)", motion.inertia_damping),
            ));
        }
        if !(motion.inertia_stop_threshold > 0.0) {
            return Err(invalid(
                "motion.inertia_stop_threshold",
                format!("{} must be positive", motion.inertia_stop_threshold),
            ));
        }
        if !motion.drag_sensitivity.is_finite() {
            return Err(invalid("motion.drag_sensitivity", "must be finite".into()));
        }
        if !motion.idle_spin_rate_x.is_finite() || !motion.idle_spin_rate_y.is_finite() {
            return Err(invalid("motion.idle_spin_rate", "must be finite".into()));
        }

        let gesture = &self.gesture;
        if !(gesture.tap_movement_threshold_px >= 0.0) {
            return Err(invalid(
                "gesture.tap_movement_threshold_px",
                format!("{} must not be negative", gesture.tap_movement_threshold_px),
            ));
        }
        if !(gesture.active_zone_fraction > 0.0 && gesture.active_zone_fraction <= 1.0) {
            return Err(invalid(
                "gesture.active_zone_fraction",
                format!("{} is not inside (0, 1]", gesture.active_zone_fraction),
            ));
        }

        if !(self.cube_size > 0.0) {
            return Err(invalid(
                "cube_size",
                format!("{} must be positive", self.cube_size),
            ));
        }
        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(invalid(
                "camera",
                format!("near {} / far {} are not ordered", camera.near, camera.far),
            ));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_degrees",
                format!("{} is not inside (0, 180)", camera.fov_degrees),
            ));
        }
        if !(camera.min_distance > 0.0 && camera.max_distance >= camera.min_distance)
            || !camera.max_distance.is_finite()
        {
            return Err(invalid(
                "camera.min_distance",
                format!(
                    "zoom range {} .. {} is not ordered",
                    camera.min_distance, camera.max_distance
                ),
            ));
        }

        if !(self.fps_cap == 0.0 || (self.fps_cap.is_finite() && self.fps_cap >= MIN_FPS_CAP)) {
            return Err(invalid(
                "fps_cap",
                format!("{} must be 0 or at least {MIN_FPS_CAP}", self.fps_cap),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

/// Presentation of a single cube face.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaceSettings {
    pub label: String,
    /// sRGB base color of the face tile.
    pub color: [u8; 3],
}

impl FaceSettings {
    pub fn new(label: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Rates and constants of the idle/drag/inertia integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Radians added to the turn angle every idle frame.
    pub idle_spin_rate_y: f32,
    /// Radians added to the tilt angle every idle frame.
    pub idle_spin_rate_x: f32,
    /// Radians per pixel of pointer movement.
    pub drag_sensitivity: f32,
    /// Per-frame velocity multiplier while gliding, in (0, 1).
    pub inertia_damping: f32,
    /// Glide ends once both velocity components drop below this.
    pub inertia_stop_threshold: f32,
    pub idle_resume: IdleResume,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            idle_spin_rate_y: 0.005,
            idle_spin_rate_x: 0.0,
            drag_sensitivity: 0.006,
            inertia_damping: 0.95,
            inertia_stop_threshold: 2e-5,
            idle_resume: IdleResume::Never,
        }
    }
}

/// Whether the idle spin comes back after the visitor has dragged the cube.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdleResume {
    /// The first drag switches the idle spin off for good.
    #[default]
    Never,
    /// Spin again once the cube has come to rest and `delay_ms` passed since release.
    AfterDelay { delay_ms: u64 },
}

/// Thresholds separating a tap from a drag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub tap_movement_threshold_px: f32,
    pub tap_time_threshold_ms: u64,
    pub inertia_recency_window_ms: u64,
    /// Share of a face's extent (per axis) that navigates when tapped.
    pub active_zone_fraction: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            tap_movement_threshold_px: 12.0,
            tap_time_threshold_ms: 450,
            inertia_recency_window_ms: 120,
            active_zone_fraction: 0.6,
        }
    }
}

/// Euler angles in radians, applied X then Y then Z.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OrientationSettings {
    pub tilt: f32,
    pub turn: f32,
    pub twist: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Eye position; the camera always looks at the origin.
    pub eye: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Closest the eye may zoom towards the cube.
    pub min_distance: f32,
    /// Farthest the eye may zoom away from the cube.
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: [2.6, 1.8, 3.2],
            fov_degrees: 50.0,
            near: 0.1,
            far: 100.0,
            min_distance: 1.5,
            max_distance: 8.0,
        }
    }
}

/// Ambient term plus a key and a rim directional light.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub key_light: LightSource,
    pub rim_light: LightSource,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.6,
            key_light: LightSource {
                enabled: true,
                position: [3.0, 4.0, 2.0],
                color: [1.0, 0.949, 0.878],
                intensity: 1.0,
            },
            rim_light: LightSource {
                enabled: true,
                position: [-3.0, 2.0, -3.0],
                color: [0.729, 0.831, 1.0],
                intensity: 0.7,
            },
        }
    }
}

/// A directional light shining from `position` towards the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSource {
    pub enabled: bool,
    pub position: [f32; 3],
    /// RGB color (0.0 - 1.0)
    pub color: [f32; 3],
    /// Intensity multiplier (0.0 - 1.0)
    pub intensity: f32,
}

impl LightSource {
    /// Normalized direction pointing from the origin towards the light.
    pub fn direction(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let len = (x * x + y * y + z * z).sqrt();
        if len <= f32::EPSILON {
            return [0.0, 1.0, 0.0];
        }
        [x / len, y / len, z / len]
    }

    /// Color pre-multiplied by intensity, black when disabled.
    pub fn radiance(&self) -> [f32; 3] {
        if !self.enabled {
            return [0.0; 3];
        }
        self.color.map(|c| c * self.intensity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingSettings {
    /// sRGB clear color behind the cube.
    pub clear_color: [u8; 3],
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            clear_color: [0x0f, 0x0f, 0x12],
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self, SettingsError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(SettingsError::MissingProjectDirs)?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        let path = config_dir.join(SETTINGS_FILE);
        Ok(Self { path })
    }

    /// Store backed by an explicit file instead of the platform config dir.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<MenuSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(MenuSettings::default());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let settings: MenuSettings = serde_json::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, settings: &MenuSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, settings)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
        }
    }
}

use glam::{EulerRot, Quat, Vec2};
use settings::OrientationSettings;

/// Rotational pose of the cube, in radians.
///
/// `tilt` rotates about X, `turn` about Y and `twist` about Z; the rotation is
/// composed in that intrinsic order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub tilt: f32,
    pub turn: f32,
    pub twist: f32,
}

impl Orientation {
    pub const fn new(tilt: f32, turn: f32, twist: f32) -> Self {
        Self { tilt, turn, twist }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.tilt, self.turn, self.twist)
    }

    pub(crate) fn advance(&mut self, velocity: AngularVelocity) {
        self.tilt += velocity.tilt;
        self.turn += velocity.turn;
    }
}

impl From<OrientationSettings> for Orientation {
    fn from(value: OrientationSettings) -> Self {
        Self::new(value.tilt, value.turn, value.twist)
    }
}

/// Per-frame angular change left over after a drag.
///
/// `tilt` comes from vertical pointer movement, `turn` from horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularVelocity {
    pub tilt: f32,
    pub turn: f32,
}

impl AngularVelocity {
    pub const ZERO: Self = Self {
        tilt: 0.0,
        turn: 0.0,
    };

    pub const fn new(tilt: f32, turn: f32) -> Self {
        Self { tilt, turn }
    }

    /// Velocity produced by a pointer delta in pixels.
    pub fn from_pointer_delta(delta: Vec2, sensitivity: f32) -> Self {
        Self {
            tilt: delta.y * sensitivity,
            turn: delta.x * sensitivity,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.tilt == 0.0 && self.turn == 0.0
    }

    pub(crate) fn below(&self, threshold: f32) -> bool {
        self.tilt.abs() < threshold && self.turn.abs() < threshold
    }

    pub(crate) fn scaled(self, factor: f32) -> Self {
        Self {
            tilt: self.tilt * factor,
            turn: self.turn * factor,
        }
    }
}

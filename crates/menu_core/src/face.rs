use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The six faces of the menu cube, in route-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    pub const fn index(self) -> usize {
        match self {
            CubeFace::Front => 0,
            CubeFace::Back => 1,
            CubeFace::Left => 2,
            CubeFace::Right => 3,
            CubeFace::Top => 4,
            CubeFace::Bottom => 5,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CubeFace::Front),
            1 => Some(CubeFace::Back),
            2 => Some(CubeFace::Left),
            3 => Some(CubeFace::Right),
            4 => Some(CubeFace::Top),
            5 => Some(CubeFace::Bottom),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CubeFace::Front => "front",
            CubeFace::Back => "back",
            CubeFace::Left => "left",
            CubeFace::Right => "right",
            CubeFace::Top => "top",
            CubeFace::Bottom => "bottom",
        }
    }

    /// Outward normal in cube-local space.
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::Front => Vec3::Z,
            CubeFace::Back => Vec3::NEG_Z,
            CubeFace::Left => Vec3::NEG_X,
            CubeFace::Right => Vec3::X,
            CubeFace::Top => Vec3::Y,
            CubeFace::Bottom => Vec3::NEG_Y,
        }
    }

    /// Texture axes `(u, v)` of the face as seen from outside: `u` points
    /// right, `v` points up and `u × v` equals the normal.
    pub fn texture_axes(self) -> (Vec3, Vec3) {
        match self {
            CubeFace::Front => (Vec3::X, Vec3::Y),
            CubeFace::Back => (Vec3::NEG_X, Vec3::Y),
            CubeFace::Left => (Vec3::Z, Vec3::Y),
            CubeFace::Right => (Vec3::NEG_Z, Vec3::Y),
            CubeFace::Top => (Vec3::X, Vec3::NEG_Z),
            CubeFace::Bottom => (Vec3::X, Vec3::Z),
        }
    }

    /// Face whose normal is the given signed axis (`axis` 0 = X, 1 = Y, 2 = Z).
    pub(crate) fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => CubeFace::Right,
            (0, false) => CubeFace::Left,
            (1, true) => CubeFace::Top,
            (1, false) => CubeFace::Bottom,
            (2, true) => CubeFace::Front,
            _ => CubeFace::Back,
        }
    }
}

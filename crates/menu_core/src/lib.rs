//! Interaction and motion core of the menu cube.
//!
//! Everything here is windowing and GPU agnostic: the shell feeds pointer
//! events, frame ticks and viewport sizes into [`CubeMenuController`] and
//! reads back the cube pose to draw.

pub mod camera;
pub mod controller;
pub mod face;
pub mod gesture;
pub mod motion;
pub mod orientation;
pub mod picking;
pub mod router;
pub mod status;

use thiserror::Error;

pub use camera::CubeCamera;
pub use controller::{CubeMenuController, PointerEvent, PointerResponse};
pub use face::CubeFace;
pub use gesture::{GestureEnd, GesturePhase, GestureSession, MoveOutcome};
pub use motion::{MotionController, MotionMode};
pub use orientation::{AngularVelocity, Orientation};
pub use picking::{CubePicker, PickResult, PointerTarget, Ray};
pub use router::{FaceRouter, NavigateError, Navigation, Navigator, RouteTable};
pub use status::StatusSink;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("invalid menu settings: {0}")]
    Settings(#[from] settings::SettingsError),
}

pub type MenuResult<T> = Result<T, MenuError>;

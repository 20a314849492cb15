use std::time::Duration;

use glam::Vec2;
use settings::{IdleResume, MotionSettings};
use tracing::debug;

use crate::orientation::{AngularVelocity, Orientation};

/// Which motion source currently drives the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Autonomous slow spin shown before (or between) interactions.
    Idle,
    /// Orientation follows the pointer; no per-frame integration.
    Dragging,
    /// Residual spin after a release, decaying every frame.
    Inertia,
    /// Nothing moves.
    Still,
}

impl MotionMode {
    pub const fn label(self) -> &'static str {
        match self {
            MotionMode::Idle => "spinning",
            MotionMode::Dragging => "dragging",
            MotionMode::Inertia => "gliding",
            MotionMode::Still => "still",
        }
    }
}

/// Owns the orientation and decides, frame by frame, how it changes.
#[derive(Debug)]
pub struct MotionController {
    orientation: Orientation,
    velocity: AngularVelocity,
    mode: MotionMode,
    settings: MotionSettings,
    /// Set by the first drag; with `IdleResume::Never` it is never cleared.
    idle_cancelled: bool,
    idle_resume_at: Option<Duration>,
}

impl MotionController {
    pub fn new(settings: &MotionSettings, start: Orientation) -> Self {
        Self {
            orientation: start,
            velocity: AngularVelocity::ZERO,
            mode: MotionMode::Idle,
            settings: settings.clone(),
            idle_cancelled: false,
            idle_resume_at: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn velocity(&self) -> AngularVelocity {
        self.velocity
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// True once a drag has switched the idle spin off.
    pub fn idle_cancelled(&self) -> bool {
        self.idle_cancelled
    }

    /// Whether frames keep changing the orientation without input.
    pub fn is_animating(&self) -> bool {
        matches!(self.mode, MotionMode::Idle | MotionMode::Inertia) || self.idle_resume_at.is_some()
    }

    /// Hand the orientation to the pointer. Cancels idle spin and any glide.
    pub fn begin_drag(&mut self) {
        if self.mode != MotionMode::Dragging {
            debug!(from = ?self.mode, "drag started");
        }
        self.mode = MotionMode::Dragging;
        self.velocity = AngularVelocity::ZERO;
        self.idle_cancelled = true;
        self.idle_resume_at = None;
    }

    /// Apply one pointer delta (pixels) and keep it as the latest velocity sample.
    ///
    /// Ignored unless dragging.
    pub fn drag_by(&mut self, delta: Vec2) {
        if self.mode != MotionMode::Dragging {
            return;
        }
        let sample = AngularVelocity::from_pointer_delta(delta, self.settings.drag_sensitivity);
        self.orientation.advance(sample);
        self.velocity = sample;
    }

    /// Finish a drag. `recent` tells whether the last movement sample fell
    /// inside the recency window before the release.
    pub fn end_drag(&mut self, now: Duration, recent: bool) {
        if self.mode != MotionMode::Dragging {
            return;
        }
        if recent && !self.velocity.is_zero() {
            self.mode = MotionMode::Inertia;
        } else {
            self.velocity = AngularVelocity::ZERO;
            self.mode = MotionMode::Still;
        }
        if let IdleResume::AfterDelay { delay_ms } = self.settings.idle_resume {
            self.idle_resume_at = Some(now + Duration::from_millis(delay_ms));
        }
        debug!(mode = ?self.mode, velocity = ?self.velocity, "drag released");
    }

    /// Advance one rendered frame. Returns whether the orientation changed.
    pub fn step(&mut self, now: Duration) -> bool {
        match self.mode {
            MotionMode::Idle => {
                self.orientation.turn += self.settings.idle_spin_rate_y;
                self.orientation.tilt += self.settings.idle_spin_rate_x;
                self.settings.idle_spin_rate_y != 0.0 || self.settings.idle_spin_rate_x != 0.0
            }
            MotionMode::Dragging => false,
            MotionMode::Inertia => {
                self.orientation.advance(self.velocity);
                self.velocity = self.velocity.scaled(self.settings.inertia_damping);
                if self.velocity.below(self.settings.inertia_stop_threshold) {
                    self.velocity = AngularVelocity::ZERO;
                    self.mode = MotionMode::Still;
                    debug!("glide settled");
                }
                true
            }
            MotionMode::Still => {
                self.try_resume_idle(now);
                false
            }
        }
    }

    fn try_resume_idle(&mut self, now: Duration) {
        let Some(resume_at) = self.idle_resume_at else {
            return;
        };
        if now >= resume_at {
            self.idle_resume_at = None;
            self.idle_cancelled = false;
            self.mode = MotionMode::Idle;
            debug!("idle spin resumed");
        }
    }
}

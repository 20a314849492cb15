use std::time::Duration;

use glam::Vec2;
use settings::GestureSettings;

use crate::{face::CubeFace, picking::PointerTarget};

/// Sub-state of a press in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Pressed inside a face's active zone; may still become a tap.
    TapCandidate { face: CubeFace },
    /// The press rotates the cube.
    Rotating,
}

/// Result of feeding a move sample into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Still a tap candidate; nothing to apply.
    Pending,
    /// The movement threshold was just crossed. Only this sample's delta
    /// applies; earlier movement is discarded.
    DragStarted { delta: Vec2 },
    /// Incremental delta of an ongoing drag.
    Drag { delta: Vec2 },
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEnd {
    Tap { face: CubeFace },
    /// A drag finished; `recent` is true when the last movement sample lies
    /// within the recency window before the release.
    Release { recent: bool },
    /// A tap candidate held too long.
    Abandoned,
}

/// One press-move-release sequence of a single pointer.
#[derive(Debug, Clone)]
pub struct GestureSession {
    start_position: Vec2,
    start_time: Duration,
    last_position: Vec2,
    last_sample_time: Option<Duration>,
    max_distance: f32,
    phase: GesturePhase,
}

impl GestureSession {
    pub fn begin(position: Vec2, time: Duration, target: PointerTarget) -> Self {
        let phase = match target.tap_face() {
            Some(face) => GesturePhase::TapCandidate { face },
            None => GesturePhase::Rotating,
        };
        Self {
            start_position: position,
            start_time: time,
            last_position: position,
            last_sample_time: None,
            max_distance: 0.0,
            phase,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_rotating(&self) -> bool {
        self.phase == GesturePhase::Rotating
    }

    pub fn on_move(
        &mut self,
        position: Vec2,
        time: Duration,
        settings: &GestureSettings,
    ) -> MoveOutcome {
        let delta = position - self.last_position;
        self.last_position = position;
        self.max_distance = self
            .max_distance
            .max(position.distance(self.start_position));

        match self.phase {
            GesturePhase::TapCandidate { .. } => {
                if self.max_distance > settings.tap_movement_threshold_px {
                    self.phase = GesturePhase::Rotating;
                    self.last_sample_time = Some(time);
                    MoveOutcome::DragStarted { delta }
                } else {
                    MoveOutcome::Pending
                }
            }
            GesturePhase::Rotating => {
                self.last_sample_time = Some(time);
                MoveOutcome::Drag { delta }
            }
        }
    }

    /// Close the session. Pointer-up, pointer-leave and touch-cancel all end
    /// up here with the same rules.
    pub fn finish(self, time: Duration, settings: &GestureSettings) -> GestureEnd {
        match self.phase {
            GesturePhase::TapCandidate { face } => {
                let held = time.saturating_sub(self.start_time);
                if held < Duration::from_millis(settings.tap_time_threshold_ms) {
                    GestureEnd::Tap { face }
                } else {
                    GestureEnd::Abandoned
                }
            }
            GesturePhase::Rotating => {
                let window = Duration::from_millis(settings.inertia_recency_window_ms);
                let recent = self
                    .last_sample_time
                    .is_some_and(|sampled| time.saturating_sub(sampled) <= window);
                GestureEnd::Release { recent }
            }
        }
    }
}

//! Translation from window input to menu pointer events.

use std::time::Duration;

use glam::Vec2;
use menu_core::PointerEvent;
use winit::event::{MouseScrollDelta, TouchPhase};
use winit::keyboard::{Key, NamedKey};

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_STEP: f32 = 120.0;

/// Follows the first touch contact. Later contacts are ignored until it lifts.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: Option<u64>,
}

impl TouchTracker {
    pub fn translate(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
        time: Duration,
    ) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started if self.active.is_none() => {
                self.active = Some(id);
                Some(PointerEvent::Down { position, time })
            }
            TouchPhase::Moved if self.active == Some(id) => {
                Some(PointerEvent::Move { position, time })
            }
            TouchPhase::Ended if self.active == Some(id) => {
                self.active = None;
                Some(PointerEvent::Up { time })
            }
            TouchPhase::Cancelled if self.active == Some(id) => {
                self.active = None;
                Some(PointerEvent::Cancel { time })
            }
            _ => None,
        }
    }
}

/// Zoom steps for one wheel event. Positive scrolls up, which zooms in.
pub fn wheel_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_STEP,
    }
}

pub fn is_reset_key(key: &Key) -> bool {
    match key {
        Key::Named(NamedKey::Home) => true,
        Key::Character(text) => text.as_str().eq_ignore_ascii_case("r"),
        _ => false,
    }
}

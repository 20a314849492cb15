use std::time::Duration;

use glam::{Mat4, Vec2};
use settings::{GestureSettings, MenuSettings};
use tracing::{debug, warn};

use crate::{
    camera::CubeCamera,
    face::CubeFace,
    gesture::{GestureEnd, GestureSession, MoveOutcome},
    motion::{MotionController, MotionMode},
    orientation::Orientation,
    picking::{CubePicker, PointerTarget},
    router::{FaceRouter, Navigation, Navigator, RouteTable},
    status::{StatusLine, StatusSink},
    MenuResult,
};

/// Single-pointer input, already stripped of any windowing specifics.
///
/// Positions are pixels relative to the viewport's top-left corner; times
/// are measured from any fixed origin, as long as it is the same for every
/// event and every `update` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Vec2, time: Duration },
    Move { position: Vec2, time: Duration },
    Up { time: Duration },
    /// The pointer left the interactive surface.
    Leave { time: Duration },
    /// The platform cancelled the touch.
    Cancel { time: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerResponse {
    /// Nothing happened.
    Ignored,
    /// A press is being tracked; nothing visible changed.
    Tracking,
    /// Orientation or motion mode changed.
    Redraw,
    /// A press resolved as a tap on `face`.
    Tap {
        face: CubeFace,
        navigation: Navigation,
    },
}

/// The menu cube's interaction and motion state, one per page/window.
#[derive(Debug)]
pub struct CubeMenuController {
    motion: MotionController,
    camera: CubeCamera,
    picker: CubePicker,
    gesture: GestureSettings,
    session: Option<GestureSession>,
    router: FaceRouter,
    labels: [String; 6],
    status: StatusLine,
}

impl CubeMenuController {
    pub fn new(
        settings: &MenuSettings,
        viewport: (u32, u32),
        navigator: Box<dyn Navigator>,
    ) -> MenuResult<Self> {
        settings.validate()?;

        let table = RouteTable::from_config(&settings.routes);
        if table.is_empty() {
            warn!("no face has a destination; taps will do nothing");
        }

        let mut status = StatusLine::default();
        status.set("ready");

        Ok(Self {
            motion: MotionController::new(&settings.motion, settings.starting_orientation.into()),
            camera: CubeCamera::new(&settings.camera, viewport),
            picker: CubePicker::new(settings.cube_size, settings.gesture.active_zone_fraction),
            gesture: settings.gesture.clone(),
            session: None,
            router: FaceRouter::new(table, navigator),
            labels: settings.faces.clone().map(|face| face.label),
            status,
        })
    }

    /// Attach the optional status text surface.
    pub fn set_status_sink(&mut self, sink: Box<dyn StatusSink>) {
        self.status.attach(sink);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Down { position, time } => self.pointer_down(position, time),
            PointerEvent::Move { position, time } => self.pointer_move(position, time),
            PointerEvent::Up { time }
            | PointerEvent::Leave { time }
            | PointerEvent::Cancel { time } => self.end_session(time),
        }
    }

    /// A press during an open session finishes that session first. A tap it
    /// resolves into is reported instead of the new press's own response.
    fn pointer_down(&mut self, position: Vec2, time: Duration) -> PointerResponse {
        let previous = if self.session.is_some() {
            debug!("press while a session is active; closing the previous one");
            self.end_session(time)
        } else {
            PointerResponse::Ignored
        };

        let orientation = self.motion.orientation();
        let target = self.picker.target_at(&self.camera, &orientation, position);
        debug!(?target, x = position.x, y = position.y, "pointer down");
        let session = GestureSession::begin(position, time, target);
        let rotating = session.is_rotating();
        self.session = Some(session);

        let response = if rotating {
            self.start_drag();
            PointerResponse::Redraw
        } else {
            PointerResponse::Tracking
        };
        match previous {
            PointerResponse::Tap { .. } => previous,
            _ => response,
        }
    }

    fn pointer_move(&mut self, position: Vec2, time: Duration) -> PointerResponse {
        let Some(session) = self.session.as_mut() else {
            return PointerResponse::Ignored;
        };
        match session.on_move(position, time, &self.gesture) {
            MoveOutcome::Pending => PointerResponse::Tracking,
            MoveOutcome::DragStarted { delta } => {
                self.start_drag();
                self.motion.drag_by(delta);
                PointerResponse::Redraw
            }
            MoveOutcome::Drag { delta } => {
                self.motion.drag_by(delta);
                PointerResponse::Redraw
            }
        }
    }

    fn start_drag(&mut self) {
        self.motion.begin_drag();
        self.status.set(MotionMode::Dragging.label());
    }

    fn end_session(&mut self, time: Duration) -> PointerResponse {
        let Some(session) = self.session.take() else {
            return PointerResponse::Ignored;
        };
        match session.finish(time, &self.gesture) {
            GestureEnd::Tap { face } => {
                let navigation = self.router.navigate(face);
                let label = &self.labels[face.index()];
                match &navigation {
                    Navigation::Opened { destination } => {
                        self.status.set(format!("opening {destination}"));
                    }
                    Navigation::Unmapped => self.status.set(format!("{label}: no destination")),
                    Navigation::Failed { destination, .. } => {
                        self.status.set(format!("could not open {destination}"));
                    }
                }
                PointerResponse::Tap { face, navigation }
            }
            GestureEnd::Release { recent } => {
                self.motion.end_drag(time, recent);
                self.status.set(self.motion.mode().label());
                PointerResponse::Redraw
            }
            GestureEnd::Abandoned => {
                debug!("tap candidate held too long; ignoring");
                PointerResponse::Ignored
            }
        }
    }

    /// Per-frame update. Returns whether anything visible changed.
    pub fn update(&mut self, now: Duration) -> bool {
        let before = self.motion.mode();
        let moved = self.motion.step(now);
        let after = self.motion.mode();
        if after != before {
            self.status.set(after.label());
        }
        moved || after != before
    }

    /// Apply new viewport dimensions. Idempotent; never touches motion state.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.camera.resize(width, height)
    }

    /// Zoom the camera by wheel steps (positive: closer). The cube's pose and
    /// motion are left alone.
    pub fn zoom(&mut self, steps: f32) -> bool {
        let moved = self.camera.zoom(steps);
        if moved {
            debug!(distance = self.camera.distance(), "camera zoomed");
        }
        moved
    }

    /// Return the camera to its configured eye.
    pub fn reset_view(&mut self) -> bool {
        let moved = self.camera.reset();
        if moved {
            debug!("camera reset");
        }
        moved
    }

    pub fn orientation(&self) -> Orientation {
        self.motion.orientation()
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn mode(&self) -> MotionMode {
        self.motion.mode()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_animating()
    }

    pub fn camera(&self) -> &CubeCamera {
        &self.camera
    }

    pub fn status(&self) -> &str {
        self.status.current()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Classify a screen position without starting a session (hover feedback).
    pub fn target_at(&self, position: Vec2) -> PointerTarget {
        self.picker
            .target_at(&self.camera, &self.motion.orientation(), position)
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.picker.model_matrix(&self.motion.orientation())
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        router::tests::{sample_routes, RecordingNavigator},
        status::tests::RecordingStatus,
    };
    use std::{cell::RefCell, rc::Rc};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    struct Harness {
        controller: CubeMenuController,
        visited: Rc<RefCell<Vec<String>>>,
    }

    fn harness_with(settings: MenuSettings) -> Harness {
        let navigator = RecordingNavigator::default();
        let visited = navigator.visited.clone();
        let controller =
            CubeMenuController::new(&settings, (800, 600), Box::new(navigator)).unwrap();
        Harness {
            controller,
            visited,
        }
    }

    fn harness() -> Harness {
        let mut settings = MenuSettings::default();
        settings.routes = sample_routes();
        harness_with(settings)
    }

    /// Whole-pixel screen position of `(u, v)` on a face of the cube at its
    /// current pose.
    fn screen_at(controller: &CubeMenuController, face: CubeFace, u: f32, v: f32) -> Vec2 {
        let (u_axis, v_axis) = face.texture_axes();
        let local = face.normal() + u_axis * (u * 2.0 - 1.0) + v_axis * (v * 2.0 - 1.0);
        let world = controller.model_matrix().transform_point3(local);
        controller.camera().world_to_screen(world).unwrap().round()
    }

    fn down(position: Vec2, at: u64) -> PointerEvent {
        PointerEvent::Down {
            position,
            time: ms(at),
        }
    }

    fn moved(position: Vec2, at: u64) -> PointerEvent {
        PointerEvent::Move {
            position,
            time: ms(at),
        }
    }

    #[test]
    fn quick_press_in_active_zone_navigates() {
        let mut h = harness();
        let start = screen_at(&h.controller, CubeFace::Front, 0.5, 0.5);
        let before = h.controller.orientation();

        assert_eq!(h.controller.handle_pointer(down(start, 0)), PointerResponse::Tracking);
        h.controller
            .handle_pointer(moved(start + Vec2::new(11.0, 0.0), 100));
        let response = h.controller.handle_pointer(PointerEvent::Up { time: ms(449) });

        assert_eq!(
            response,
            PointerResponse::Tap {
                face: CubeFace::Front,
                navigation: Navigation::Opened {
                    destination: "a/".into()
                }
            }
        );
        assert_eq!(*h.visited.borrow(), vec!["a/"]);
        assert_eq!(h.controller.orientation(), before);
        assert_eq!(h.controller.mode(), MotionMode::Idle);
        assert_eq!(h.controller.status(), "opening a/");
    }

    #[test]
    fn movement_past_threshold_turns_tap_into_drag() {
        let mut h = harness();
        let start = screen_at(&h.controller, CubeFace::Front, 0.5, 0.5);
        let before = h.controller.orientation();

        h.controller.handle_pointer(down(start, 0));
        let response = h
            .controller
            .handle_pointer(moved(start + Vec2::new(13.0, 0.0), 50));
        assert_eq!(response, PointerResponse::Redraw);
        h.controller.handle_pointer(PointerEvent::Up { time: ms(60) });

        assert!(h.visited.borrow().is_empty());
        assert_ne!(h.controller.orientation(), before);
        assert_eq!(h.controller.mode(), MotionMode::Inertia);
    }

    #[test]
    fn tap_on_top_and_bottom_faces_routes_to_their_pages() {
        let mut settings = MenuSettings::default();
        settings.routes = sample_routes();
        // Look straight at the top face, then at the bottom face.
        for (tilt, face, expected) in [
            (std::f32::consts::FRAC_PI_2, CubeFace::Top, "e.html"),
            (-std::f32::consts::FRAC_PI_2, CubeFace::Bottom, "f.html"),
        ] {
            settings.starting_orientation.tilt = tilt;
            let mut h = harness_with(settings.clone());
            let target = screen_at(&h.controller, face, 0.5, 0.5);
            assert_eq!(h.controller.target_at(target), PointerTarget::FaceActive(face));

            h.controller.handle_pointer(down(target, 0));
            let response = h.controller.handle_pointer(PointerEvent::Up { time: ms(80) });
            assert!(matches!(response, PointerResponse::Tap { face: f, .. } if f == face));
            assert_eq!(*h.visited.borrow(), vec![expected]);
        }
    }

    #[test]
    fn active_zone_drag_applies_only_post_threshold_delta() {
        let mut h = harness();
        let start = screen_at(&h.controller, CubeFace::Front, 0.5, 0.5);
        let turn_before = h.controller.orientation().turn;

        h.controller.handle_pointer(down(start, 0));
        h.controller
            .handle_pointer(moved(start + Vec2::new(10.0, 0.0), 0));
        h.controller
            .handle_pointer(moved(start + Vec2::new(20.0, 0.0), 16));

        let sample = 10.0_f32 * 0.006;
        assert_eq!(h.controller.orientation().turn - turn_before, sample);

        h.controller.handle_pointer(PointerEvent::Up { time: ms(40) });
        assert_eq!(h.controller.mode(), MotionMode::Inertia);
        assert_eq!(h.controller.motion().velocity().turn, sample);
        assert_eq!(h.controller.motion().velocity().tilt, 0.0);
    }

    #[test]
    fn rotate_zone_drag_applies_every_delta() {
        let mut h = harness();
        let start = screen_at(&h.controller, CubeFace::Front, 0.9, 0.5);
        assert_eq!(
            h.controller.target_at(start),
            PointerTarget::FaceRotate(CubeFace::Front)
        );

        assert_eq!(h.controller.handle_pointer(down(start, 0)), PointerResponse::Redraw);
        assert_eq!(h.controller.mode(), MotionMode::Dragging);
        h.controller
            .handle_pointer(moved(start + Vec2::new(10.0, 0.0), 0));
        h.controller
            .handle_pointer(moved(start + Vec2::new(20.0, 0.0), 16));

        let turn = h.controller.orientation().turn;
        assert!((turn - 0.12).abs() < 1e-6, "{turn}");
        assert_eq!(h.controller.motion().velocity().turn, 10.0_f32 * 0.006);
    }

    #[test]
    fn late_release_does_not_glide() {
        let mut h = harness();
        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 0));
        h.controller.handle_pointer(moved(Vec2::new(30.0, 2.0), 10));
        h.controller.handle_pointer(PointerEvent::Up { time: ms(131) });
        assert_eq!(h.controller.mode(), MotionMode::Still);
        assert_eq!(h.controller.status(), "still");
    }

    #[test]
    fn idle_latches_off_after_first_drag() {
        let mut h = harness();
        for frame in 0..10 {
            h.controller.update(ms(frame * 16));
        }
        assert_eq!(h.controller.mode(), MotionMode::Idle);

        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 200));
        h.controller.handle_pointer(moved(Vec2::new(40.0, 10.0), 210));
        h.controller.handle_pointer(PointerEvent::Up { time: ms(220) });

        for frame in 0..5_000 {
            h.controller.update(ms(220 + frame * 16));
            assert_ne!(h.controller.mode(), MotionMode::Idle);
        }
        assert_eq!(h.controller.mode(), MotionMode::Still);
        assert!(!h.controller.update(ms(200_000)));
    }

    #[test]
    fn leaving_the_surface_mid_drag_ends_the_session() {
        let mut h = harness();
        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 0));
        h.controller.handle_pointer(moved(Vec2::new(12.0, 2.0), 16));
        assert_eq!(
            h.controller.handle_pointer(PointerEvent::Leave { time: ms(20) }),
            PointerResponse::Redraw
        );
        assert!(!h.controller.has_session());
        assert_eq!(h.controller.mode(), MotionMode::Inertia);

        let turn = h.controller.orientation().turn;
        assert_eq!(
            h.controller.handle_pointer(moved(Vec2::new(300.0, 2.0), 30)),
            PointerResponse::Ignored
        );
        assert_eq!(h.controller.orientation().turn, turn);
    }

    #[test]
    fn cancel_behaves_like_release() {
        let mut h = harness();
        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 0));
        h.controller.handle_pointer(PointerEvent::Cancel { time: ms(5) });
        assert_eq!(h.controller.mode(), MotionMode::Still);
        assert!(!h.controller.has_session());
    }

    #[test]
    fn second_press_closes_previous_session() {
        let mut h = harness();
        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 0));
        h.controller.handle_pointer(down(Vec2::new(4.0, 4.0), 500));
        assert!(h.controller.has_session());
        assert_eq!(h.controller.mode(), MotionMode::Dragging);
    }

    #[test]
    fn tap_finished_by_a_second_press_is_reported() {
        let mut h = harness();
        let start = screen_at(&h.controller, CubeFace::Front, 0.5, 0.5);
        h.controller.handle_pointer(down(start, 0));

        let response = h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 50));
        assert_eq!(
            response,
            PointerResponse::Tap {
                face: CubeFace::Front,
                navigation: Navigation::Opened {
                    destination: "a/".into()
                }
            }
        );
        assert_eq!(*h.visited.borrow(), vec!["a/"]);
        // The new press is live and rotating.
        assert!(h.controller.has_session());
        assert_eq!(h.controller.mode(), MotionMode::Dragging);
    }

    #[test]
    fn zoom_and_reset_leave_the_cube_alone() {
        let mut h = harness();
        h.controller.update(ms(0));
        let orientation = h.controller.orientation();
        let view = h.controller.view_projection();

        assert!(h.controller.zoom(2.0));
        assert_ne!(h.controller.view_projection(), view);
        assert!(h.controller.zoom(-50.0));
        assert!((h.controller.camera().distance() - 8.0).abs() < 1e-4);
        assert!(h.controller.reset_view());
        assert_eq!(h.controller.view_projection(), view);

        assert_eq!(h.controller.orientation(), orientation);
        assert_eq!(h.controller.mode(), MotionMode::Idle);
        assert!(!h.controller.has_session());
    }

    #[test]
    fn unmapped_face_tap_is_a_no_op() {
        let mut h = harness_with(MenuSettings::default());
        let start = screen_at(&h.controller, CubeFace::Front, 0.5, 0.5);
        h.controller.handle_pointer(down(start, 0));
        let response = h.controller.handle_pointer(PointerEvent::Up { time: ms(30) });
        assert_eq!(
            response,
            PointerResponse::Tap {
                face: CubeFace::Front,
                navigation: Navigation::Unmapped
            }
        );
        assert!(h.visited.borrow().is_empty());
        assert_eq!(h.controller.status(), "Front: no destination");
    }

    #[test]
    fn resize_with_same_dimensions_changes_nothing() {
        let mut h = harness();
        h.controller.update(ms(0));
        let orientation = h.controller.orientation();
        let mode = h.controller.mode();
        assert!(!h.controller.resize(800, 600));
        assert!(h.controller.resize(1280, 720));
        assert!(!h.controller.resize(1280, 720));
        assert_eq!(h.controller.orientation(), orientation);
        assert_eq!(h.controller.mode(), mode);
    }

    #[test]
    fn status_sink_follows_mode_changes() {
        let mut h = harness();
        let sink = RecordingStatus::default();
        let lines = sink.lines.clone();
        h.controller.set_status_sink(Box::new(sink));

        h.controller.handle_pointer(down(Vec2::new(2.0, 2.0), 0));
        h.controller.handle_pointer(moved(Vec2::new(20.0, 2.0), 10));
        h.controller.handle_pointer(PointerEvent::Up { time: ms(20) });
        let mut frame = 0;
        while h.controller.mode() == MotionMode::Inertia {
            h.controller.update(ms(20 + frame * 16));
            frame += 1;
        }
        assert_eq!(*lines.borrow(), vec!["ready", "dragging", "gliding", "still"]);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = MenuSettings::default();
        settings.motion.inertia_damping = 0.0;
        let result =
            CubeMenuController::new(&settings, (10, 10), Box::new(RecordingNavigator::default()));
        assert!(result.is_err());
    }
}

mod face_textures;
mod input;
mod navigate;
mod render;
mod status;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use face_textures::FaceAtlas;
use glam::Vec2;
use input::TouchTracker;
use menu_core::{CubeMenuController, Navigation, PointerEvent, PointerResponse};
use navigate::SystemBrowser;
use render::CubeRenderer;
use settings::{MenuSettings, SettingsStore};
use status::TitleStatus;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, KeyEvent, MouseButton, Touch, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

const APP_NAME: &str = "cubemenu";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = load_settings();
    info!(
        routes = settings.routes.len(),
        idle_resume = ?settings.motion.idle_resume,
        "starting menu"
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = CubeMenuApp::new(settings);
    event_loop.run_app(&mut app).context("event loop error")?;
    Ok(())
}

/// `CUBEMENU_SETTINGS` overrides the per-user settings location.
fn load_settings() -> MenuSettings {
    let store = match std::env::var_os("CUBEMENU_SETTINGS") {
        Some(path) => SettingsStore::at(path),
        None => match SettingsStore::new() {
            Ok(store) => store,
            Err(err) => {
                warn!("Using default settings (no settings location): {err}");
                return MenuSettings::default();
            }
        },
    };
    match store.load() {
        Ok(settings) => {
            info!(path = %store.path().display(), "settings loaded");
            settings
        }
        Err(err) => {
            warn!("Using default settings (failed to load): {err}");
            MenuSettings::default()
        }
    }
}

struct CubeMenuApp {
    settings: MenuSettings,
    started: Instant,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    renderer: Option<CubeRenderer>,
    menu: Option<CubeMenuController>,
    cursor: Option<Vec2>,
    touch: TouchTracker,
    last_frame_time: Option<Instant>,
}

impl CubeMenuApp {
    fn new(settings: MenuSettings) -> Self {
        Self {
            settings,
            started: Instant::now(),
            window: None,
            window_id: None,
            renderer: None,
            menu: None,
            cursor: None,
            touch: TouchTracker::default(),
            last_frame_time: None,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
        let changed = self
            .menu
            .as_mut()
            .is_some_and(|menu| menu.resize(width.max(1), height.max(1)));
        if changed {
            self.request_redraw();
        }
    }

    fn pointer(&mut self, event_loop: &ActiveEventLoop, event: PointerEvent) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        match menu.handle_pointer(event) {
            PointerResponse::Ignored | PointerResponse::Tracking => {}
            PointerResponse::Redraw => self.request_redraw(),
            PointerResponse::Tap { face, navigation } => match navigation {
                Navigation::Opened { destination } if self.settings.close_on_navigate => {
                    info!(face = face.name(), %destination, "closing menu after navigation");
                    event_loop.exit();
                }
                _ => self.request_redraw(),
            },
        }
    }

    fn handle_touch(&mut self, event_loop: &ActiveEventLoop, touch: Touch) {
        let time = self.elapsed();
        let position = to_vec2(touch.location);
        if let Some(event) = self.touch.translate(touch.id, touch.phase, position, time) {
            self.pointer(event_loop, event);
        }
    }

    /// Camera changes that leave the cube orientation alone.
    fn adjust_view(&mut self, change: impl FnOnce(&mut CubeMenuController) -> bool) {
        if self.menu.as_mut().is_some_and(change) {
            self.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.elapsed();
        let (Some(menu), Some(renderer)) = (self.menu.as_mut(), self.renderer.as_mut()) else {
            return;
        };
        menu.update(now);
        match renderer.render(menu.model_matrix(), menu.view_projection()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("graphics device out of memory");
                event_loop.exit();
            }
            Err(err) => warn!("frame skipped: {err}"),
        }
        self.last_frame_time = Some(Instant::now());
    }
}

impl ApplicationHandler for CubeMenuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title(APP_NAME)
                .with_inner_size(LogicalSize::new(640.0, 640.0)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("failed to create window: {err}");
                show_fatal(&format!("Could not open a window: {err}"));
                event_loop.exit();
                return;
            }
        };

        let atlas = FaceAtlas::build(&self.settings.faces);
        let renderer = match CubeRenderer::new(window.clone(), &self.settings, &atlas) {
            Ok(renderer) => renderer,
            Err(err) => {
                error!("failed to initialize renderer: {err}");
                show_fatal(&format!("3D rendering is not available here: {err}"));
                event_loop.exit();
                return;
            }
        };
        info!(adapter = renderer.adapter_name(), "rendering with");

        let size = window.inner_size();
        let navigator = SystemBrowser::new(self.settings.base_url.clone());
        let mut menu = match CubeMenuController::new(
            &self.settings,
            (size.width.max(1), size.height.max(1)),
            Box::new(navigator),
        ) {
            Ok(menu) => menu,
            Err(err) => {
                error!("failed to start menu: {err}");
                event_loop.exit();
                return;
            }
        };
        menu.set_status_sink(Box::new(TitleStatus::new(window.clone(), APP_NAME)));

        self.window_id = Some(window.id());
        self.renderer = Some(renderer);
        self.menu = Some(menu);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if Some(window_id) != self.window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged {
                mut inner_size_writer,
                ..
            } => {
                if let Some(size) = self.window.as_ref().map(|window| window.inner_size()) {
                    let _ = inner_size_writer.request_inner_size(size);
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = to_vec2(position);
                self.cursor = Some(position);
                let time = self.elapsed();
                self.pointer(event_loop, PointerEvent::Move { position, time });
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                let time = self.elapsed();
                self.pointer(event_loop, PointerEvent::Leave { time });
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let time = self.elapsed();
                match (state, self.cursor) {
                    (ElementState::Pressed, Some(position)) => {
                        self.pointer(event_loop, PointerEvent::Down { position, time });
                    }
                    (ElementState::Released, _) => {
                        self.pointer(event_loop, PointerEvent::Up { time });
                    }
                    _ => {}
                }
            }
            WindowEvent::Touch(touch) => self.handle_touch(event_loop, touch),
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = input::wheel_steps(delta);
                self.adjust_view(|menu| menu.zoom(steps));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        repeat: false,
                        ..
                    },
                ..
            } if input::is_reset_key(&logical_key) => {
                info!("view reset");
                self.adjust_view(CubeMenuController::reset_view);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let animating = self.menu.as_ref().is_some_and(|menu| menu.is_animating());
        if !animating {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        // Optional FPS cap from settings (0 = uncapped).
        let now = Instant::now();
        let fps_cap = self.settings.fps_cap.max(0.0);
        if fps_cap > 0.0 {
            let target = Duration::from_secs_f32(1.0 / fps_cap);
            if let Some(last) = self.last_frame_time {
                if now - last < target {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(last + target));
                    return;
                }
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(now + target));
        } else {
            // Uncapped: vsync paces the frames.
            event_loop.set_control_flow(ControlFlow::Poll);
        }
        self.request_redraw();
    }
}

fn to_vec2(position: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}

/// Blocking native notice for failures the menu cannot run without.
fn show_fatal(message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(APP_NAME)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

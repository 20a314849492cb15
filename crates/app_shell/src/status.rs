use std::sync::Arc;

use menu_core::StatusSink;
use tracing::debug;
use winit::window::Window;

/// Shows the menu status next to the application name in the title bar.
pub struct TitleStatus {
    window: Arc<Window>,
    app_name: &'static str,
}

impl TitleStatus {
    pub fn new(window: Arc<Window>, app_name: &'static str) -> Self {
        Self { window, app_name }
    }
}

impl StatusSink for TitleStatus {
    fn set_status(&mut self, text: &str) {
        debug!(status = text, "status changed");
        self.window.set_title(&title_for(self.app_name, text));
    }
}

fn title_for(app_name: &str, status: &str) -> String {
    if status.is_empty() {
        app_name.to_owned()
    } else {
        format!("{app_name} ({status})")
    }
}

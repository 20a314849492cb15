use menu_core::{NavigateError, Navigator};
use tracing::debug;

/// Opens destinations with the desktop's default handler.
pub struct SystemBrowser {
    base_url: Option<String>,
}

impl SystemBrowser {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

impl Navigator for SystemBrowser {
    fn navigate(&mut self, destination: &str) -> Result<(), NavigateError> {
        let target = resolve_destination(self.base_url.as_deref(), destination);
        if target.is_empty() {
            return Err(NavigateError::Rejected {
                destination: destination.to_owned(),
                reason: "empty destination".into(),
            });
        }
        debug!(%target, "launching opener");
        open::that_detached(&target).map_err(|source| NavigateError::Launch {
            destination: target,
            source,
        })
    }
}

/// Join a relative destination onto `base`. Absolute URLs pass through.
pub fn resolve_destination(base: Option<&str>, destination: &str) -> String {
    let destination = destination.trim();
    if has_scheme(destination) {
        return destination.to_owned();
    }
    match base.map(str::trim).filter(|base| !base.is_empty()) {
        Some(base) => {
            let relative = destination.trim_start_matches("./").trim_start_matches('/');
            format!("{}/{}", base.trim_end_matches('/'), relative)
        }
        None => destination.to_owned(),
    }
}

fn has_scheme(destination: &str) -> bool {
    let Some((scheme, _)) = destination.split_once(':') else {
        return false;
    };
    // A single letter is a Windows drive, not a scheme.
    scheme.len() > 1
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

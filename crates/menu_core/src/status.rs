/// Write-only, human readable status surface ("ready", "dragging", ...).
///
/// Purely observational: nothing in the controller reads it back.
pub trait StatusSink {
    fn set_status(&mut self, text: &str);
}

/// Remembers the last text pushed so sinks only see changes.
#[derive(Default)]
pub(crate) struct StatusLine {
    sink: Option<Box<dyn StatusSink>>,
    current: String,
}

impl StatusLine {
    pub(crate) fn attach(&mut self, sink: Box<dyn StatusSink>) {
        let mut sink = sink;
        if !self.current.is_empty() {
            sink.set_status(&self.current);
        }
        self.sink = Some(sink);
    }

    pub(crate) fn set(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.current {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.set_status(&text);
        }
        self.current = text;
    }

    pub(crate) fn current(&self) -> &str {
        &self.current
    }
}

impl std::fmt::Debug for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusLine")
            .field("attached", &self.sink.is_some())
            .field("current", &self.current)
            .finish()
    }
}

/// Configuration for a game controller.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Overrides the story's finale payload preview length.
    pub payload_preview: Option<usize>,
}

impl EngineConfig {
    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Show `count` payload entries in the finale instead of the story's default.
    pub fn with_payload_preview(mut self, count: usize) -> Self {
        self.payload_preview = Some(count);
        self
    }
}

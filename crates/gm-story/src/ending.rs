use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Title and body text for one ending phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingPhaseText {
    /// Heading of the phase.
    pub title: String,
    /// Body text of the phase.
    #[serde(default)]
    pub body: String,
}

impl EndingPhaseText {
    /// Create phase text.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// The autoplay ending: three phases on fixed delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingDefinition {
    /// First phase, shown on mount.
    pub opening: EndingPhaseText,
    /// Second phase.
    pub interlude: EndingPhaseText,
    /// Terminal phase, which also shows the collected payload.
    pub finale: EndingPhaseText,
    /// Time spent in the opening phase.
    #[serde(rename = "opening_ms", with = "crate::serde_millis")]
    pub opening_delay: Duration,
    /// Time spent in the interlude phase.
    #[serde(rename = "interlude_ms", with = "crate::serde_millis")]
    pub interlude_delay: Duration,
    /// How many payload entries the finale shows.
    #[serde(default = "default_payload_preview")]
    pub payload_preview: usize,
}

fn default_payload_preview() -> usize {
    3
}

impl Default for EndingDefinition {
    fn default() -> Self {
        Self {
            opening: EndingPhaseText::default(),
            interlude: EndingPhaseText::default(),
            finale: EndingPhaseText::default(),
            opening_delay: Duration::from_millis(4000),
            interlude_delay: Duration::from_millis(4000),
            payload_preview: default_payload_preview(),
        }
    }
}

impl EndingDefinition {
    /// Offset from mount at which the finale begins.
    pub fn finale_after(&self) -> Duration {
        self.opening_delay + self.interlude_delay
    }
}

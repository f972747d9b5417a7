use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The delay schedule of one chapter's reveal sequence.
///
/// `dialog` is how long a reveal message stays on screen. Once the last
/// dialog of a fully explored chapter clears, the scene is restored after
/// `restore`, and the advance affordance appears `advance` later. Chapters
/// with a `handoff` delay hold completion back for that long after the
/// player advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// How long a reveal dialog stays visible.
    #[serde(rename = "dialog_ms", with = "crate::serde_millis")]
    pub dialog: Duration,
    /// Pause between the final dialog clearing and scene restoration.
    #[serde(rename = "restore_ms", with = "crate::serde_millis")]
    pub restore: Duration,
    /// Pause between scene restoration and the advance affordance.
    #[serde(rename = "advance_ms", with = "crate::serde_millis")]
    pub advance: Duration,
    /// Optional pause between the player advancing and completion.
    #[serde(
        rename = "handoff_ms",
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_millis::option"
    )]
    pub handoff: Option<Duration>,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::from_millis(4000, 500, 2000)
    }
}

impl RevealTiming {
    /// Build a schedule from millisecond delays, with no hand-off.
    pub fn from_millis(dialog: u64, restore: u64, advance: u64) -> Self {
        Self {
            dialog: Duration::from_millis(dialog),
            restore: Duration::from_millis(restore),
            advance: Duration::from_millis(advance),
            handoff: None,
        }
    }

    /// Hold completion back for `millis` after the player advances.
    pub fn with_handoff(mut self, millis: u64) -> Self {
        self.handoff = Some(Duration::from_millis(millis));
        self
    }

    /// Shortest time from the last discovery until advancing is possible.
    pub fn unlock_after(&self) -> Duration {
        self.dialog + self.restore + self.advance
    }
}

/// When each part of the title card appears, measured from mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroTiming {
    /// Delay before the title appears.
    #[serde(rename = "title_ms", with = "crate::serde_millis")]
    pub title: Duration,
    /// Delay before the subtitle appears.
    #[serde(rename = "subtitle_ms", with = "crate::serde_millis")]
    pub subtitle: Duration,
    /// Delay before the start prompt appears.
    #[serde(rename = "prompt_ms", with = "crate::serde_millis")]
    pub prompt: Duration,
}

impl Default for IntroTiming {
    fn default() -> Self {
        Self {
            title: Duration::from_millis(500),
            subtitle: Duration::from_millis(1500),
            prompt: Duration::from_millis(2500),
        }
    }
}

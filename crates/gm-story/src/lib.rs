//! Story data for Grey Map.
//!
//! A [`Story`] is static, declarative data: an ordered list of chapters, each
//! with its clue registry and reveal timings, plus the intro and ending
//! timelines. Nothing here has behaviour beyond lookup and validation; the
//! progression engine in `gm-engine` consumes it.

/// The built-in story shipped with the binary.
pub mod builtin;
/// Chapter definitions and identifiers.
pub mod chapter;
/// Clue definitions and identifiers.
pub mod clue;
/// Ending timeline definition.
pub mod ending;
/// Error types for loading and validating stories.
pub mod error;
/// Serde helpers for millisecond durations.
pub mod serde_millis;
/// The story root: title, intro, chapters, and ending.
pub mod story;
/// Delay schedules for chapters and the intro.
pub mod timing;

/// Re-export chapter types.
pub use chapter::{ChapterDefinition, ChapterId};
/// Re-export clue types.
pub use clue::{ClueDefinition, ClueId, Region};
/// Re-export ending types.
pub use ending::{EndingDefinition, EndingPhaseText};
/// Re-export error types.
pub use error::{StoryError, StoryResult};
/// Re-export the story root.
pub use story::{IntroDefinition, Story};
/// Re-export timing types.
pub use timing::{IntroTiming, RevealTiming};

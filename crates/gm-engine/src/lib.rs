//! Narrative progression engine for Grey Map.
//!
//! The [`GameController`] walks a [`gm_story::Story`] from the intro through
//! every chapter to the ending. Each mounted component owns a [`TimerQueue`]
//! of one-shot delayed transitions; the caller drives time explicitly by
//! passing a [`Timestamp`] to every operation, so the engine is fully
//! deterministic and has no threads of its own. Renderers read a
//! [`Snapshot`] after each call.

/// Per-chapter discovery and reveal state machine.
pub mod chapter;
/// Timestamps and clock sources.
pub mod clock;
/// Engine configuration.
pub mod config;
/// Top-level scene sequencing and progress ownership.
pub mod controller;
/// The autoplay ending timeline.
pub mod ending;
/// Error types for the engine.
pub mod error;
/// Engine events and the event log.
pub mod event;
/// The autoplay title card.
pub mod intro;
/// Cumulative playthrough progress.
pub mod progress;
/// The top-level scene enumeration.
pub mod scene;
/// Read model handed to renderers.
pub mod snapshot;
/// One-shot timer queue with cancellation.
pub mod timer;

/// Re-exports of chapter engine types.
pub use chapter::{ChapterEngine, ChapterPhase, ChapterRuntimeState, Discovery};
/// Re-exports of clock types.
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-export of [`controller::GameController`].
pub use controller::GameController;
/// Re-exports of ending types.
pub use ending::{EndingPhase, EndingSequencer};
/// Re-exports of error types.
pub use error::{ContractViolation, EngineError, EngineResult};
/// Re-exports of event types.
pub use event::{EventLog, GameEvent, GameEventKind};
/// Re-exports of intro types.
pub use intro::{IntroElement, IntroSequence};
/// Re-exports of progress types.
pub use progress::{GameProgress, ProgressUpdate};
/// Re-export of [`scene::Scene`].
pub use scene::Scene;
/// Re-export of [`snapshot::Snapshot`].
pub use snapshot::Snapshot;
/// Re-exports of timer types.
pub use timer::{TimerId, TimerQueue};

use std::fmt;

use gm_story::{ChapterId, ClueId};
use serde::Serialize;

use crate::clock::Timestamp;
use crate::ending::EndingPhase;
use crate::intro::IntroElement;
use crate::scene::Scene;

/// What kind of engine event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    // Lifecycle
    /// A playthrough began with the intro mounted.
    PlaythroughStarted {
        /// 1-based playthrough counter.
        playthrough: u32,
    },
    /// Progress was cleared for a new playthrough.
    ProgressReset,
    /// The controller mounted a different scene.
    SceneChanged {
        /// The scene that was torn down.
        from: Scene,
        /// The scene that was mounted.
        to: Scene,
    },

    // Intro
    /// A title card element became visible.
    IntroRevealed {
        /// Which element.
        element: IntroElement,
    },

    // Chapter
    /// A clue was discovered for the first time.
    ClueDiscovered {
        /// The active chapter.
        chapter: ChapterId,
        /// The discovered clue.
        clue: ClueId,
        /// Clues found so far in this chapter.
        found: usize,
        /// Clues in this chapter.
        total: usize,
    },
    /// A reveal dialog was shown.
    DialogShown {
        /// The active chapter.
        chapter: ChapterId,
        /// The dialog text.
        message: String,
    },
    /// The reveal dialog was dismissed by its timer.
    DialogCleared {
        /// The active chapter.
        chapter: ChapterId,
    },
    /// Every clue was found and the scene returned to color.
    SceneRestored {
        /// The active chapter.
        chapter: ChapterId,
    },
    /// The advance affordance was enabled.
    AdvanceReady {
        /// The active chapter.
        chapter: ChapterId,
    },
    /// The first advance started the hand-off beat.
    HandoffStarted {
        /// The active chapter.
        chapter: ChapterId,
    },
    /// A chapter reported completion and the controller accepted it.
    ChapterCompleted {
        /// The completed chapter.
        chapter: ChapterId,
        /// Number of payload entries it contributed, if it collects one.
        payload: Option<usize>,
    },

    // Ending
    /// The ending timeline moved to a new phase.
    EndingPhaseChanged {
        /// The new phase.
        phase: EndingPhase,
    },
}

impl GameEventKind {
    /// The chapter this event belongs to, if any.
    pub fn chapter(&self) -> Option<ChapterId> {
        match self {
            Self::ClueDiscovered { chapter, .. }
            | Self::DialogShown { chapter, .. }
            | Self::DialogCleared { chapter }
            | Self::SceneRestored { chapter }
            | Self::AdvanceReady { chapter }
            | Self::HandoffStarted { chapter }
            | Self::ChapterCompleted { chapter, .. } => Some(*chapter),
            Self::PlaythroughStarted { .. }
            | Self::ProgressReset
            | Self::SceneChanged { .. }
            | Self::IntroRevealed { .. }
            | Self::EndingPhaseChanged { .. } => None,
        }
    }
}

impl fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaythroughStarted { playthrough } => {
                write!(f, "playthrough {playthrough} started")
            }
            Self::ProgressReset => write!(f, "progress reset"),
            Self::SceneChanged { from, to } => write!(f, "scene {from} -> {to}"),
            Self::IntroRevealed { element } => write!(f, "intro: {element} revealed"),
            Self::ClueDiscovered {
                chapter,
                clue,
                found,
                total,
            } => write!(f, "{chapter}: found \"{clue}\" ({found}/{total})"),
            Self::DialogShown { chapter, message } => write!(f, "{chapter}: dialog \"{message}\""),
            Self::DialogCleared { chapter } => write!(f, "{chapter}: dialog cleared"),
            Self::SceneRestored { chapter } => write!(f, "{chapter}: scene restored"),
            Self::AdvanceReady { chapter } => write!(f, "{chapter}: advance ready"),
            Self::HandoffStarted { chapter } => write!(f, "{chapter}: hand-off started"),
            Self::ChapterCompleted {
                chapter,
                payload: Some(n),
            } => write!(f, "{chapter}: completed with {n} payload entries"),
            Self::ChapterCompleted {
                chapter,
                payload: None,
            } => write!(f, "{chapter}: completed"),
            Self::EndingPhaseChanged { phase } => write!(f, "ending: {phase}"),
        }
    }
}

/// A timestamped record of an engine transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// When the transition happened (a timer's deadline for timed ones).
    pub at: Timestamp,
    /// What happened.
    #[serde(flatten)]
    pub kind: GameEventKind,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at: Timestamp, kind: GameEventKind) -> Self {
        Self { at, kind }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.at.to_string();
        write!(f, "[{at:>9}] {}", self.kind)
    }
}

/// Accumulates events over a playthrough.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events past capacity.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events recorded at or after `at`.
    pub fn since(&self, at: Timestamp) -> &[GameEvent] {
        let start = self.events.partition_point(|e| e.at < at);
        &self.events[start..]
    }

    /// Events belonging to `chapter`.
    pub fn for_chapter(&self, chapter: ChapterId) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.chapter() == Some(chapter))
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(ms: u64, chapter: usize) -> GameEvent {
        GameEvent::new(
            Timestamp::from_millis(ms),
            GameEventKind::DialogCleared {
                chapter: ChapterId::new(chapter).unwrap(),
            },
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(cleared(100, 1));
        log.push(GameEvent::new(
            Timestamp::from_millis(200),
            GameEventKind::ProgressReset,
        ));
        log.push(cleared(300, 2));
        assert_eq!(log.len(), 3);
        assert_eq!(log.for_chapter(ChapterId::FIRST).len(), 1);
        assert_eq!(log.since(Timestamp::from_millis(200)).len(), 2);
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(cleared(i, 1));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].at.as_millis(), 3);
        assert_eq!(log.events()[1].at.as_millis(), 4);
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(cleared(1, 1));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn event_display() {
        let event = GameEvent::new(
            Timestamp::from_millis(4500),
            GameEventKind::ClueDiscovered {
                chapter: ChapterId::FIRST,
                clue: ClueId::new("bench"),
                found: 1,
                total: 2,
            },
        );
        insta::assert_snapshot!(event.to_string(), @r#"[   4.500s] chapter 1: found "bench" (1/2)"#);
    }

    #[test]
    fn event_json_is_flat() {
        let event = cleared(250, 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["at"], 250);
        assert_eq!(json["type"], "dialog_cleared");
        assert_eq!(json["chapter"], 3);
    }
}

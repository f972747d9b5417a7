use std::fmt;

use gm_story::{EndingDefinition, EndingPhaseText};
use serde::Serialize;
use tracing::debug;

use crate::clock::Timestamp;
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::progress::GameProgress;
use crate::timer::TimerQueue;

/// A phase of the ending timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingPhase {
    /// The first phase, shown on mount.
    Opening,
    /// The middle phase.
    Interlude,
    /// The terminal phase that shows the collected payload.
    Finale,
}

impl fmt::Display for EndingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => write!(f, "opening"),
            Self::Interlude => write!(f, "interlude"),
            Self::Finale => write!(f, "finale"),
        }
    }
}

/// Autoplay timeline stepping through the three ending phases.
///
/// Timing depends only on the mount time: `Interlude` at `opening_delay`,
/// `Finale` at `opening_delay + interlude_delay`. No input changes it.
#[derive(Debug, Clone)]
pub struct EndingSequencer {
    definition: EndingDefinition,
    progress: GameProgress,
    preview_len: usize,
    phase: EndingPhase,
    timers: TimerQueue<EndingPhase>,
    started_at: Timestamp,
}

impl EndingSequencer {
    /// Start the ending at `now` in the `Opening` phase.
    ///
    /// `progress` is a read-only copy of the playthrough's progress;
    /// `preview_len` caps how many payload entries the finale shows.
    pub fn start(
        definition: &EndingDefinition,
        progress: GameProgress,
        preview_len: usize,
        now: Timestamp,
        events: &mut EventLog,
    ) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule(now + definition.opening_delay, EndingPhase::Interlude);
        timers.schedule(now + definition.finale_after(), EndingPhase::Finale);
        events.push(GameEvent::new(
            now,
            GameEventKind::EndingPhaseChanged {
                phase: EndingPhase::Opening,
            },
        ));
        Self {
            definition: definition.clone(),
            progress,
            preview_len,
            phase: EndingPhase::Opening,
            timers,
            started_at: now,
        }
    }

    /// Fire the earliest phase change due at `now`. Returns its deadline.
    pub fn fire_next(&mut self, now: Timestamp, events: &mut EventLog) -> Option<Timestamp> {
        let (at, phase) = self.timers.pop_due(now)?;
        debug!(from = %self.phase, to = %phase, %at, "ending phase");
        self.phase = phase;
        events.push(GameEvent::new(at, GameEventKind::EndingPhaseChanged { phase }));
        Some(at)
    }

    /// The current phase.
    pub fn phase(&self) -> EndingPhase {
        self.phase
    }

    /// Whether the terminal phase has been reached.
    pub fn is_finished(&self) -> bool {
        self.phase == EndingPhase::Finale
    }

    /// Title and body for the current phase.
    pub fn text(&self) -> &EndingPhaseText {
        match self.phase {
            EndingPhase::Opening => &self.definition.opening,
            EndingPhase::Interlude => &self.definition.interlude,
            EndingPhase::Finale => &self.definition.finale,
        }
    }

    /// The progress the ending was started with.
    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// The payload entries to render. `None` until the finale.
    pub fn payload_preview(&self) -> Option<&[String]> {
        if !self.is_finished() {
            return None;
        }
        let payload = self.progress.collected_payload();
        Some(&payload[..payload.len().min(self.preview_len)])
    }

    /// When the ending was mounted.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Deadline of the next phase change.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    /// Number of pending phase changes.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancel all pending phase changes.
    pub fn teardown(&mut self) -> usize {
        self.timers.cancel_all()
    }
}

#[cfg(test)]
mod tests {
    use gm_story::ChapterId;

    use super::*;
    use crate::progress::ProgressUpdate;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn progress_with(payload: &[&str]) -> GameProgress {
        let mut progress = GameProgress::new(1);
        progress.merge(ProgressUpdate::with_payload(
            ChapterId::FIRST,
            payload.iter().map(|s| s.to_string()).collect(),
        ));
        progress
    }

    fn drain(ending: &mut EndingSequencer, now: Timestamp, log: &mut EventLog) {
        while ending.fire_next(now, log).is_some() {}
    }

    #[test]
    fn phases_follow_delays() {
        let mut log = EventLog::new(0);
        let mut ending = EndingSequencer::start(
            &EndingDefinition::default(),
            GameProgress::new(1),
            3,
            at(1000),
            &mut log,
        );
        assert_eq!(ending.phase(), EndingPhase::Opening);

        drain(&mut ending, at(4999), &mut log);
        assert_eq!(ending.phase(), EndingPhase::Opening);
        drain(&mut ending, at(5000), &mut log);
        assert_eq!(ending.phase(), EndingPhase::Interlude);
        drain(&mut ending, at(9000), &mut log);
        assert_eq!(ending.phase(), EndingPhase::Finale);
        assert!(ending.is_finished());
        assert_eq!(ending.next_deadline(), None);

        let phases: Vec<_> = log
            .events()
            .iter()
            .map(|e| (e.at.as_millis(), e.kind.clone()))
            .collect();
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[2].0, 9000);
    }

    #[test]
    fn late_tick_fires_both_phases_in_order() {
        let mut log = EventLog::new(0);
        let mut ending = EndingSequencer::start(
            &EndingDefinition::default(),
            GameProgress::new(1),
            3,
            Timestamp::ZERO,
            &mut log,
        );
        assert_eq!(ending.fire_next(at(60_000), &mut log), Some(at(4000)));
        assert_eq!(ending.phase(), EndingPhase::Interlude);
        assert_eq!(ending.fire_next(at(60_000), &mut log), Some(at(8000)));
        assert_eq!(ending.phase(), EndingPhase::Finale);
    }

    #[test]
    fn payload_hidden_until_finale_and_capped() {
        let mut log = EventLog::new(0);
        let mut ending = EndingSequencer::start(
            &EndingDefinition::default(),
            progress_with(&["a", "b", "c", "d"]),
            3,
            Timestamp::ZERO,
            &mut log,
        );
        assert_eq!(ending.payload_preview(), None);
        drain(&mut ending, at(8000), &mut log);
        let preview = ending.payload_preview().unwrap();
        assert_eq!(preview, ["a", "b", "c"]);
        assert_eq!(ending.text().title, EndingDefinition::default().finale.title);
    }

    #[test]
    fn short_payload_is_shown_whole() {
        let mut log = EventLog::new(0);
        let mut ending = EndingSequencer::start(
            &EndingDefinition::default(),
            progress_with(&["only"]),
            3,
            Timestamp::ZERO,
            &mut log,
        );
        drain(&mut ending, at(8000), &mut log);
        assert_eq!(ending.payload_preview().unwrap(), ["only"]);
    }

    #[test]
    fn teardown_freezes_phase() {
        let mut log = EventLog::new(0);
        let mut ending = EndingSequencer::start(
            &EndingDefinition::default(),
            GameProgress::new(1),
            3,
            Timestamp::ZERO,
            &mut log,
        );
        assert_eq!(ending.teardown(), 2);
        drain(&mut ending, at(60_000), &mut log);
        assert_eq!(ending.phase(), EndingPhase::Opening);
    }
}

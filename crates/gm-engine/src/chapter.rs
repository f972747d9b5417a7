//! The per-chapter discovery and reveal state machine.
//!
//! A [`ChapterEngine`] is mounted fresh for each chapter and torn down when
//! the controller accepts its completion. Discoveries show a dialog; once the
//! last dialog clears with every clue found, the scene is restored and,
//! after a further pause, the advance affordance is enabled:
//!
//! ```text
//! Idle -> DialogShown -> (Idle | Restoring) -> Restored -> ReadyToAdvance
//!      -> [HandingOff ->] Completed
//! ```

use std::collections::BTreeSet;
use std::fmt;

use gm_story::{ChapterDefinition, ChapterId, ClueId};
use serde::Serialize;
use tracing::debug;

use crate::clock::Timestamp;
use crate::error::ContractViolation;
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::progress::ProgressUpdate;
use crate::timer::{TimerId, TimerQueue};

/// Where a chapter is in its reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterPhase {
    /// Waiting for discoveries, no dialog showing.
    Idle,
    /// A reveal dialog is showing.
    DialogShown,
    /// Every clue is found; restoration is pending.
    Restoring,
    /// The scene is restored; the advance affordance is pending.
    Restored,
    /// The user may advance.
    ReadyToAdvance,
    /// The hand-off beat is playing.
    HandingOff,
    /// Completion has been reported.
    Completed,
}

impl fmt::Display for ChapterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DialogShown => "dialog shown",
            Self::Restoring => "restoring",
            Self::Restored => "restored",
            Self::ReadyToAdvance => "ready to advance",
            Self::HandingOff => "handing off",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Discovery state of the mounted chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterRuntimeState {
    discovered: BTreeSet<ClueId>,
    active_dialog: Option<String>,
    scene_restored: bool,
    advance_ready: bool,
}

impl ChapterRuntimeState {
    /// Clues found so far.
    pub fn discovered(&self) -> &BTreeSet<ClueId> {
        &self.discovered
    }

    /// Whether `clue` has been found.
    pub fn is_discovered(&self, clue: &ClueId) -> bool {
        self.discovered.contains(clue)
    }

    /// The dialog currently showing, if any.
    pub fn active_dialog(&self) -> Option<&str> {
        self.active_dialog.as_deref()
    }

    /// Whether the scene has been restored.
    pub fn scene_restored(&self) -> bool {
        self.scene_restored
    }

    /// Whether the advance affordance is enabled.
    pub fn advance_ready(&self) -> bool {
        self.advance_ready
    }
}

/// Delayed transitions a chapter schedules on its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterTimer {
    /// Dismiss the reveal dialog.
    ClearDialog,
    /// Restore the scene.
    RestoreScene,
    /// Enable the advance affordance.
    EnableAdvance,
    /// End the hand-off beat and complete.
    FinishHandoff,
}

/// Outcome of a discovery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// First discovery: the dialog was shown.
    New,
    /// Already found: nothing changed.
    AlreadyFound,
}

/// Runs one chapter's discovery and timed-reveal sequence.
#[derive(Debug, Clone)]
pub struct ChapterEngine {
    id: ChapterId,
    definition: ChapterDefinition,
    state: ChapterRuntimeState,
    phase: ChapterPhase,
    timers: TimerQueue<ChapterTimer>,
    dialog_timer: Option<TimerId>,
    handoff_timer: Option<TimerId>,
    mounted_at: Timestamp,
}

impl ChapterEngine {
    /// Mount a chapter with fresh runtime state.
    pub fn mount(id: ChapterId, definition: ChapterDefinition, now: Timestamp) -> Self {
        debug!(chapter = %id, clues = definition.clue_count(), "chapter mounted");
        Self {
            id,
            definition,
            state: ChapterRuntimeState::default(),
            phase: ChapterPhase::Idle,
            timers: TimerQueue::new(),
            dialog_timer: None,
            handoff_timer: None,
            mounted_at: now,
        }
    }

    /// Record a discovery.
    ///
    /// A repeat discovery is a no-op: it neither re-shows the dialog nor
    /// touches any timer. A new one replaces the visible dialog and restarts
    /// the dialog timer.
    pub fn discover(
        &mut self,
        clue: &ClueId,
        now: Timestamp,
        events: &mut EventLog,
    ) -> Result<Discovery, ContractViolation> {
        let Some(definition) = self.definition.clue(clue) else {
            return Err(ContractViolation::UnknownClue {
                chapter: self.id,
                clue: clue.clone(),
                suggestion: self.definition.suggest(clue.as_str()).cloned(),
            });
        };
        if self.state.discovered.contains(clue) {
            debug!(chapter = %self.id, %clue, "already discovered");
            return Ok(Discovery::AlreadyFound);
        }

        let message = definition.reveal_message.clone();
        self.state.discovered.insert(clue.clone());
        self.state.active_dialog = Some(message.clone());
        if let Some(previous) = self.dialog_timer.take() {
            self.timers.cancel(previous);
        }
        self.dialog_timer = Some(
            self.timers
                .schedule(now + self.definition.timing.dialog, ChapterTimer::ClearDialog),
        );
        self.phase = ChapterPhase::DialogShown;

        let found = self.state.discovered.len();
        let total = self.definition.clue_count();
        debug!(chapter = %self.id, %clue, found, total, "clue discovered");
        events.push(GameEvent::new(
            now,
            GameEventKind::ClueDiscovered {
                chapter: self.id,
                clue: clue.clone(),
                found,
                total,
            },
        ));
        events.push(GameEvent::new(
            now,
            GameEventKind::DialogShown {
                chapter: self.id,
                message,
            },
        ));
        Ok(Discovery::New)
    }

    /// Fire the earliest timer due at `now`.
    ///
    /// Returns the timer's deadline, plus the completion if the timer ended
    /// the hand-off. `None` when nothing is due.
    pub fn fire_next(
        &mut self,
        now: Timestamp,
        events: &mut EventLog,
    ) -> Option<(Timestamp, Option<ProgressUpdate>)> {
        let (at, timer) = self.timers.pop_due(now)?;
        let timing = self.definition.timing;
        let kind = match timer {
            ChapterTimer::ClearDialog => {
                self.dialog_timer = None;
                self.state.active_dialog = None;
                if self.all_found() {
                    self.phase = ChapterPhase::Restoring;
                    self.timers
                        .schedule(at + timing.restore, ChapterTimer::RestoreScene);
                } else {
                    self.phase = ChapterPhase::Idle;
                }
                GameEventKind::DialogCleared { chapter: self.id }
            }
            ChapterTimer::RestoreScene => {
                self.state.scene_restored = true;
                self.phase = ChapterPhase::Restored;
                self.timers
                    .schedule(at + timing.advance, ChapterTimer::EnableAdvance);
                GameEventKind::SceneRestored { chapter: self.id }
            }
            ChapterTimer::EnableAdvance => {
                self.state.advance_ready = true;
                self.phase = ChapterPhase::ReadyToAdvance;
                GameEventKind::AdvanceReady { chapter: self.id }
            }
            ChapterTimer::FinishHandoff => {
                self.handoff_timer = None;
                debug!(chapter = %self.id, %at, "hand-off elapsed");
                return Some((at, Some(self.complete())));
            }
        };
        debug!(chapter = %self.id, phase = %self.phase, %at, "chapter timer fired");
        events.push(GameEvent::new(at, kind));
        Some((at, None))
    }

    /// Handle the advance affordance.
    ///
    /// From `ReadyToAdvance` this completes the chapter, or starts the
    /// hand-off beat when the chapter has one. During the hand-off it skips
    /// the remaining wait and completes.
    pub fn advance(
        &mut self,
        now: Timestamp,
        events: &mut EventLog,
    ) -> Result<Option<ProgressUpdate>, ContractViolation> {
        match self.phase {
            ChapterPhase::ReadyToAdvance => match self.definition.timing.handoff {
                Some(delay) => {
                    self.phase = ChapterPhase::HandingOff;
                    self.handoff_timer = Some(
                        self.timers
                            .schedule(now + delay, ChapterTimer::FinishHandoff),
                    );
                    debug!(chapter = %self.id, %now, "hand-off started");
                    events.push(GameEvent::new(
                        now,
                        GameEventKind::HandoffStarted { chapter: self.id },
                    ));
                    Ok(None)
                }
                None => Ok(Some(self.complete())),
            },
            ChapterPhase::HandingOff => {
                if let Some(timer) = self.handoff_timer.take() {
                    self.timers.cancel(timer);
                }
                Ok(Some(self.complete()))
            }
            phase => Err(ContractViolation::AdvanceNotReady {
                chapter: self.id,
                phase,
            }),
        }
    }

    fn complete(&mut self) -> ProgressUpdate {
        self.phase = ChapterPhase::Completed;
        if self.definition.collects_payload {
            ProgressUpdate::with_payload(self.id, self.definition.payload())
        } else {
            ProgressUpdate::completed(self.id)
        }
    }

    fn all_found(&self) -> bool {
        self.definition
            .clue_ids()
            .all(|id| self.state.discovered.contains(id))
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn teardown(&mut self) -> usize {
        self.dialog_timer = None;
        self.handoff_timer = None;
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(chapter = %self.id, cancelled, "chapter torn down with pending timers");
        }
        cancelled
    }

    /// The chapter id.
    pub fn id(&self) -> ChapterId {
        self.id
    }

    /// The chapter's static definition.
    pub fn definition(&self) -> &ChapterDefinition {
        &self.definition
    }

    /// The discovery state.
    pub fn state(&self) -> &ChapterRuntimeState {
        &self.state
    }

    /// The current phase.
    pub fn phase(&self) -> ChapterPhase {
        self.phase
    }

    /// When the chapter was mounted.
    pub fn mounted_at(&self) -> Timestamp {
        self.mounted_at
    }

    /// The pending timers.
    pub fn timers(&self) -> &TimerQueue<ChapterTimer> {
        &self.timers
    }

    /// Deadline of the next pending timer.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }
}

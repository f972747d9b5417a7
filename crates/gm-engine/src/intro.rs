use std::fmt;

use gm_story::IntroTiming;
use serde::Serialize;
use tracing::debug;

use crate::clock::Timestamp;
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::timer::TimerQueue;

/// An element of the title card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroElement {
    /// The story title.
    Title,
    /// The subtitle under it.
    Subtitle,
    /// The "press start" prompt.
    Prompt,
}

impl fmt::Display for IntroElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Subtitle => write!(f, "subtitle"),
            Self::Prompt => write!(f, "prompt"),
        }
    }
}

/// Autoplay reveal of the title card while the intro is mounted.
///
/// Purely presentational: the controller accepts `start` whether or not
/// anything has been revealed yet.
#[derive(Debug, Clone)]
pub struct IntroSequence {
    timers: TimerQueue<IntroElement>,
    revealed: Vec<IntroElement>,
    mounted_at: Timestamp,
}

impl IntroSequence {
    /// Mount the intro at `now`, scheduling each reveal relative to it.
    pub fn mount(timing: &IntroTiming, now: Timestamp) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule(now + timing.title, IntroElement::Title);
        timers.schedule(now + timing.subtitle, IntroElement::Subtitle);
        timers.schedule(now + timing.prompt, IntroElement::Prompt);
        Self {
            timers,
            revealed: Vec::new(),
            mounted_at: now,
        }
    }

    /// Fire the earliest reveal due at `now`. Returns its deadline.
    pub fn fire_next(&mut self, now: Timestamp, events: &mut EventLog) -> Option<Timestamp> {
        let (at, element) = self.timers.pop_due(now)?;
        debug!(%element, %at, "intro reveal");
        self.revealed.push(element);
        events.push(GameEvent::new(at, GameEventKind::IntroRevealed { element }));
        Some(at)
    }

    /// Whether `element` is visible.
    pub fn is_revealed(&self, element: IntroElement) -> bool {
        self.revealed.contains(&element)
    }

    /// Elements revealed so far, in reveal order.
    pub fn revealed(&self) -> &[IntroElement] {
        &self.revealed
    }

    /// When the intro was mounted.
    pub fn mounted_at(&self) -> Timestamp {
        self.mounted_at
    }

    /// Deadline of the next reveal.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    /// Number of pending reveals.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancel all pending reveals.
    pub fn teardown(&mut self) -> usize {
        self.timers.cancel_all()
    }
}

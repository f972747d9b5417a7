use std::sync::Arc;

use gm_story::{ChapterId, ClueId, Story};
use tracing::{debug, info, instrument, warn};

use crate::chapter::{ChapterEngine, Discovery};
use crate::clock::Timestamp;
use crate::config::EngineConfig;
use crate::ending::EndingSequencer;
use crate::error::{ContractViolation, EngineError, EngineResult};
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::intro::IntroSequence;
use crate::progress::{GameProgress, ProgressUpdate};
use crate::scene::Scene;
use crate::snapshot::Snapshot;

/// The mounted component. Exactly one exists at a time.
#[derive(Debug)]
enum Stage {
    Intro(IntroSequence),
    Chapter(ChapterEngine),
    Ending(EndingSequencer),
}

impl Stage {
    fn scene(&self) -> Scene {
        match self {
            Self::Intro(_) => Scene::Intro,
            Self::Chapter(chapter) => Scene::Chapter(chapter.id()),
            Self::Ending(_) => Scene::Ending,
        }
    }

    fn next_deadline(&self) -> Option<Timestamp> {
        match self {
            Self::Intro(intro) => intro.next_deadline(),
            Self::Chapter(chapter) => chapter.next_deadline(),
            Self::Ending(ending) => ending.next_deadline(),
        }
    }

    fn pending_timers(&self) -> usize {
        match self {
            Self::Intro(intro) => intro.pending_timers(),
            Self::Chapter(chapter) => chapter.timers().len(),
            Self::Ending(ending) => ending.pending_timers(),
        }
    }

    fn teardown(&mut self) -> usize {
        match self {
            Self::Intro(intro) => intro.teardown(),
            Self::Chapter(chapter) => chapter.teardown(),
            Self::Ending(ending) => ending.teardown(),
        }
    }
}

/// Owns the scene sequence and the playthrough's progress.
///
/// Every operation takes the caller's current [`Timestamp`]. Before doing
/// anything else it fires every timer due up to that time, so the outcome
/// depends only on the sequence of (operation, timestamp) pairs.
#[derive(Debug)]
pub struct GameController {
    story: Arc<Story>,
    config: EngineConfig,
    stage: Stage,
    progress: GameProgress,
    events: EventLog,
    now: Timestamp,
    playthrough: u32,
}

impl GameController {
    /// Validate `story` and mount the intro at time zero.
    pub fn new(story: impl Into<Arc<Story>>, config: EngineConfig) -> EngineResult<Self> {
        let story = story.into();
        story.validate()?;

        let mut events = EventLog::new(config.max_events);
        events.push(GameEvent::new(
            Timestamp::ZERO,
            GameEventKind::PlaythroughStarted { playthrough: 1 },
        ));
        info!(title = %story.title, chapters = story.chapter_count(), "playthrough started");

        Ok(Self {
            stage: Stage::Intro(IntroSequence::mount(&story.intro.timing, Timestamp::ZERO)),
            progress: GameProgress::new(story.chapter_count()),
            story,
            config,
            events,
            now: Timestamp::ZERO,
            playthrough: 1,
        })
    }

    // -- Queries --

    /// The active scene.
    pub fn scene(&self) -> Scene {
        self.stage.scene()
    }

    /// Cumulative progress.
    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// The story being played.
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The latest timestamp seen.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// 1-based playthrough counter, bumped by [`restart`](Self::restart).
    pub fn playthrough(&self) -> u32 {
        self.playthrough
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The mounted intro, if the intro is active.
    pub fn intro(&self) -> Option<&IntroSequence> {
        match &self.stage {
            Stage::Intro(intro) => Some(intro),
            _ => None,
        }
    }

    /// The mounted chapter engine, if a chapter is active.
    pub fn chapter(&self) -> Option<&ChapterEngine> {
        match &self.stage {
            Stage::Chapter(chapter) => Some(chapter),
            _ => None,
        }
    }

    /// The mounted ending, if the ending is active.
    pub fn ending(&self) -> Option<&EndingSequencer> {
        match &self.stage {
            Stage::Ending(ending) => Some(ending),
            _ => None,
        }
    }

    /// When the next timer of the mounted component is due. A real-time
    /// driver may sleep until then if no input arrives.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.stage.next_deadline()
    }

    /// Number of timers pending on the mounted component.
    pub fn pending_timers(&self) -> usize {
        self.stage.pending_timers()
    }

    /// The read model for renderers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    // -- Operations --

    /// Fire every timer due at or before `now`. Returns how many fired.
    pub fn tick(&mut self, now: Timestamp) -> usize {
        self.sync(now)
    }

    /// Leave the intro and mount the first chapter.
    #[instrument(skip(self), fields(scene = %self.scene()))]
    pub fn start(&mut self, now: Timestamp) -> EngineResult<()> {
        self.sync(now);
        let scene = self.scene();
        if scene != Scene::Intro {
            return Err(self.reject(ContractViolation::NotInIntro { scene }));
        }
        self.enter(Scene::Chapter(ChapterId::FIRST), self.now);
        Ok(())
    }

    /// Route a discovery to the mounted chapter.
    #[instrument(skip(self), fields(scene = %self.scene()))]
    pub fn discover(&mut self, clue: &ClueId, now: Timestamp) -> EngineResult<Discovery> {
        self.sync(now);
        let scene = self.scene();
        let result = match &mut self.stage {
            Stage::Chapter(chapter) => chapter.discover(clue, self.now, &mut self.events),
            _ => Err(ContractViolation::NoActiveChapter { scene }),
        };
        result.map_err(|violation| self.reject(violation))
    }

    /// Route the advance affordance to the mounted chapter. If the chapter
    /// completes, its progress is merged and the next scene mounted.
    #[instrument(skip(self), fields(scene = %self.scene()))]
    pub fn advance(&mut self, now: Timestamp) -> EngineResult<()> {
        self.sync(now);
        let scene = self.scene();
        let result = match &mut self.stage {
            Stage::Chapter(chapter) => chapter.advance(self.now, &mut self.events),
            _ => Err(ContractViolation::NoActiveChapter { scene }),
        };
        match result {
            Ok(Some(update)) => {
                self.finish_chapter(update, self.now);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(violation) => Err(self.reject(violation)),
        }
    }

    /// Accept a completion signal for `chapter`.
    ///
    /// Only the active chapter may complete; a stale or duplicate signal is
    /// rejected without touching progress.
    #[instrument(skip(self, payload), fields(scene = %self.scene()))]
    pub fn complete_chapter(
        &mut self,
        chapter: ChapterId,
        payload: Option<Vec<String>>,
        now: Timestamp,
    ) -> EngineResult<()> {
        self.sync(now);
        let scene = self.scene();
        if scene != Scene::Chapter(chapter) {
            return Err(self.reject(ContractViolation::ChapterNotActive {
                requested: chapter,
                scene,
            }));
        }
        self.finish_chapter(ProgressUpdate { chapter, payload }, self.now);
        Ok(())
    }

    /// Begin a new playthrough: tear down the mounted component, reset
    /// progress and mount the intro.
    #[instrument(skip(self), fields(scene = %self.scene()))]
    pub fn restart(&mut self, now: Timestamp) {
        self.sync(now);
        self.progress.reset();
        self.playthrough += 1;
        self.events
            .push(GameEvent::new(self.now, GameEventKind::ProgressReset));
        self.events.push(GameEvent::new(
            self.now,
            GameEventKind::PlaythroughStarted {
                playthrough: self.playthrough,
            },
        ));
        info!(playthrough = self.playthrough, "playthrough restarted");
        self.enter(Scene::Intro, self.now);
    }

    /// End the session. Cancels every pending timer and returns the final
    /// progress.
    pub fn abandon(mut self) -> GameProgress {
        let cancelled = self.stage.teardown();
        info!(scene = %self.scene(), cancelled, "playthrough abandoned");
        self.progress
    }

    // -- Internals --

    fn sync(&mut self, now: Timestamp) -> usize {
        let now = if now < self.now {
            warn!(%now, last = %self.now, "timestamp went backwards, clamping");
            self.now
        } else {
            now
        };

        let mut fired = 0;
        loop {
            let step = match &mut self.stage {
                Stage::Intro(intro) => intro.fire_next(now, &mut self.events).map(|at| (at, None)),
                Stage::Chapter(chapter) => chapter.fire_next(now, &mut self.events),
                Stage::Ending(ending) => ending.fire_next(now, &mut self.events).map(|at| (at, None)),
            };
            let Some((at, completion)) = step else {
                break;
            };
            fired += 1;
            if let Some(update) = completion {
                self.finish_chapter(update, at);
            }
        }
        self.now = now;
        fired
    }

    fn finish_chapter(&mut self, update: ProgressUpdate, at: Timestamp) {
        let chapter = update.chapter;
        let payload = update.payload.as_ref().map(Vec::len);
        self.progress.merge(update);
        self.events.push(GameEvent::new(
            at,
            GameEventKind::ChapterCompleted { chapter, payload },
        ));
        info!(%chapter, completed = self.progress.completed_count(), "chapter completed");

        let next = self
            .story
            .next_chapter(chapter)
            .map_or(Scene::Ending, Scene::Chapter);
        self.enter(next, at);
    }

    fn enter(&mut self, next: Scene, at: Timestamp) {
        let from = self.scene();
        let cancelled = self.stage.teardown();
        if cancelled > 0 {
            debug!(%from, cancelled, "cancelled timers on teardown");
        }

        self.stage = match next.chapter().and_then(|id| self.story.chapter(id).map(|c| (id, c))) {
            Some((id, definition)) => Stage::Chapter(ChapterEngine::mount(id, definition.clone(), at)),
            None if next == Scene::Intro => {
                Stage::Intro(IntroSequence::mount(&self.story.intro.timing, at))
            }
            None => {
                let preview = self
                    .config
                    .payload_preview
                    .unwrap_or(self.story.ending.payload_preview);
                Stage::Ending(EndingSequencer::start(
                    &self.story.ending,
                    self.progress.clone(),
                    preview,
                    at,
                    &mut self.events,
                ))
            }
        };

        let to = self.scene();
        info!(%from, %to, %at, "scene changed");
        self.events
            .push(GameEvent::new(at, GameEventKind::SceneChanged { from, to }));
    }

    fn reject(&self, violation: ContractViolation) -> EngineError {
        warn!(scene = %self.scene(), %violation, "contract violation");
        violation.into()
    }
}

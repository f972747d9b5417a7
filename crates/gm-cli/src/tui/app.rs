use gm_engine::{
    ChapterPhase, Clock, Discovery, EngineResult, GameController, Scene, Snapshot, Timestamp,
};

pub struct App<C> {
    pub game: GameController,
    pub clock: C,
    pub show_help: bool,

    // Clue list state
    pub cursor: usize,

    // Last rejected action, shown in the status bar until the next one
    pub notice: Option<String>,

    scene: Scene,
}

impl<C: Clock> App<C> {
    pub fn new(game: GameController, clock: C) -> Self {
        let scene = game.scene();
        Self {
            game,
            clock,
            show_help: false,
            cursor: 0,
            notice: None,
            scene,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Fire due timers and follow any scene change.
    pub fn tick(&mut self) {
        let now = self.now();
        self.game.tick(now);
        self.follow_scene();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    fn clue_count(&self) -> usize {
        self.game
            .chapter()
            .map_or(0, |chapter| chapter.definition().clue_count())
    }

    fn follow_scene(&mut self) {
        let scene = self.game.scene();
        if scene != self.scene {
            self.scene = scene;
            self.cursor = 0;
        }
    }

    // Navigation
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.clue_count() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.clue_count().saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // Actions

    /// Enter: whatever the current scene offers.
    pub fn confirm(&mut self) {
        match self.game.scene() {
            Scene::Intro => {
                let now = self.now();
                let result = self.game.start(now);
                self.report(result);
            }
            Scene::Chapter(_) => {
                let can_advance = self.game.chapter().is_some_and(|chapter| {
                    matches!(
                        chapter.phase(),
                        ChapterPhase::ReadyToAdvance | ChapterPhase::HandingOff
                    )
                });
                if can_advance {
                    self.advance();
                } else {
                    self.discover_selected();
                }
            }
            Scene::Ending => {
                if self.game.ending().is_some_and(|ending| ending.is_finished()) {
                    self.restart();
                }
            }
        }
    }

    pub fn discover_selected(&mut self) {
        let Some(clue) = self.game.chapter().and_then(|chapter| {
            chapter
                .definition()
                .clue_ids()
                .nth(self.cursor)
                .cloned()
        }) else {
            return;
        };
        let now = self.now();
        match self.game.discover(&clue, now) {
            Ok(Discovery::New) => self.notice = None,
            Ok(Discovery::AlreadyFound) => self.notice = Some(format!("\"{clue}\" is already found")),
            Err(e) => self.notice = Some(e.to_string()),
        }
        self.follow_scene();
    }

    pub fn advance(&mut self) {
        let now = self.now();
        let result = self.game.advance(now);
        self.report(result);
    }

    pub fn restart(&mut self) {
        let now = self.now();
        self.game.restart(now);
        self.notice = None;
        self.follow_scene();
    }

    fn report(&mut self, result: EngineResult<()>) {
        self.notice = result.err().map(|e| e.to_string());
        self.follow_scene();
    }
}

use serde::Serialize;

use crate::chapter::{ChapterEngine, ChapterPhase};
use crate::clock::Timestamp;
use crate::controller::GameController;
use crate::ending::{EndingPhase, EndingSequencer};
use crate::intro::{IntroElement, IntroSequence};
use crate::scene::Scene;

/// Everything a renderer needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Latest timestamp seen by the controller.
    pub at: Timestamp,
    /// 1-based playthrough counter.
    pub playthrough: u32,
    /// The active scene.
    pub scene: Scene,
    /// Progress bar data.
    pub progress: ProgressView,
    /// Present while the intro is mounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<IntroView>,
    /// Present while a chapter is mounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<ChapterView>,
    /// Present while the ending is mounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<EndingView>,
}

/// One segment of the progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandmarkView {
    /// 1-based chapter number.
    pub chapter: usize,
    /// Short label.
    pub landmark: String,
    /// Whether the chapter is complete.
    pub complete: bool,
}

/// Cumulative progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    /// One entry per chapter.
    pub landmarks: Vec<LandmarkView>,
    /// Number of completed chapters.
    pub completed: usize,
    /// Completed fraction in `0.0..=1.0`.
    pub fraction: f64,
    /// Messages gathered for the ending.
    pub collected_payload: Vec<String>,
}

/// The title card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntroView {
    /// Story title, once revealed.
    pub title: Option<String>,
    /// Subtitle, once revealed.
    pub subtitle: Option<String>,
    /// Start prompt, once revealed.
    pub prompt: Option<String>,
}

/// A clue as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueView {
    /// Clue id.
    pub id: String,
    /// Hover label.
    pub title: String,
    /// Placement data.
    pub region: String,
    /// Whether it has been found.
    pub discovered: bool,
}

/// The mounted chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterView {
    /// 1-based chapter number.
    pub number: usize,
    /// Chapter title.
    pub title: String,
    /// Reveal phase.
    pub phase: ChapterPhase,
    /// Every clue in definition order.
    pub clues: Vec<ClueView>,
    /// Number found.
    pub found: usize,
    /// The dialog showing, if any.
    pub dialog: Option<String>,
    /// Whether the scene is restored.
    pub scene_restored: bool,
    /// Caption shown once restored.
    pub caption: Option<String>,
    /// Whether the advance affordance is enabled.
    pub advance_ready: bool,
}

/// The mounted ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndingView {
    /// Current phase.
    pub phase: EndingPhase,
    /// Phase heading.
    pub title: String,
    /// Phase body.
    pub body: String,
    /// Payload entries to show. Empty before the finale.
    pub payload: Vec<String>,
    /// Whether the terminal phase was reached.
    pub finished: bool,
}

impl Snapshot {
    /// Capture the controller's current state.
    pub fn capture(game: &GameController) -> Self {
        let story = game.story();
        let progress = game.progress();
        let landmarks = story
            .chapters_with_ids()
            .map(|(id, chapter)| LandmarkView {
                chapter: id.number(),
                landmark: chapter.landmark.clone(),
                complete: progress.is_complete(id),
            })
            .collect();

        Self {
            at: game.now(),
            playthrough: game.playthrough(),
            scene: game.scene(),
            progress: ProgressView {
                landmarks,
                completed: progress.completed_count(),
                fraction: progress.fraction_complete(),
                collected_payload: progress.collected_payload().to_vec(),
            },
            intro: game.intro().map(|intro| intro_view(game, intro)),
            chapter: game.chapter().map(chapter_view),
            ending: game.ending().map(ending_view),
        }
    }
}

fn intro_view(game: &GameController, intro: &IntroSequence) -> IntroView {
    let story = game.story();
    let shown = |element, text: &str| intro.is_revealed(element).then(|| text.to_string());
    IntroView {
        title: shown(IntroElement::Title, &story.title),
        subtitle: shown(IntroElement::Subtitle, &story.subtitle),
        prompt: shown(IntroElement::Prompt, &story.intro.prompt),
    }
}

fn chapter_view(engine: &ChapterEngine) -> ChapterView {
    let definition = engine.definition();
    let state = engine.state();
    ChapterView {
        number: engine.id().number(),
        title: definition.title.clone(),
        phase: engine.phase(),
        clues: definition
            .clues
            .iter()
            .map(|clue| ClueView {
                id: clue.id.to_string(),
                title: clue.title.clone(),
                region: clue.region.0.clone(),
                discovered: state.is_discovered(&clue.id),
            })
            .collect(),
        found: state.discovered().len(),
        dialog: state.active_dialog().map(str::to_string),
        scene_restored: state.scene_restored(),
        caption: state
            .scene_restored()
            .then(|| definition.restored_caption.clone()),
        advance_ready: state.advance_ready(),
    }
}

fn ending_view(ending: &EndingSequencer) -> EndingView {
    let text = ending.text();
    EndingView {
        phase: ending.phase(),
        title: text.title.clone(),
        body: text.body.clone(),
        payload: ending
            .payload_preview()
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        finished: ending.is_finished(),
    }
}

#[cfg(test)]
mod tests {
    use gm_story::{ChapterDefinition, ClueDefinition, ClueId, Story};

    use super::*;
    use crate::config::EngineConfig;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn game() -> GameController {
        let story = Story::new("Title")
            .with_chapter(
                ChapterDefinition::new("Tower")
                    .with_landmark("Tower")
                    .with_restored_caption("Color returns.")
                    .with_clue(ClueDefinition::new("a", "A").with_title("Bench"))
                    .with_clue(ClueDefinition::new("b", "B")),
            );
        GameController::new(story, EngineConfig::default()).unwrap()
    }

    #[test]
    fn intro_view_reveals_over_time() {
        let mut game = game();
        let view = game.snapshot().intro.unwrap();
        assert_eq!(view.title, None);
        game.tick(at(600));
        let view = game.snapshot().intro.unwrap();
        assert_eq!(view.title.as_deref(), Some("Title"));
        assert_eq!(view.prompt, None);
    }

    #[test]
    fn chapter_view_tracks_discovery() {
        let mut game = game();
        game.start(Timestamp::ZERO).unwrap();
        game.discover(&ClueId::new("a"), at(10)).unwrap();
        let snapshot = game.snapshot();
        assert!(snapshot.intro.is_none());
        let view = snapshot.chapter.unwrap();
        assert_eq!(view.found, 1);
        assert_eq!(view.dialog.as_deref(), Some("A"));
        assert!(view.clues[0].discovered);
        assert!(!view.clues[1].discovered);
        assert_eq!(view.caption, None);
    }

    #[test]
    fn restored_caption_appears() {
        let mut game = game();
        game.start(Timestamp::ZERO).unwrap();
        game.discover(&ClueId::new("a"), Timestamp::ZERO).unwrap();
        game.discover(&ClueId::new("b"), Timestamp::ZERO).unwrap();
        game.tick(at(4500));
        let view = game.snapshot().chapter.unwrap();
        assert!(view.scene_restored);
        assert_eq!(view.caption.as_deref(), Some("Color returns."));
        assert!(!view.advance_ready);
    }

    #[test]
    fn snapshot_json_omits_unmounted_views() {
        let game = game();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["scene"]["kind"], "intro");
        assert!(json.get("chapter").is_none());
        assert!(json.get("ending").is_none());
        assert_eq!(json["progress"]["landmarks"][0]["landmark"], "Tower");
    }
}

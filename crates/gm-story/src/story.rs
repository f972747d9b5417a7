use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chapter::{ChapterDefinition, ChapterId};
use crate::ending::EndingDefinition;
use crate::error::{StoryError, StoryResult};
use crate::timing::IntroTiming;

/// The title card shown before the first chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroDefinition {
    /// Reveal delays of the title card.
    #[serde(default)]
    pub timing: IntroTiming,
    /// Label of the start affordance.
    #[serde(default)]
    pub prompt: String,
}

/// A complete story: intro, a linear run of chapters, and an ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story title.
    pub title: String,
    /// Subtitle shown under the title.
    #[serde(default)]
    pub subtitle: String,
    /// Title card.
    #[serde(default)]
    pub intro: IntroDefinition,
    /// Chapters in play order.
    pub chapters: Vec<ChapterDefinition>,
    /// The autoplay ending.
    #[serde(default)]
    pub ending: EndingDefinition,
}

impl Story {
    /// Create an empty story with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            intro: IntroDefinition::default(),
            chapters: Vec::new(),
            ending: EndingDefinition::default(),
        }
    }

    /// Append a chapter.
    pub fn with_chapter(mut self, chapter: ChapterDefinition) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Replace the ending.
    pub fn with_ending(mut self, ending: EndingDefinition) -> Self {
        self.ending = ending;
        self
    }

    /// Parse and validate a story from JSON.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        let story: Story = serde_json::from_str(json)?;
        story.validate()?;
        Ok(story)
    }

    /// Read, parse, and validate a story file.
    pub fn load(path: &Path) -> StoryResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize the story as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural rules every playable story must satisfy.
    pub fn validate(&self) -> StoryResult<()> {
        if self.chapters.is_empty() {
            return Err(StoryError::NoChapters);
        }

        let mut payload_chapter: Option<ChapterId> = None;
        for (id, chapter) in self.chapters_with_ids() {
            if chapter.clues.is_empty() {
                return Err(StoryError::EmptyChapter(id));
            }

            let mut seen = HashSet::new();
            for clue in &chapter.clues {
                if clue.id.as_str().trim().is_empty() {
                    return Err(StoryError::EmptyClueId(id));
                }
                if !seen.insert(&clue.id) {
                    return Err(StoryError::DuplicateClue {
                        chapter: id,
                        clue: clue.id.clone(),
                    });
                }
            }

            if chapter.collects_payload {
                if let Some(first) = payload_chapter {
                    return Err(StoryError::MultiplePayloadChapters(first, id));
                }
                payload_chapter = Some(id);
            }
        }

        Ok(())
    }

    /// Number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Look up a chapter by id.
    pub fn chapter(&self, id: ChapterId) -> Option<&ChapterDefinition> {
        self.chapters.get(id.index())
    }

    /// Iterate chapters paired with their ids.
    pub fn chapters_with_ids(&self) -> impl Iterator<Item = (ChapterId, &ChapterDefinition)> {
        self.chapters
            .iter()
            .enumerate()
            .filter_map(|(i, c)| ChapterId::new(i + 1).map(|id| (id, c)))
    }

    /// The chapter after `id`, or `None` if `id` is the last one.
    pub fn next_chapter(&self, id: ChapterId) -> Option<ChapterId> {
        let next = id.next();
        self.chapter(next).map(|_| next)
    }

    /// The chapter whose contacts feed the ending, if any.
    pub fn payload_chapter(&self) -> Option<ChapterId> {
        self.chapters_with_ids()
            .find(|(_, c)| c.collects_payload)
            .map(|(id, _)| id)
    }

    /// Total number of clues across all chapters.
    pub fn clue_count(&self) -> usize {
        self.chapters.iter().map(ChapterDefinition::clue_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clue::{ClueDefinition, ClueId};

    fn two_chapter_story() -> Story {
        Story::new("Test")
            .with_chapter(
                ChapterDefinition::new("One")
                    .with_clue(ClueDefinition::new("a", "A"))
                    .with_clue(ClueDefinition::new("b", "B")),
            )
            .with_chapter(
                ChapterDefinition::new("Two")
                    .with_clue(ClueDefinition::new("c", "C"))
                    .collecting_payload(),
            )
    }

    #[test]
    fn valid_story_passes() {
        let story = two_chapter_story();
        story.validate().unwrap();
        assert_eq!(story.chapter_count(), 2);
        assert_eq!(story.clue_count(), 3);
        assert_eq!(story.payload_chapter(), ChapterId::new(2));
    }

    #[test]
    fn next_chapter_stops_at_end() {
        let story = two_chapter_story();
        assert_eq!(story.next_chapter(ChapterId::FIRST), ChapterId::new(2));
        assert_eq!(story.next_chapter(ChapterId::new(2).unwrap()), None);
    }

    #[test]
    fn rejects_no_chapters() {
        let err = Story::new("Empty").validate().unwrap_err();
        assert!(matches!(err, StoryError::NoChapters));
    }

    #[test]
    fn rejects_empty_chapter() {
        let story = Story::new("S").with_chapter(ChapterDefinition::new("Bare"));
        let err = story.validate().unwrap_err();
        assert!(matches!(err, StoryError::EmptyChapter(id) if id.number() == 1));
    }

    #[test]
    fn rejects_duplicate_clue() {
        let story = Story::new("S").with_chapter(
            ChapterDefinition::new("Dup")
                .with_clue(ClueDefinition::new("a", "1"))
                .with_clue(ClueDefinition::new("a", "2")),
        );
        match story.validate().unwrap_err() {
            StoryError::DuplicateClue { clue, .. } => assert_eq!(clue, ClueId::new("a")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_blank_clue_id() {
        let story = Story::new("S")
            .with_chapter(ChapterDefinition::new("Blank").with_clue(ClueDefinition::new(" ", "x")));
        assert!(matches!(
            story.validate().unwrap_err(),
            StoryError::EmptyClueId(_)
        ));
    }

    #[test]
    fn rejects_two_payload_chapters() {
        let story = two_chapter_story().with_chapter(
            ChapterDefinition::new("Three")
                .with_clue(ClueDefinition::new("d", "D"))
                .collecting_payload(),
        );
        let err = story.validate().unwrap_err();
        assert!(err.to_string().contains("only one chapter"));
    }

    #[test]
    fn json_round_trip_keeps_structure() {
        let story = two_chapter_story();
        let json = story.to_json_pretty().unwrap();
        let parsed = Story::from_json(&json).unwrap();
        assert_eq!(parsed, story);
    }

    #[test]
    fn from_json_validates() {
        let err = Story::from_json(r#"{"title":"x","chapters":[]}"#).unwrap_err();
        assert!(matches!(err, StoryError::NoChapters));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Story::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("story.json");
        std::fs::write(&path, two_chapter_story().to_json_pretty().unwrap()).unwrap();
        let story = Story::load(&path).unwrap();
        assert_eq!(story.title, "Test");
    }
}

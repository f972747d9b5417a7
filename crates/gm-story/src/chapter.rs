use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clue::{ClueDefinition, ClueId};
use crate::timing::RevealTiming;

/// 1-based position of a chapter in the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(usize);

impl ChapterId {
    /// The first chapter.
    pub const FIRST: Self = Self(1);

    /// Create a chapter id from its 1-based number. Returns `None` for 0.
    pub fn new(number: usize) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    /// The 1-based chapter number.
    pub fn number(self) -> usize {
        self.0
    }

    /// The 0-based index into the story's chapter list.
    pub fn index(self) -> usize {
        self.0 - 1
    }

    /// The chapter after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chapter {}", self.0)
    }
}

/// One self-contained discovery episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDefinition {
    /// Chapter title.
    pub title: String,
    /// Short place name for progress displays.
    #[serde(default)]
    pub landmark: String,
    /// Text shown once the scene is restored.
    #[serde(default)]
    pub restored_caption: String,
    /// The clue registry, in display order.
    pub clues: Vec<ClueDefinition>,
    /// Reveal and restoration delays.
    #[serde(default)]
    pub timing: RevealTiming,
    /// Whether completing this chapter hands its clue contacts to the ending.
    #[serde(default)]
    pub collects_payload: bool,
}

impl ChapterDefinition {
    /// Create a chapter with a title and no clues.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            landmark: String::new(),
            restored_caption: String::new(),
            clues: Vec::new(),
            timing: RevealTiming::default(),
            collects_payload: false,
        }
    }

    /// Set the landmark label.
    pub fn with_landmark(mut self, landmark: impl Into<String>) -> Self {
        self.landmark = landmark.into();
        self
    }

    /// Set the restored-scene caption.
    pub fn with_restored_caption(mut self, caption: impl Into<String>) -> Self {
        self.restored_caption = caption.into();
        self
    }

    /// Append a clue.
    pub fn with_clue(mut self, clue: ClueDefinition) -> Self {
        self.clues.push(clue);
        self
    }

    /// Replace the reveal timing.
    pub fn with_timing(mut self, timing: RevealTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Mark this chapter as the one whose contacts feed the ending.
    pub fn collecting_payload(mut self) -> Self {
        self.collects_payload = true;
        self
    }

    /// Look up a clue by id.
    pub fn clue(&self, id: &ClueId) -> Option<&ClueDefinition> {
        self.clues.iter().find(|c| &c.id == id)
    }

    /// Iterate clue ids in definition order.
    pub fn clue_ids(&self) -> impl Iterator<Item = &ClueId> {
        self.clues.iter().map(|c| &c.id)
    }

    /// Number of clues in the registry.
    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// The ordered payload this chapter emits on completion.
    ///
    /// Always covers every clue in definition order, independent of the order
    /// the player found them in. Empty unless the chapter collects a payload.
    pub fn payload(&self) -> Vec<String> {
        if !self.collects_payload {
            return Vec::new();
        }
        self.clues
            .iter()
            .map(|c| c.payload_message().to_string())
            .collect()
    }

    /// Suggest the closest clue id for a mistyped one.
    pub fn suggest(&self, input: &str) -> Option<&ClueId> {
        self.clues
            .iter()
            .map(|c| (strsim::jaro_winkler(input, c.id.as_str()), &c.id))
            .filter(|(score, _)| *score >= 0.8)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

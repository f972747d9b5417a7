use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a clue, unique within its chapter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClueId(String);

impl ClueId {
    /// Create a clue id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where a clue's trigger sits in the scene.
///
/// Opaque to the engine; only renderers interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(pub String);

/// A discoverable item in a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueDefinition {
    /// Unique id within the chapter.
    pub id: ClueId,
    /// Short label shown before the clue is found.
    #[serde(default)]
    pub title: String,
    /// Placement hint for renderers.
    #[serde(default)]
    pub region: Region,
    /// Message shown when the clue is discovered.
    pub reveal_message: String,
    /// Message this clue contributes to the ending payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl ClueDefinition {
    /// Create a clue with an id and a reveal message.
    pub fn new(id: impl Into<String>, reveal_message: impl Into<String>) -> Self {
        Self {
            id: ClueId::new(id),
            title: String::new(),
            region: Region::default(),
            reveal_message: reveal_message.into(),
            contact: None,
        }
    }

    /// Set the hover title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the placement region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Region(region.into());
        self
    }

    /// Set the payload contact message.
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// The message collected into the payload; falls back to the reveal message.
    pub fn payload_message(&self) -> &str {
        self.contact.as_deref().unwrap_or(&self.reveal_message)
    }
}

use std::fmt;

use gm_story::ChapterId;
use serde::Serialize;

/// Which top-level scene is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "chapter", rename_all = "snake_case")]
pub enum Scene {
    /// The title card.
    Intro,
    /// A chapter, by number.
    Chapter(ChapterId),
    /// The autoplay ending.
    Ending,
}

impl Scene {
    /// The chapter id if a chapter is mounted.
    pub fn chapter(self) -> Option<ChapterId> {
        match self {
            Self::Chapter(id) => Some(id),
            Self::Intro | Self::Ending => None,
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Chapter(id) => write!(f, "{id}"),
            Self::Ending => write!(f, "ending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_display() {
        assert_eq!(Scene::Intro.to_string(), "intro");
        assert_eq!(Scene::Chapter(ChapterId::FIRST).to_string(), "chapter 1");
        assert_eq!(Scene::Ending.to_string(), "ending");
    }

    #[test]
    fn scene_json_shape() {
        let json = serde_json::to_string(&Scene::Chapter(ChapterId::FIRST)).unwrap();
        assert_eq!(json, r#"{"kind":"chapter","chapter":1}"#);
        let json = serde_json::to_string(&Scene::Ending).unwrap();
        assert_eq!(json, r#"{"kind":"ending"}"#);
    }
}

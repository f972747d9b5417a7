//! Error types for the progression engine.
//!
//! The engine does no I/O, so the only runtime failure is a
//! [`ContractViolation`]: an operation called while its precondition is
//! false. Violations leave all state untouched and indicate a bug in the
//! caller.

use gm_story::{ChapterId, ClueId, StoryError};
use thiserror::Error;

use crate::chapter::ChapterPhase;
use crate::scene::Scene;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors returned by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The story failed validation.
    #[error(transparent)]
    Story(#[from] StoryError),

    /// An operation was called while its precondition was false.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

/// A precondition that the caller failed to honour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `start` outside the intro.
    #[error("start requires the intro, but {scene} is active")]
    NotInIntro {
        /// The scene that was active.
        scene: Scene,
    },

    /// A chapter operation with no chapter mounted.
    #[error("no chapter is active ({scene} is)")]
    NoActiveChapter {
        /// The scene that was active.
        scene: Scene,
    },

    /// A completion for a chapter other than the active one.
    #[error("completion reported for {requested}, but {scene} is active")]
    ChapterNotActive {
        /// The chapter named by the caller.
        requested: ChapterId,
        /// The scene that was active.
        scene: Scene,
    },

    /// `advance` before the advance affordance was enabled.
    #[error("{chapter} cannot advance yet (phase: {phase})")]
    AdvanceNotReady {
        /// The active chapter.
        chapter: ChapterId,
        /// Its phase at the time of the call.
        phase: ChapterPhase,
    },

    /// A clue id that is not in the active chapter's registry.
    #[error("{chapter} has no clue \"{clue}\"{}", did_you_mean(.suggestion))]
    UnknownClue {
        /// The active chapter.
        chapter: ChapterId,
        /// The id the caller passed.
        clue: ClueId,
        /// The closest known id, if any is close.
        suggestion: Option<ClueId>,
    },
}

fn did_you_mean(suggestion: &Option<ClueId>) -> String {
    match suggestion {
        Some(id) => format!(" (did you mean \"{id}\"?)"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_clue_message_with_suggestion() {
        let err = ContractViolation::UnknownClue {
            chapter: ChapterId::FIRST,
            clue: ClueId::new("bnch"),
            suggestion: Some(ClueId::new("bench")),
        };
        insta::assert_snapshot!(err.to_string(), @r#"chapter 1 has no clue "bnch" (did you mean "bench"?)"#);
    }

    #[test]
    fn unknown_clue_message_without_suggestion() {
        let err = ContractViolation::UnknownClue {
            chapter: ChapterId::FIRST,
            clue: ClueId::new("zzz"),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "chapter 1 has no clue \"zzz\"");
    }

    #[test]
    fn engine_error_wraps_violation() {
        let err: EngineError = ContractViolation::NotInIntro {
            scene: Scene::Ending,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "contract violation: start requires the intro, but ending is active"
        );
    }
}

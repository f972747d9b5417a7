use std::path::PathBuf;

use crate::chapter::ChapterId;
use crate::clue::ClueId;

/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur when loading or validating a story.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// The story file could not be read.
    #[error("cannot read story file {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The story file is not valid JSON for a story.
    #[error("invalid story JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The story declares no chapters.
    #[error("story has no chapters")]
    NoChapters,

    /// A chapter declares no clues, so it could never be completed.
    #[error("{0} has no clues")]
    EmptyChapter(ChapterId),

    /// A clue id is empty.
    #[error("{0} has a clue with an empty id")]
    EmptyClueId(ChapterId),

    /// Two clues in one chapter share an id.
    #[error("{chapter} declares clue \"{clue}\" more than once")]
    DuplicateClue {
        /// The chapter containing the duplicate.
        chapter: ChapterId,
        /// The repeated clue id.
        clue: ClueId,
    },

    /// More than one chapter is marked as the payload-collecting chapter.
    #[error("only one chapter may collect the ending payload, found {0} and {1}")]
    MultiplePayloadChapters(ChapterId, ChapterId),
}

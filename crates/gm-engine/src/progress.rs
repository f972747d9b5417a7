use gm_story::ChapterId;
use serde::Serialize;

/// What a chapter hands back to the controller when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// The chapter that completed.
    pub chapter: ChapterId,
    /// Messages gathered, for the chapter that collects the payload.
    pub payload: Option<Vec<String>>,
}

impl ProgressUpdate {
    /// A completion with no payload.
    pub fn completed(chapter: ChapterId) -> Self {
        Self {
            chapter,
            payload: None,
        }
    }

    /// A completion carrying a payload.
    pub fn with_payload(chapter: ChapterId, payload: Vec<String>) -> Self {
        Self {
            chapter,
            payload: Some(payload),
        }
    }
}

/// Cumulative progress through one playthrough.
///
/// Owned by the [`GameController`](crate::GameController); chapters and the
/// ending only ever see it through [`ProgressUpdate`]s or a read-only copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameProgress {
    completed: Vec<bool>,
    collected_payload: Vec<String>,
}

impl GameProgress {
    /// Fresh progress for a story with `chapter_count` chapters.
    pub fn new(chapter_count: usize) -> Self {
        Self {
            completed: vec![false; chapter_count],
            collected_payload: Vec::new(),
        }
    }

    /// Whether `chapter` has completed.
    pub fn is_complete(&self, chapter: ChapterId) -> bool {
        self.completed.get(chapter.index()).copied().unwrap_or(false)
    }

    /// Completion flags, one per chapter.
    pub fn completed(&self) -> &[bool] {
        &self.completed
    }

    /// Messages gathered for the ending.
    pub fn collected_payload(&self) -> &[String] {
        &self.collected_payload
    }

    /// Number of completed chapters.
    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|c| **c).count()
    }

    /// Number of chapters tracked.
    pub fn chapter_count(&self) -> usize {
        self.completed.len()
    }

    /// Completed chapters as a fraction in `0.0..=1.0`.
    pub fn fraction_complete(&self) -> f64 {
        if self.completed.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.completed.len() as f64
    }

    /// Apply a completion: mark the chapter and replace the payload if one
    /// was supplied. The controller only forwards updates for chapters of
    /// its own story.
    pub(crate) fn merge(&mut self, update: ProgressUpdate) {
        debug_assert!(
            update.chapter.index() < self.completed.len(),
            "progress update for {} in a {}-chapter story",
            update.chapter,
            self.completed.len()
        );
        if let Some(flag) = self.completed.get_mut(update.chapter.index()) {
            *flag = true;
        }
        if let Some(payload) = update.payload {
            self.collected_payload = payload;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.completed.iter_mut().for_each(|c| *c = false);
        self.collected_payload.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: usize) -> ChapterId {
        ChapterId::new(n).unwrap()
    }

    #[test]
    fn new_progress_is_empty() {
        let progress = GameProgress::new(4);
        assert_eq!(progress.chapter_count(), 4);
        assert_eq!(progress.completed_count(), 0);
        assert!(progress.collected_payload().is_empty());
        assert!(progress.fraction_complete().abs() < f64::EPSILON);
    }

    #[test]
    fn merge_marks_chapter() {
        let mut progress = GameProgress::new(4);
        progress.merge(ProgressUpdate::completed(ch(2)));
        assert!(progress.is_complete(ch(2)));
        assert!(!progress.is_complete(ch(1)));
        assert!((progress.fraction_complete() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_replaces_payload_only_when_supplied() {
        let mut progress = GameProgress::new(2);
        progress.merge(ProgressUpdate::with_payload(
            ch(1),
            vec!["a".into(), "b".into()],
        ));
        progress.merge(ProgressUpdate::completed(ch(2)));
        assert_eq!(progress.collected_payload(), ["a", "b"]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut progress = GameProgress::new(2);
        progress.merge(ProgressUpdate::with_payload(ch(1), vec!["x".into()]));
        progress.reset();
        assert_eq!(progress, GameProgress::new(2));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "progress update for chapter 5 in a 1-chapter story")]
    fn out_of_range_chapter_fails_fast() {
        let mut progress = GameProgress::new(1);
        progress.merge(ProgressUpdate::completed(ch(5)));
    }

    #[test]
    fn out_of_range_chapter_is_never_complete() {
        let progress = GameProgress::new(1);
        assert!(!progress.is_complete(ch(5)));
    }
}

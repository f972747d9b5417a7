//! "The Grey Map": four places revisited, then the sea.

use crate::chapter::ChapterDefinition;
use crate::clue::ClueDefinition;
use crate::ending::{EndingDefinition, EndingPhaseText};
use crate::story::{IntroDefinition, Story};
use crate::timing::{IntroTiming, RevealTiming};

impl Story {
    /// The story that ships with the game.
    pub fn builtin() -> Self {
        Self {
            title: "The Grey Map".to_string(),
            subtitle: "Every place we went is fading. Find what was left behind.".to_string(),
            intro: IntroDefinition {
                timing: IntroTiming::default(),
                prompt: "Begin the journey".to_string(),
            },
            chapters: vec![canton_tower(), bio_island(), library(), office()],
            ending: ending(),
        }
    }
}

fn canton_tower() -> ChapterDefinition {
    ChapterDefinition::new("Chapter One: Waiting at Canton Tower")
        .with_landmark("Canton Tower")
        .with_restored_caption("A photo of the two of you flashes into view.")
        .with_timing(RevealTiming::from_millis(4000, 500, 2000))
        .with_clue(
            ClueDefinition::new(
                "bench",
                "The wind was fierce that day. I got there half an hour early and you were \
                 late. I didn't complain, I just watched my phone and thought: she must be \
                 almost here.",
            )
            .with_title("Waiting on the bench")
            .with_region("bottom-left"),
        )
        .with_clue(
            ClueDefinition::new(
                "shadow",
                "You only remember him hurrying you along, and forgot how anxious he was, \
                 waiting alone in the wind. That was how he cared.",
            )
            .with_title("A figure in the wind")
            .with_region("upper-right"),
        )
}

fn bio_island() -> ChapterDefinition {
    ChapterDefinition::new("Chapter Two: Bio Island")
        .with_landmark("Bio Island")
        .with_restored_caption("The dark road lights up behind you.")
        .with_timing(RevealTiming::from_millis(5000, 500, 2000))
        .with_clue(
            ClueDefinition::new(
                "bike",
                "We walked and cycled here. You laughed so easily, and he felt happy too.",
            )
            .with_title("Happy days on the island")
            .with_region("bottom-left"),
        )
        .with_clue(
            ClueDefinition::new(
                "darkness",
                "You only saw the fun we had, and forgot that staying with you this late \
                 meant he walked this pitch-dark road alone every time. At the end of the \
                 happiness, he faced his fear by himself.",
            )
            .with_title("Courage in the dark")
            .with_region("upper-right"),
        )
}

fn library() -> ChapterDefinition {
    ChapterDefinition::new("Chapter Three: The Library")
        .with_landmark("Library")
        .with_restored_caption("The library and the net cafe share the same warm light.")
        .with_timing(RevealTiming::from_millis(5000, 500, 2000))
        .with_clue(
            ClueDefinition::new(
                "library",
                "You only remember him playing games, and forgot that he quietly found \
                 those study materials so the two of you could improve together.",
            )
            .with_title("The library's secret")
            .with_region("bottom-left"),
        )
        .with_clue(
            ClueDefinition::new(
                "netcafe",
                "His joke made you angry. All he wanted you to know was that he'd rather \
                 the two of you played together, and were happy together.",
            )
            .with_title("What the net cafe meant")
            .with_region("bottom-right"),
        )
}

fn office() -> ChapterDefinition {
    ChapterDefinition::new("Chapter Four: The Colleagues' Testimony")
        .with_landmark("The Office")
        .with_restored_caption("A phone lights up with new messages.")
        .with_timing(RevealTiming::from_millis(4000, 500, 1000).with_handoff(2000))
        .collecting_payload()
        .with_clue(
            ClueDefinition::new(
                "colleague-wang",
                "Your girlfriend thinks you're a pushover? Don't listen. We all know how \
                 hard you work for her.",
            )
            .with_title("Xiao Wang")
            .with_region("upper-left")
            .with_contact(
                "He is one of the most responsible people I know, and even more so with \
                 you. We all hope the two of you are well.",
            ),
        )
        .with_clue(
            ClueDefinition::new(
                "colleague-li",
                "We all know what happened between you two. We'd all help, if it means \
                 you get back together.",
            )
            .with_title("Xiao Li")
            .with_region("upper-right")
            .with_contact("I'm happy to be your go-between. Reach out any time."),
        )
        .with_clue(
            ClueDefinition::new(
                "colleague-zhang",
                "Don't overthink it. He treats us well. He's clumsy with words, but his \
                 heart is in the right place. Give him another chance.",
            )
            .with_title("Xiao Zhang")
            .with_region("lower-left")
            .with_contact(
                "Don't overthink it. He treats us well. He's clumsy with words, but his \
                 heart is in the right place. Give him another chance.",
            ),
        )
}

fn ending() -> EndingDefinition {
    EndingDefinition {
        opening: EndingPhaseText::new(
            "The Healed Map",
            "The grey lifts from the map. Every place is bright again, and the broken \
             line between them begins to glow and mend.",
        ),
        interlude: EndingPhaseText::new(
            "The Sea",
            "There is one more place you always meant to go. He wants to see the sea \
             with you, and tell you there how much you mean to him.",
        ),
        finale: EndingPhaseText::new(
            "A Letter",
            "I was never a bad person. I hope you remember the distance I travelled for \
             you, and everything good we lived through together. I am still here, \
             waiting for you, and for the promise to see the sea.",
        ),
        ..EndingDefinition::default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::chapter::ChapterId;

    #[test]
    fn builtin_story_is_valid() {
        let story = Story::builtin();
        story.validate().unwrap();
        assert_eq!(story.chapter_count(), 4);
        assert_eq!(story.clue_count(), 9);
    }

    #[test]
    fn builtin_payload_comes_from_the_office() {
        let story = Story::builtin();
        let id = story.payload_chapter().unwrap();
        assert_eq!(id, ChapterId::new(4).unwrap());

        let payload = story.chapter(id).unwrap().payload();
        assert_eq!(payload.len(), 3);
        assert!(payload[1].contains("go-between"));
    }

    #[test]
    fn builtin_office_has_handoff() {
        let story = Story::builtin();
        let office = story.chapter(ChapterId::new(4).unwrap()).unwrap();
        assert_eq!(office.timing.handoff, Some(Duration::from_millis(2000)));
        assert_eq!(office.timing.advance, Duration::from_millis(1000));
    }

    #[test]
    fn builtin_round_trips_through_json() {
        let story = Story::builtin();
        let json = story.to_json_pretty().unwrap();
        assert_eq!(Story::from_json(&json).unwrap(), story);
    }
}

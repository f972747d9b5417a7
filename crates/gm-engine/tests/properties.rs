//! Property-based tests for the gm-engine crate.

use gm_engine::{ChapterEngine, EngineConfig, EventLog, GameController, Scene, Timestamp};
use gm_story::{ChapterId, ClueId, Story};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Discover(usize),
    Wait(u64),
    Advance,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0_usize..8).prop_map(Op::Discover),
        3 => (0_u64..7_000).prop_map(Op::Wait),
        1 => Just(Op::Advance),
    ]
}

fn chapter(number: usize) -> ChapterId {
    ChapterId::new(number).expect("chapter numbers start at 1")
}

fn started() -> GameController {
    let mut game = GameController::new(Story::builtin(), EngineConfig::default()).expect("valid");
    game.start(Timestamp::ZERO).expect("in intro");
    game
}

/// Apply `op` to the controller. Contract violations are expected for
/// premature advances and are ignored.
fn apply(game: &mut GameController, op: &Op, now: &mut u64) {
    match op {
        Op::Discover(i) => {
            let Some(engine) = game.chapter() else { return };
            let ids: Vec<ClueId> = engine.definition().clue_ids().cloned().collect();
            let clue = ids[i % ids.len()].clone();
            game.discover(&clue, Timestamp::from_millis(*now))
                .expect("clue belongs to the active chapter");
        }
        Op::Wait(ms) => {
            *now += ms;
            game.tick(Timestamp::from_millis(*now));
        }
        Op::Advance => {
            let _ = game.advance(Timestamp::from_millis(*now));
        }
    }
}

proptest! {
    #[test]
    fn repeat_discovery_is_a_no_op(picks in prop::collection::vec((0_usize..2, 0_u64..6_000), 1..30)) {
        let story = Story::builtin();
        let definition = story.chapter(ChapterId::FIRST).expect("chapter 1").clone();
        let ids: Vec<ClueId> = definition.clue_ids().cloned().collect();
        let mut engine = ChapterEngine::mount(ChapterId::FIRST, definition, Timestamp::ZERO);
        let mut log = EventLog::new(0);
        let mut now = 0;

        for (pick, wait) in picks {
            now += wait;
            while engine.fire_next(Timestamp::from_millis(now), &mut log).is_some() {}

            let clue = &ids[pick];
            let seen = engine.state().is_discovered(clue);
            let state = engine.state().clone();
            let timers = engine.timers().clone();
            let logged = log.len();

            engine.discover(clue, Timestamp::from_millis(now), &mut log).expect("known clue");
            if seen {
                prop_assert_eq!(engine.state(), &state);
                prop_assert_eq!(engine.timers(), &timers);
                prop_assert_eq!(log.len(), logged);
            }
        }
    }

    #[test]
    fn discovery_is_monotonic_and_gated(ops in prop::collection::vec(op(), 1..80)) {
        let mut game = started();
        let mut now = 0;
        let mut last = (game.scene(), 0);

        for op in &ops {
            apply(&mut game, op, &mut now);
            let Some(engine) = game.chapter() else { continue };
            let state = engine.state();
            let found = state.discovered().len();

            if last.0 == game.scene() {
                prop_assert!(found >= last.1);
            }
            last = (game.scene(), found);

            prop_assert!(state
                .discovered()
                .iter()
                .all(|id| engine.definition().clue(id).is_some()));
            if state.scene_restored() {
                prop_assert_eq!(found, engine.definition().clue_count());
            }
            if state.advance_ready() {
                prop_assert!(state.scene_restored());
            }
        }
    }

    #[test]
    fn completions_sequence_linearly(n in 0_usize..=4) {
        let mut game = started();
        for k in 1..=n {
            game.complete_chapter(chapter(k), None, Timestamp::ZERO).expect("active chapter");
        }
        let expected = if n < 4 { Scene::Chapter(chapter(n + 1)) } else { Scene::Ending };
        prop_assert_eq!(game.scene(), expected);
        prop_assert_eq!(game.progress().completed_count(), n);
    }

    #[test]
    fn payload_ignores_discovery_order(order in Just(vec![0_usize, 1, 2]).prop_shuffle()) {
        let mut game = started();
        for k in 1..=3 {
            game.complete_chapter(chapter(k), None, Timestamp::ZERO).expect("active chapter");
        }
        let office = game.chapter().expect("office mounted").definition().clone();
        let ids: Vec<ClueId> = office.clue_ids().cloned().collect();

        let mut now = 0;
        for i in order {
            now += 1_000;
            game.discover(&ids[i], Timestamp::from_millis(now)).expect("office clue");
        }
        now += 60_000;
        game.advance(Timestamp::from_millis(now)).expect("ready");
        game.advance(Timestamp::from_millis(now)).expect("skip hand-off");

        let expected = office.payload();
        prop_assert_eq!(game.scene(), Scene::Ending);
        prop_assert_eq!(game.progress().collected_payload(), expected.as_slice());
    }

    #[test]
    fn same_inputs_same_events(ops in prop::collection::vec(op(), 1..60)) {
        let mut a = started();
        let mut b = started();
        let (mut now_a, mut now_b) = (0, 0);
        for op in &ops {
            apply(&mut a, op, &mut now_a);
            apply(&mut b, op, &mut now_b);
        }
        prop_assert_eq!(a.events().events(), b.events().events());
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}

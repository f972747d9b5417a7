use std::fs;
use std::path::Path;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use gm_engine::{Clock, EngineConfig, GameController, GameEventKind, ManualClock};
use gm_story::{ChapterId, ClueId, Story};
use tracing::debug;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start,
    Discover(ClueId),
    Advance,
    Complete(ChapterId),
    Wait(u64),
    Restart,
}

/// A step with the script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

pub fn run(script: Option<&Path>, story: Option<&Path>, json: bool) -> Result<(), String> {
    let story = super::load_story(story)?;
    let lines = match script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(|e| format!("cannot read script {}: {e}", path.display()))?;
            parse_script(&source)?
        }
        None => auto_script(&story),
    };

    let game = execute(story, &lines)?;

    if json {
        let out = serde_json::to_string_pretty(&game.snapshot())
            .map_err(|e| format!("serialization error: {e}"))?;
        println!("{out}");
    } else {
        print_transcript(&game);
        print_summary(&game);
    }
    Ok(())
}

/// Parse a replay script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, String> {
    let mut lines = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let mut words = text.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("line {line}: too many arguments to '{command}'"));
        }

        let step = match (command, arg) {
            ("start", None) => Step::Start,
            ("advance", None) => Step::Advance,
            ("restart", None) => Step::Restart,
            ("discover", Some(id)) => Step::Discover(ClueId::new(id)),
            ("wait", Some(ms)) => Step::Wait(
                ms.parse()
                    .map_err(|_| format!("line {line}: '{ms}' is not a number of milliseconds"))?,
            ),
            ("complete", Some(k)) => {
                let number = k
                    .parse()
                    .map_err(|_| format!("line {line}: '{k}' is not a chapter number"))?;
                Step::Complete(
                    ChapterId::new(number)
                        .ok_or_else(|| format!("line {line}: chapter numbers start at 1"))?,
                )
            }
            ("discover" | "wait" | "complete", None) => {
                return Err(format!("line {line}: '{command}' needs an argument"));
            }
            ("start" | "advance" | "restart", Some(_)) => {
                return Err(format!("line {line}: '{command}' takes no argument"));
            }
            _ => return Err(format!("line {line}: unknown command '{command}'")),
        };
        lines.push(ScriptLine { line, step });
    }
    Ok(lines)
}

/// A full playthrough: every clue in order, advancing as soon as allowed and
/// sitting through each hand-off and the ending.
pub fn auto_script(story: &Story) -> Vec<ScriptLine> {
    let mut steps = vec![Step::Wait(millis(story.intro.timing.prompt)), Step::Start];
    for chapter in &story.chapters {
        for (i, id) in chapter.clue_ids().enumerate() {
            if i > 0 {
                steps.push(Step::Wait(1000));
            }
            steps.push(Step::Discover(id.clone()));
        }
        steps.push(Step::Wait(millis(chapter.timing.unlock_after())));
        steps.push(Step::Advance);
        if let Some(handoff) = chapter.timing.handoff {
            steps.push(Step::Wait(millis(handoff)));
        }
    }
    steps.push(Step::Wait(millis(story.ending.finale_after())));

    steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| ScriptLine { line: i + 1, step })
        .collect()
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Run `lines` against a fresh controller on a manual clock. Any contract
/// violation aborts the replay.
pub fn execute(story: Story, lines: &[ScriptLine]) -> Result<GameController, String> {
    let payloads: Vec<Option<Vec<String>>> = story
        .chapters
        .iter()
        .map(|c| c.collects_payload.then(|| c.payload()))
        .collect();
    let mut game =
        GameController::new(story, EngineConfig::default()).map_err(|e| e.to_string())?;
    let mut clock = ManualClock::new();

    for ScriptLine { line, step } in lines {
        let now = clock.now();
        debug!(line, ?step, %now, "replay step");
        let result = match step {
            Step::Start => game.start(now),
            Step::Discover(id) => game.discover(id, now).map(|_| ()),
            Step::Advance => game.advance(now),
            Step::Complete(chapter) => {
                let payload = payloads.get(chapter.index()).cloned().flatten();
                game.complete_chapter(*chapter, payload, now)
            }
            Step::Wait(ms) => {
                game.tick(clock.advance(Duration::from_millis(*ms)));
                Ok(())
            }
            Step::Restart => {
                game.restart(now);
                Ok(())
            }
        };
        result.map_err(|e| format!("line {line}: {e}"))?;
    }
    Ok(game)
}

fn print_transcript(game: &GameController) {
    println!("  {}", "Transcript".bold().underline());
    println!();
    for event in game.events().events() {
        let at = event.at.to_string();
        let at = format!("[{at:>9}]").dimmed();
        println!("  {at} {}", colorize(&event.kind));
    }
    println!();
}

fn colorize(kind: &GameEventKind) -> ColoredString {
    let text = kind.to_string();
    match kind {
        GameEventKind::SceneChanged { .. } => text.cyan().bold(),
        GameEventKind::ChapterCompleted { .. } => text.green().bold(),
        GameEventKind::ClueDiscovered { .. } => text.yellow(),
        GameEventKind::DialogShown { .. } => text.italic(),
        GameEventKind::EndingPhaseChanged { .. } => text.magenta().bold(),
        GameEventKind::PlaythroughStarted { .. } | GameEventKind::ProgressReset => text.bold(),
        _ => text.normal(),
    }
}

fn print_summary(game: &GameController) {
    let progress = game.progress();
    let scene = match game.ending() {
        Some(ending) => format!("{} ({})", game.scene(), ending.phase()),
        None => match game.chapter() {
            Some(chapter) => format!("{} ({})", game.scene(), chapter.phase()),
            None => game.scene().to_string(),
        },
    };

    println!("  {}", "Final State".bold().underline());
    println!();
    println!("  Scene:    {scene}");
    println!(
        "  Progress: {}/{} chapters",
        progress.completed_count(),
        progress.chapter_count()
    );
    println!("  Time:     {}", game.now());

    if let Some(preview) = game.ending().and_then(|e| e.payload_preview()) {
        println!();
        println!("  {}", "Messages".bold());
        for message in preview {
            println!("  - {message}");
        }
        let hidden = progress.collected_payload().len() - preview.len();
        if hidden > 0 {
            println!("  {}", format!("({hidden} more not shown)").dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use gm_engine::{EndingPhase, Scene};

    use super::*;

    #[test]
    fn parse_script_commands() {
        let lines = parse_script(
            "# warm-up\nwait 2500\nstart\n\ndiscover bench  # first clue\nadvance\ncomplete 2\nrestart\n",
        )
        .unwrap();
        let steps: Vec<_> = lines.iter().map(|l| l.step.clone()).collect();
        assert_eq!(
            steps,
            vec![
                Step::Wait(2500),
                Step::Start,
                Step::Discover(ClueId::new("bench")),
                Step::Advance,
                Step::Complete(ChapterId::new(2).unwrap()),
                Step::Restart,
            ]
        );
        assert_eq!(lines[2].line, 5);
    }

    #[test]
    fn parse_script_errors_name_the_line() {
        assert_eq!(
            parse_script("start\njump").unwrap_err(),
            "line 2: unknown command 'jump'"
        );
        assert!(parse_script("wait soon").unwrap_err().contains("line 1"));
        assert!(parse_script("complete 0").unwrap_err().contains("start at 1"));
        assert!(parse_script("discover").unwrap_err().contains("needs an argument"));
        assert!(parse_script("start now").unwrap_err().contains("takes no argument"));
    }

    #[test]
    fn auto_script_finishes_builtin_story() {
        let story = Story::builtin();
        let lines = auto_script(&story);
        let game = execute(story, &lines).unwrap();
        assert_eq!(game.scene(), Scene::Ending);
        assert_eq!(game.progress().completed_count(), 4);
        let ending = game.ending().unwrap();
        assert_eq!(ending.phase(), EndingPhase::Finale);
        assert_eq!(ending.payload_preview().unwrap().len(), 3);
    }

    #[test]
    fn execute_reports_violations_with_line() {
        let lines = parse_script("start\ndiscover bnch\n").unwrap();
        let err = execute(Story::builtin(), &lines).unwrap_err();
        assert!(err.starts_with("line 2: contract violation"));
        assert!(err.contains("did you mean \"bench\""));
    }

    #[test]
    fn complete_supplies_payload_for_collecting_chapter() {
        let lines = parse_script("start\ncomplete 1\ncomplete 2\ncomplete 3\ncomplete 4\n").unwrap();
        let game = execute(Story::builtin(), &lines).unwrap();
        assert_eq!(game.scene(), Scene::Ending);
        assert_eq!(game.progress().collected_payload().len(), 3);
    }
}

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::seconds;

pub fn run(path: Option<&Path>) -> Result<(), String> {
    let story = super::load_story(path)?;

    println!("  {}", story.title.bold());
    if !story.subtitle.is_empty() {
        println!("  {}", story.subtitle.dimmed());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#", "Chapter", "Landmark", "Clues", "Dialog", "Restore", "Advance", "Hand-off",
    ]);

    for (id, chapter) in story.chapters_with_ids() {
        let clues = chapter
            .clue_ids()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let title = if chapter.collects_payload {
            format!("{} *", chapter.title)
        } else {
            chapter.title.clone()
        };
        let landmark = if chapter.landmark.is_empty() {
            "-".to_string()
        } else {
            chapter.landmark.clone()
        };
        let timing = &chapter.timing;
        table.add_row(vec![
            id.number().to_string(),
            title,
            landmark,
            clues,
            seconds(timing.dialog),
            seconds(timing.restore),
            seconds(timing.advance),
            timing.handoff.map(seconds).unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} chapters, {} clues",
        story.chapter_count(),
        story.clue_count()
    );
    if story.payload_chapter().is_some() {
        println!("  {}", "* collects the ending payload".dimmed());
    }
    println!(
        "  Ending: {} -> {} -> {}",
        story.ending.opening.title, story.ending.interlude.title, story.ending.finale.title
    );

    Ok(())
}

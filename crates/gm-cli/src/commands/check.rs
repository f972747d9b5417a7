use std::path::Path;

use gm_story::Story;

pub fn run(file: &Path) -> Result<(), String> {
    let story = Story::load(file).map_err(|e| e.to_string())?;

    println!("  All checks passed for '{}'.", story.title);
    println!(
        "  {} chapters, {} clues",
        story.chapter_count(),
        story.clue_count()
    );
    match story.payload_chapter().and_then(|id| story.chapter(id).map(|c| (id, c))) {
        Some((id, chapter)) => println!(
            "  {id} collects {} payload entries for the ending",
            chapter.clue_count()
        ),
        None => println!("  No chapter collects a payload; the finale will be empty."),
    }

    Ok(())
}

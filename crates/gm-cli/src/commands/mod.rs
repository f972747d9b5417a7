pub mod check;
pub mod play;
pub mod replay;
pub mod story;

use std::path::Path;

use gm_story::Story;

/// Load a story file, or the built-in story when no path is given.
pub fn load_story(path: Option<&Path>) -> Result<Story, String> {
    match path {
        Some(path) => Story::load(path).map_err(|e| e.to_string()),
        None => Ok(Story::builtin()),
    }
}

/// Format a duration in milliseconds as seconds, e.g. `4.5s`.
pub fn seconds(d: std::time::Duration) -> String {
    let millis = d.as_millis();
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        let fraction = format!("{:03}", millis % 1000);
        format!("{}.{}s", millis / 1000, fraction.trim_end_matches('0'))
    }
}

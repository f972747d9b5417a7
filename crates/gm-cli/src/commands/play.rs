use std::ops::RangeInclusive;
use std::path::Path;

use gm_engine::{EngineConfig, GameController, SystemClock};
use tracing::info;

const SPEED_RANGE: RangeInclusive<f64> = 0.01..=100.0;

pub fn run(story: Option<&Path>, speed: f64) -> Result<(), String> {
    if !SPEED_RANGE.contains(&speed) {
        return Err(format!(
            "speed must be between {} and {}, got {speed}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        ));
    }
    let story = super::load_story(story)?;
    let config = EngineConfig::default().with_max_events(256);
    let game = GameController::new(story, config).map_err(|e| e.to_string())?;
    let clock = SystemClock::new().with_speed(speed);
    info!(title = %game.story().title, speed, "starting terminal player");

    crate::tui::run(game, clock)
}

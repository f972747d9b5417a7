use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GREYMAP_LOG=gm_engine=debug`.
const LOG_ENV: &str = "GREYMAP_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr so stdout stays clean for command output.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Log to a file; the terminal belongs to the player.
pub fn init_file(path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("cannot create log file {}: {e}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

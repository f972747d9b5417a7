mod app;
mod views;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use gm_engine::{GameController, Scene, SystemClock};
use ratatui::prelude::*;

use app::App;

/// Longest wait for input before redrawing.
const MAX_IDLE: Duration = Duration::from_millis(250);

pub fn run(game: GameController, clock: SystemClock) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let mut app = App::new(game, clock);

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    let progress = app.game.abandon();
    println!(
        "  {}/{} chapters completed.",
        progress.completed_count(),
        progress.chapter_count()
    );

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<SystemClock>,
) -> Result<(), String> {
    loop {
        app.tick();
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        let timeout = app
            .game
            .next_deadline()
            .map_or(MAX_IDLE, |deadline| app.clock.until(deadline))
            .min(MAX_IDLE);
        if !event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            continue;
        }

        if let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if app.show_help {
                app.toggle_help();
                continue;
            }

            app.tick();
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('j') | KeyCode::Down => app.move_down(),
                KeyCode::Char('k') | KeyCode::Up => app.move_up(),
                KeyCode::Char('g') => app.move_to_top(),
                KeyCode::Char('G') => app.move_to_bottom(),
                KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
                KeyCode::Char('d') => app.discover_selected(),
                KeyCode::Char('a') => app.advance(),
                KeyCode::Char('r') => app.restart(),
                KeyCode::Char('?') => app.toggle_help(),
                _ => {}
            }
        }
    }
}

fn draw(frame: &mut Frame, app: &App<SystemClock>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Journey bar
            Constraint::Min(0),    // Scene
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let snapshot = app.snapshot();
    views::draw_journey_bar(frame, &snapshot, chunks[0]);

    match snapshot.scene {
        Scene::Intro => views::intro::draw(frame, &snapshot, chunks[1]),
        Scene::Chapter(_) => views::chapter::draw(frame, &snapshot, app.cursor, chunks[1]),
        Scene::Ending => views::ending::draw(frame, &snapshot, chunks[1]),
    }

    views::draw_status_bar(frame, app, &snapshot, chunks[2]);

    if app.show_help {
        views::draw_help_popup(frame);
    }
}

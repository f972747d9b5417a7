pub mod chapter;
pub mod ending;
pub mod intro;

use gm_engine::{Clock, Scene, Snapshot};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use super::app::App;

pub fn draw_journey_bar(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let label = snapshot
        .progress
        .landmarks
        .iter()
        .map(|l| {
            let name = if l.landmark.is_empty() {
                format!("Chapter {}", l.chapter)
            } else {
                l.landmark.clone()
            };
            if l.complete { format!("{name} ✓") } else { name }
        })
        .collect::<Vec<_>>()
        .join("  ·  ");

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Journey ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(snapshot.progress.fraction.clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

pub fn draw_status_bar<C: Clock>(frame: &mut Frame, app: &App<C>, snapshot: &Snapshot, area: Rect) {
    let status = match &app.notice {
        Some(notice) => format!("! {notice}"),
        None => match snapshot.scene {
            Scene::Intro => format!("{} | Enter:start ?:help q:quit", snapshot.at),
            Scene::Chapter(id) => {
                let found = snapshot.chapter.as_ref().map_or(0, |c| c.found);
                let total = snapshot.chapter.as_ref().map_or(0, |c| c.clues.len());
                format!(
                    "{} | {id} | {found}/{total} found | j/k:select Enter:discover a:advance ?:help q:quit",
                    snapshot.at
                )
            }
            Scene::Ending => format!("{} | Ending | r:restart q:quit", snapshot.at),
        },
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(bar, area);
}

pub fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().bold()),
        Line::from(""),
        Line::from("  j / ↓       Next clue"),
        Line::from("  k / ↑       Previous clue"),
        Line::from("  g / G       First / last clue"),
        Line::from("  Enter       Start, discover, or continue"),
        Line::from("  d           Discover selected clue"),
        Line::from("  a           Advance to the next chapter"),
        Line::from("  r           Restart the journey"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q           Quit"),
        Line::from("  Ctrl+C      Force quit"),
    ];

    let popup = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

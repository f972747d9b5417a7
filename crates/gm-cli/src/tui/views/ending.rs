use gm_engine::{EndingPhase, Snapshot};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let Some(ending) = &snapshot.ending else {
        return;
    };

    let color = match ending.phase {
        EndingPhase::Opening => Color::Gray,
        EndingPhase::Interlude => Color::Blue,
        EndingPhase::Finale => Color::Yellow,
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(ending.title.as_str()).style(Style::default().fg(color).bold()),
        Line::from(""),
        Line::from(ending.body.as_str()),
        Line::from(""),
    ];
    for message in &ending.payload {
        lines.push(Line::from(format!("\"{message}\"")).style(Style::default().fg(Color::White).italic()));
        lines.push(Line::from(""));
    }
    if ending.finished {
        lines.push(Line::from("press Enter or r to begin again").style(Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", ending.phase))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(paragraph, area);
}

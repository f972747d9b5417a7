use gm_engine::Snapshot;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let Some(intro) = &snapshot.intro else {
        return;
    };

    let mut lines = vec![Line::from(""); 3];
    if let Some(title) = &intro.title {
        lines.push(Line::from(title.as_str()).style(Style::default().fg(Color::White).bold()));
        lines.push(Line::from(""));
    }
    if let Some(subtitle) = &intro.subtitle {
        lines.push(Line::from(subtitle.as_str()).style(Style::default().fg(Color::Gray).italic()));
        lines.push(Line::from(""));
        lines.push(Line::from(""));
    }
    if let Some(prompt) = &intro.prompt {
        lines.push(
            Line::from(format!("[ {prompt} ]"))
                .style(Style::default().fg(Color::Cyan).bold()),
        );
        lines.push(Line::from("press Enter").style(Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

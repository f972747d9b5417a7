use gm_engine::{ChapterPhase, Snapshot};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub fn draw(frame: &mut Frame, snapshot: &Snapshot, cursor: usize, area: Rect) {
    let Some(chapter) = &snapshot.chapter else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    // Clue list
    let items: Vec<ListItem> = chapter
        .clues
        .iter()
        .map(|clue| {
            let label = if clue.title.is_empty() {
                clue.id.as_str()
            } else {
                clue.title.as_str()
            };
            let (marker, style) = if clue.discovered {
                ("●", Style::default().fg(Color::Green))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            let mut spans = vec![
                Span::styled(marker, style),
                Span::raw(" "),
                Span::styled(label, Style::default().fg(Color::White)),
            ];
            if !clue.region.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", clue.region),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Clues ({}/{}) ", chapter.found, chapter.clues.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(cursor));
    frame.render_stateful_widget(list, columns[0], &mut state);

    // Scene
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(7)])
        .split(columns[1]);

    let scene_color = if chapter.scene_restored {
        Color::Yellow
    } else {
        Color::Gray
    };
    let mut lines = vec![
        Line::from(chapter.title.as_str()).style(Style::default().fg(scene_color).bold()),
        Line::from(""),
    ];
    match &chapter.caption {
        Some(caption) => lines.push(Line::from(caption.as_str()).style(Style::default().fg(scene_color))),
        None => lines.push(
            Line::from("Everything here is grey.").style(Style::default().fg(Color::DarkGray)),
        ),
    }
    lines.push(Line::from(""));
    match chapter.phase {
        ChapterPhase::ReadyToAdvance => lines.push(
            Line::from("[ Continue: press Enter ]").style(Style::default().fg(Color::Cyan).bold()),
        ),
        ChapterPhase::HandingOff => lines.push(
            Line::from("Messages received. Press Enter to go on.")
                .style(Style::default().fg(Color::Cyan).italic()),
        ),
        _ => {}
    }

    let scene = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" Chapter {} ", chapter.number))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(scene_color)),
        );
    frame.render_widget(scene, rows[0]);

    // Reveal dialog
    let dialog = Paragraph::new(chapter.dialog.clone().unwrap_or_default())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).italic())
        .block(
            Block::default()
                .title(" Memory ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if chapter.dialog.is_some() {
                    Color::Magenta
                } else {
                    Color::DarkGray
                })),
        );
    frame.render_widget(dialog, rows[1]);
}

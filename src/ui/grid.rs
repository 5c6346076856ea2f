use std::time::Instant;

use crate::app::{App, CARD_WIDTH, InputMode};
use crate::nav::NavEntry;
use crate::pane::Grid;
use crate::render::{Card, RevealPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const CARD_HEIGHT: u16 = 6;
const SPINNER: [char; 4] = ['⠋', '⠙', '⠹', '⠸'];

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: nav(3) + search(3) + heading(1) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Navigation bar ──
    let mut nav_spans = vec![Span::styled(
        format!(" Movie Explorer · {}   ", app.pipeline.provider().name()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, entry) in NavEntry::ALL.iter().enumerate() {
        let style = if app.nav.is_active(*entry) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        nav_spans.push(Span::styled(format!("{} {}", i + 1, entry.label()), style));
        nav_spans.push(Span::raw("   "));
    }
    let nav_bar = Paragraph::new(Line::from(nav_spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(nav_bar, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " 🔍 Movie you liked (Enter to recommend, Esc to cancel): "
    } else {
        " 🔍 Recommend (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, chunks[1]);

    if app.input_mode == InputMode::Editing {
        let typed = unicode_width::UnicodeWidthStr::width(search_label)
            + unicode_width::UnicodeWidthStr::width(app.search.as_str());
        let offset = u16::try_from(typed).unwrap_or(u16::MAX);
        // Long input pins the cursor to the inner right edge
        let cursor_x = chunks[1]
            .x
            .saturating_add(offset)
            .min(chunks[1].right().saturating_sub(2));
        frame.set_cursor_position((cursor_x, chunks[1].y + 1));
    }

    // ── Heading ──
    let mut heading = vec![Span::styled(
        format!(" {}", app.pane.heading),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if app.pane.loading {
        let tick = (chrono::Utc::now().timestamp_millis() / 120) as usize;
        let frame_char = SPINNER[tick % SPINNER.len()];
        heading.push(Span::styled(
            format!("  {} loading", frame_char),
            Style::default().fg(Color::Cyan),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(heading)), chunks[2]);

    // ── Results ──
    match &app.pane.grid {
        Grid::Cards(cards) => render_cards(app, frame, chunks[3], cards),
        Grid::Message(text) => {
            let message = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, padded(chunks[3]));
        }
        Grid::Empty => {}
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key_style),
        Span::raw(" Select  "),
        Span::styled("1-4/Tab", key_style),
        Span::raw(" Nav  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("Enter", key_style),
        Span::raw(" Details  "),
        Span::styled("w", key_style),
        Span::raw(" Watchlist  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[4]);
}

fn padded(area: Rect) -> Rect {
    Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    }
}

fn render_cards(app: &App, frame: &mut Frame, area: Rect, cards: &[Card]) {
    let columns = app.columns.max(1);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected / columns;
    // Scroll so the selected row stays on screen
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let now = Instant::now();

    for (idx, card) in cards.iter().enumerate() {
        let row = idx / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = (idx % columns) as u16;
        let rect = Rect {
            x: area.x + 1 + col * CARD_WIDTH,
            y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
            width: CARD_WIDTH.saturating_sub(1),
            height: CARD_HEIGHT,
        };
        if rect.right() > area.right() || rect.bottom() > area.bottom() {
            continue;
        }
        render_card(frame, rect, card, idx == app.selected, card.reveal.phase(now));
    }
}

fn render_card(frame: &mut Frame, rect: Rect, card: &Card, selected: bool, phase: RevealPhase) {
    if phase == RevealPhase::Hidden {
        return;
    }

    let text_style = match phase {
        RevealPhase::Active => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::White),
    };
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let inner_width = rect.width.saturating_sub(2) as usize;

    let lines = vec![
        Line::from(Span::styled(
            super::truncate_str(&card.title, inner_width),
            text_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("⭐ {} | {}", card.rating, card.year),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            super::truncate_str(&card.poster, inner_width),
            Style::default().fg(Color::Blue),
        )),
        Line::from(Span::styled(
            format!("[{}] {}", card.glyph(), if card.saved { "Saved" } else { "Watchlist" }),
            if card.saved {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(widget, rect);
}

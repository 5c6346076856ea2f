use crate::app::App;
use crate::detail::DetailModal;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let DetailModal::Open {
        loading,
        fields,
        scroll,
        ..
    } = &app.detail
    else {
        return;
    };

    let area = modal_rect(frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            fields.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if !fields.rating.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(" Rating: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("⭐ {}", fields.rating), Style::default().fg(Color::Yellow)),
        ]));
    }
    if !fields.poster.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(" Poster: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                fields.poster.clone(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    for (label, value) in fields.metadata() {
        if value.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ]));
    }
    if !fields.plot.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Plot",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(" {}", fields.plot)));
    }

    let title = if *loading { " Loading details… " } else { " Movie Details " };
    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((*scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_bottom(
                    Line::from(" Esc close · click outside to dismiss ")
                        .alignment(Alignment::Right)
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        );
    frame.render_widget(modal, area);
}

/// Area covered by the modal; clicks outside it hit the backdrop.
pub fn modal_rect(area: Rect) -> Rect {
    super::help::centered_rect(70, 80, area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_rect_is_centered_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = modal_rect(area);
        assert!(modal.width < area.width && modal.height < area.height);
        assert!(modal.x > 0 && modal.y > 0);
        assert!(!modal.contains(ratatui::layout::Position::new(0, 0)));
        assert!(modal.contains(ratatui::layout::Position::new(50, 25)));
    }
}

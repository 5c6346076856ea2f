mod detail;
mod grid;
mod help;

pub use detail::modal_rect;

use crate::app::App;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    grid::render(app, frame);

    if app.detail.is_open() {
        detail::render(app, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Truncate a string to `max_width` terminal columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::model::MovieSummary;
    use crate::pipeline::{PaneEvent, UiEvent};
    use crate::render::CardLimit;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Alien", 10), "Alien");
        assert_eq!(truncate_str("The Lord of the Rings", 8), "The Lor…");
        assert_eq!(truncate_str("千と千尋の神隠し", 7), "千と千…");
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_grid_and_messages() {
        let mut app = crate::app::testing::app();
        app.update_columns(100);
        app.handle_event(UiEvent::Pane(PaneEvent::Heading("Top Rated Movies".to_string())));
        app.handle_event(UiEvent::Pane(PaneEvent::Render {
            movies: vec![MovieSummary {
                id: "238".to_string(),
                title: "The Godfather".to_string(),
                poster: Some("https://image.tmdb.org/t/p/w1280/3bhkrj58Vtu7enYsRolD1fZdja1.jpg".to_string()),
                rating: Some(8.69),
                release_date: Some("1972-03-14".to_string()),
            }],
            limit: CardLimit::First(12),
        }));
        // Let the reveal finish so the card content is drawn
        app.pane = {
            let mut pane = app.pane.clone();
            if let crate::pane::Grid::Cards(cards) = &mut pane.grid {
                for card in cards.iter_mut() {
                    card.reveal.inserted_at -= std::time::Duration::from_secs(5);
                }
            }
            pane
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Top Rated Movies"));
        assert!(text.contains("The Godfather"));
        assert!(text.contains("8.7 | 1972"));

        app.handle_event(UiEvent::Pane(PaneEvent::Message(
            crate::pipeline::NO_RESULTS.to_string(),
        )));
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("No movies found."));
    }

    #[test]
    fn test_long_search_input_keeps_cursor_in_bar() {
        let mut app = crate::app::testing::app();
        app.input_mode = crate::app::InputMode::Editing;
        app.search = "x".repeat(70_000);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor.x, 78);
        assert_eq!(cursor.y, 4);
    }
}

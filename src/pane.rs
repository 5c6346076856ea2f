use std::time::Instant;

use crate::model::WatchlistEntry;
use crate::pipeline::PaneEvent;
use crate::render::{self, Card, CardLimit};

/// Contents of the results grid. Every render pass replaces it whole.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    Empty,
    Cards(Vec<Card>),
    Message(String),
}

/// Heading, loading indicator and grid under the navigation bar.
#[derive(Debug, Clone)]
pub struct ResultsPane {
    pub heading: String,
    pub loading: bool,
    pub grid: Grid,
    /// Set while the grid holds the saved list rather than a fetch result
    pub showing_watchlist: bool,
}

impl Default for ResultsPane {
    fn default() -> Self {
        Self {
            heading: String::new(),
            loading: false,
            grid: Grid::Empty,
            showing_watchlist: false,
        }
    }
}

impl ResultsPane {
    /// Apply one pipeline event. `is_saved` marks watchlisted cards.
    pub fn apply(&mut self, event: PaneEvent, is_saved: impl Fn(&str) -> bool, now: Instant) {
        match event {
            PaneEvent::ShowLoader => {
                self.loading = true;
                self.grid = Grid::Empty;
                self.showing_watchlist = false;
            }
            PaneEvent::HideLoader => self.loading = false,
            PaneEvent::Heading(text) => self.heading = text,
            PaneEvent::Render { movies, limit } => {
                self.grid = Grid::Cards(render::render(&movies, limit, is_saved, now));
                self.showing_watchlist = false;
            }
            PaneEvent::Message(text) => {
                self.grid = Grid::Message(text);
                self.showing_watchlist = false;
            }
            PaneEvent::Clear => {
                self.grid = Grid::Empty;
                self.showing_watchlist = false;
            }
        }
    }

    /// Render the saved list: no cap, every card marked saved.
    pub fn show_watchlist(&mut self, heading: &str, entries: &[WatchlistEntry], now: Instant) {
        let movies: Vec<_> = entries.iter().map(WatchlistEntry::to_summary).collect();
        self.heading = heading.to_string();
        self.loading = false;
        self.grid = Grid::Cards(render::render(&movies, CardLimit::Unbounded, |_| true, now));
        self.showing_watchlist = true;
    }

    pub fn cards(&self) -> &[Card] {
        match &self.grid {
            Grid::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Update the watchlist glyph of every card showing `id`, in place.
    pub fn set_saved(&mut self, id: &str, saved: bool) {
        if let Grid::Cards(cards) = &mut self.grid {
            for card in cards.iter_mut().filter(|c| c.id == id) {
                card.saved = saved;
            }
        }
    }
}

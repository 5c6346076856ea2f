use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use ratatui::layout::{Position, Rect};

use crate::detail::DetailModal;
use crate::model::MovieSummary;
use crate::nav::{NavAction, NavEntry, Navigation};
use crate::pane::ResultsPane;
use crate::pipeline::{PaneEvent, Pipeline, UiEvent};
use crate::query::SearchQuery;
use crate::render::Card;
use crate::watchlist::Watchlist;

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Width of one card column in the grid, borders included.
pub const CARD_WIDTH: u16 = 30;

/// Main application state.
pub struct App {
    pub pipeline: Pipeline,
    events: Receiver<UiEvent>,
    pub watchlist: Watchlist,
    pub should_quit: bool,
    pub show_help: bool,

    pub nav: Navigation,
    pub pane: ResultsPane,

    // Grid selection
    pub selected: usize,
    pub columns: usize,

    pub search: String,
    pub input_mode: InputMode,

    pub detail: DetailModal,
    // Movie the modal was opened for; grid renders may replace the cards under it
    detail_movie: Option<MovieSummary>,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new(pipeline: Pipeline, events: Receiver<UiEvent>, watchlist: Watchlist) -> Self {
        Self {
            pipeline,
            events,
            watchlist,
            should_quit: false,
            show_help: false,

            nav: Navigation::initial().0,
            pane: ResultsPane::default(),

            selected: 0,
            columns: 4, // updated on first resize

            search: String::new(),
            input_mode: InputMode::Normal,

            detail: DetailModal::Closed,
            detail_movie: None,

            status_msg: String::new(),
        }
    }

    /// Page-load behaviour: Home is active and its listing is fetched.
    pub fn init(&mut self) {
        let (nav, action) = Navigation::initial();
        self.nav = nav;
        self.dispatch(action);
        self.status_msg = format!("Connected to {}", self.pipeline.provider().name());
    }

    /// Activate a navigation entry and dispatch its query.
    pub fn select_nav(&mut self, entry: NavEntry) {
        let (nav, action) = self.nav.select(entry);
        self.nav = nav;
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: NavAction) {
        self.selected = 0;
        match action {
            NavAction::Fetch { listing, heading } => {
                let request = self.pipeline.provider().listing(listing);
                self.pipeline.spawn_run(request, heading.to_string());
            }
            NavAction::ShowWatchlist => self.show_watchlist(),
        }
    }

    fn show_watchlist(&mut self) {
        let entries = self.watchlist.list();
        self.pane
            .show_watchlist(NavEntry::Watchlist.heading(), &entries, Instant::now());
        self.clamp_selection();
        self.status_msg = format!("{} saved movies", entries.len());
    }

    /// Submit the search bar. Blank input is ignored.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(query) = SearchQuery::parse(&self.search) else {
            return;
        };
        self.nav = self.nav.enter_search();
        self.selected = 0;
        self.status_msg = format!("Searching for \"{}\"...", query.as_str());
        self.pipeline.spawn_recommend(query);
        self.search.clear();
    }

    /// Apply every event the fetch tasks have sent since the last tick.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Pane(event) => {
                let rendering = matches!(event, PaneEvent::Render { .. });
                let saved: HashSet<String> = if rendering {
                    self.watchlist.list().into_iter().map(|e| e.id).collect()
                } else {
                    HashSet::new()
                };
                self.pane
                    .apply(event, |id| saved.contains(id), Instant::now());
                if rendering {
                    self.status_msg = format!("{} movies", self.pane.cards().len());
                }
                self.clamp_selection();
            }
            UiEvent::Detail(event) => {
                self.detail = std::mem::take(&mut self.detail).apply(event);
            }
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.pane.cards().get(self.selected)
    }

    /// Save or unsave the movie shown in the detail modal, or the selected
    /// card when the modal is closed.
    pub fn toggle_watch(&mut self) {
        let movie = if self.detail.is_open() {
            self.detail_movie.clone()
        } else {
            self.selected_card().map(|c| c.movie.clone())
        };
        let Some(movie) = movie else {
            return;
        };

        match self.watchlist.toggle(movie.to_watchlist_entry()) {
            Ok(saved) => {
                if self.pane.showing_watchlist {
                    self.show_watchlist();
                } else {
                    self.pane.set_saved(&movie.id, saved);
                }
                self.status_msg = if saved {
                    format!("Added \"{}\" to watchlist", movie.title)
                } else {
                    format!("Removed \"{}\" from watchlist", movie.title)
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "watchlist toggle failed");
                self.status_msg = e.user_message();
            }
        }
    }

    /// Open the detail modal for the selected card and fetch its record.
    pub fn open_detail(&mut self) {
        let Some(movie) = self.selected_card().map(|c| c.movie.clone()) else {
            return;
        };
        self.detail = DetailModal::open(&movie.id);
        self.pipeline.spawn_detail(movie.id.clone());
        self.detail_movie = Some(movie);
    }

    pub fn close_detail(&mut self) {
        self.detail = std::mem::take(&mut self.detail).close();
        self.detail_movie = None;
    }

    /// Left click at `pos` in a frame of size `area`. A click on the
    /// backdrop around the modal closes it.
    pub fn click(&mut self, pos: Position, area: Rect) {
        if self.detail.is_open() && !crate::ui::modal_rect(area).contains(pos) {
            self.close_detail();
        }
    }

    /// Web page of the selected card, for the open-link key.
    pub fn selected_page_url(&self) -> Option<String> {
        self.selected_card()
            .map(|c| self.pipeline.provider().page_url(&c.id))
    }

    /// Update grid column count based on terminal width.
    pub fn update_columns(&mut self, terminal_width: u16) {
        self.columns = (terminal_width.saturating_sub(2) / CARD_WIDTH).max(1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.pane.cards().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.pane.cards().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + self.columns < self.pane.cards().len() {
            self.selected += self.columns;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::App;
    use crate::pipeline::testing::CannedTransport;
    use crate::pipeline::{Pipeline, UiChannels};
    use crate::provider::TmdbProvider;
    use crate::watchlist::{MemoryStorage, Watchlist};

    /// App over TMDB with no network answers and an in-memory watchlist.
    pub fn app() -> App {
        let channels = UiChannels::new();
        let provider = Arc::new(TmdbProvider::new(
            "k".to_string(),
            "https://api.themoviedb.org/3".to_string(),
            "https://image.tmdb.org/t/p/w1280".to_string(),
        ));
        let pipeline = Pipeline::new(
            provider,
            Arc::new(CannedTransport::default()),
            channels.tx.clone(),
            12,
        );
        App::new(
            pipeline,
            channels.rx,
            Watchlist::new(Box::new(MemoryStorage::default())),
        )
    }
}

mod app;
mod config;
mod detail;
mod error;
mod model;
mod nav;
mod pane;
mod pipeline;
mod provider;
mod query;
mod render;
mod ui;
mod watchlist;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use app::{App, InputMode};
use clap::{Parser, Subcommand};
use config::{Config, ProviderKind};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use nav::NavEntry;
use pane::{Grid, ResultsPane};
use pipeline::{Pipeline, UiChannels, UiEvent};
use provider::HttpTransport;
use query::SearchQuery;
use ratatui::layout::Position;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use watchlist::{FileStorage, MemoryStorage, Storage, Watchlist};

/// Terminal movie discovery over TMDB or OMDb, with a local watchlist
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Movie API to query
    #[arg(long, value_enum, global = true)]
    provider: Option<ProviderKind>,

    /// API key for the selected provider (overrides config and environment)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Path to config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep the watchlist in memory for this session only
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI explorer (default)
    Run,
    /// Print recommendations based on a movie you liked
    Recommend {
        /// Title to search for
        query: String,
    },
    /// Print the saved watchlist
    Watchlist,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(kind) = cli.provider {
        config.provider = kind;
    }
    if let Some(key) = cli.api_key {
        config.set_api_key(key);
    }

    let data_dir = config.data_dir()?;
    let _log_guard = init_logging(&data_dir)?;
    tracing::info!(provider = config.provider.label(), data_dir = %data_dir.display(), "starting");

    let storage: Box<dyn Storage> = if cli.ephemeral {
        Box::new(MemoryStorage::default())
    } else {
        Box::new(FileStorage::new(data_dir))
    };
    let watchlist = Watchlist::new(storage);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Watchlist => {
            let entries = watchlist.list();
            if entries.is_empty() {
                println!("Your watchlist is empty.");
            }
            for entry in entries {
                println!("{} ({})  [{}]", entry.title, entry.year, entry.id);
            }
        }
        Commands::Recommend { query } => {
            let Some(query) = SearchQuery::parse(&query) else {
                eprintln!("Error: search query is empty");
                std::process::exit(2);
            };
            let channels = UiChannels::new();
            let pipeline = build_pipeline(&config, &channels)?;
            pipeline.recommend(query).await;
            print_pane(&channels, &watchlist);
        }
        Commands::Run => {
            let channels = UiChannels::new();
            let pipeline = build_pipeline(&config, &channels)?;
            let mut app = App::new(pipeline, channels.rx, watchlist);
            app.init();

            let mut terminal = ratatui::init();
            crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

            let size = terminal.size()?;
            app.update_columns(size.width);

            let result = run_app(&mut terminal, &mut app);

            crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Send log records to a daily file; the terminal belongs to the UI.
fn init_logging(data_dir: &std::path::Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "movie-explorer.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("MOVIE_EXPLORER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("movie_explorer=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}

fn build_pipeline(config: &Config, channels: &UiChannels) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let provider = provider::from_config(config)?;
    Ok(Pipeline::new(
        provider,
        Arc::new(HttpTransport::new()),
        channels.tx.clone(),
        config.grid_limit,
    ))
}

/// Replay the pane events of a finished pipeline run and print the result.
fn print_pane(channels: &UiChannels, watchlist: &Watchlist) {
    let saved: Vec<String> = watchlist.list().into_iter().map(|e| e.id).collect();
    let mut pane = ResultsPane::default();
    while let Ok(event) = channels.rx.try_recv() {
        if let UiEvent::Pane(event) = event {
            pane.apply(event, |id| saved.iter().any(|s| s == id), Instant::now());
        }
    }

    if !pane.heading.is_empty() {
        println!("{}", pane.heading);
    }
    match &pane.grid {
        Grid::Cards(cards) => {
            for card in cards {
                println!("  {} {}  ⭐ {} | {}", card.glyph(), card.title, card.rating, card.year);
            }
        }
        Grid::Message(text) => println!("  {}", text),
        Grid::Empty => {}
    }
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll keeps the loader spinner and card reveal moving
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    let area = terminal.get_frame().area();
                    handle_mouse(app, mouse, area);
                }
                Event::Resize(width, _) => {
                    app.update_columns(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
    } else if app.detail.is_open() {
        handle_detail_key(app, key);
    } else {
        handle_grid_key(app, key);
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search.pop();
        }
        KeyCode::Char(c) => app.search.push(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.select_nav(NavEntry::ALL[idx]);
        }
        KeyCode::Tab => {
            let next = app.nav.active().map_or(NavEntry::Home, NavEntry::next);
            app.select_nav(next);
        }
        KeyCode::BackTab => {
            let prev = app.nav.active().map_or(NavEntry::Watchlist, NavEntry::prev);
            app.select_nav(prev);
        }
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('w') => app.toggle_watch(),
        KeyCode::Char('o') => {
            if let Some(link) = app.selected_page_url() {
                match std::process::Command::new("xdg-open").arg(&link).spawn() {
                    Ok(_) => app.status_msg = format!("Opening: {}", link),
                    Err(e) => {
                        tracing::warn!(error = %e, url = %link, "xdg-open failed");
                        app.status_msg = format!("Link: {} (no browser available)", link);
                    }
                }
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.detail.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.detail.scroll_by(-1),
        KeyCode::PageDown => app.detail.scroll_by(10),
        KeyCode::PageUp => app.detail.scroll_by(-10),
        KeyCode::Char('w') => app.toggle_watch(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, area: ratatui::layout::Rect) {
    if !app.detail.is_open() {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.click(Position::new(mouse.column, mouse.row), area);
        }
        MouseEventKind::ScrollDown => app.detail.scroll_by(1),
        MouseEventKind::ScrollUp => app.detail.scroll_by(-1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    use crate::model::MovieSummary;
    use crate::pipeline::PaneEvent;
    use crate::render::CardLimit;

    fn app_with_open_modal() -> App {
        let mut app = app::testing::app();
        app.handle_event(UiEvent::Pane(PaneEvent::Render {
            movies: vec![MovieSummary {
                id: "78".to_string(),
                title: "Blade Runner".to_string(),
                poster: Some("https://img/78.jpg".to_string()),
                rating: Some(7.9),
                release_date: Some("1982-06-25".to_string()),
            }],
            limit: CardLimit::First(12),
        }));
        app.open_detail();
        assert!(app.detail.is_open());
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn test_esc_and_q_close_modal_without_quitting() {
        let mut app = app_with_open_modal();
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(!app.detail.is_open());

        app.open_detail();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.detail.is_open());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_left_click_dispatch_on_backdrop() {
        let area = Rect::new(0, 0, 120, 40);
        let mut app = app_with_open_modal();

        handle_mouse(&mut app, left_click(60, 20), area);
        assert!(app.detail.is_open());

        handle_mouse(&mut app, left_click(1, 1), area);
        assert!(!app.detail.is_open());
    }
}

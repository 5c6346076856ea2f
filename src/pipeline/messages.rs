use std::sync::mpsc::{Receiver, Sender};

use crate::model::{MovieDetail, MovieSummary};
use crate::render::CardLimit;

/// Messages sent from fetch tasks to the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Pane(PaneEvent),
    Detail(DetailEvent),
}

/// Mutations of the results pane, applied in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum PaneEvent {
    /// Show the loading indicator and clear the grid
    ShowLoader,

    /// Hide the loading indicator
    HideLoader,

    /// Replace the heading text
    Heading(String),

    /// Render cards for these movies
    Render {
        movies: Vec<MovieSummary>,
        limit: CardLimit,
    },

    /// Replace the grid with a single message
    Message(String),

    /// Empty the grid
    Clear,
}

/// Outcome of a detail lookup, tagged with the id it was issued for
#[derive(Debug, Clone, PartialEq)]
pub enum DetailEvent {
    Loaded { id: String, detail: MovieDetail },
    Failed { id: String, title: String },
}

/// Channel pair between fetch tasks and the UI loop
pub struct UiChannels {
    pub tx: Sender<UiEvent>,
    pub rx: Receiver<UiEvent>,
}

impl UiChannels {
    pub fn new() -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for UiChannels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_channels_deliver_in_order() {
        let channels = UiChannels::new();
        channels.tx.send(UiEvent::Pane(PaneEvent::ShowLoader)).unwrap();
        channels
            .tx
            .send(UiEvent::Pane(PaneEvent::Heading("Top Rated Movies".to_string())))
            .unwrap();

        assert_eq!(channels.rx.recv().unwrap(), UiEvent::Pane(PaneEvent::ShowLoader));
        assert!(matches!(
            channels.rx.recv(),
            Ok(UiEvent::Pane(PaneEvent::Heading(h))) if h == "Top Rated Movies"
        ));
    }

    #[test]
    fn test_sender_survives_cross_thread() {
        let channels = UiChannels::new();
        let tx = channels.tx.clone();
        std::thread::spawn(move || {
            tx.send(UiEvent::Detail(DetailEvent::Failed {
                id: "1".to_string(),
                title: "Movie not found".to_string(),
            }))
            .unwrap();
        })
        .join()
        .unwrap();

        assert!(matches!(
            channels.rx.recv(),
            Ok(UiEvent::Detail(DetailEvent::Failed { .. }))
        ));
    }
}

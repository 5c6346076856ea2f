//! Maps movie records to grid cards.

use std::time::{Duration, Instant};

use crate::model::MovieSummary;

/// Per-position delay before a card starts appearing.
pub const STAGGER_STEP: Duration = Duration::from_millis(100);
/// Time after its delay until a card is fully settled.
pub const SETTLE_AFTER: Duration = Duration::from_millis(800);

/// How many input records a render pass considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLimit {
    /// First `n` records (API results).
    First(usize),
    /// Every record (watchlist view).
    Unbounded,
}

/// Reveal phase of a card at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealPhase {
    Hidden,
    Active,
    Revealed,
}

/// Staggered reveal schedule. Phases are computed from the card's own
/// insertion instant, so a newer render pass never affects older cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub inserted_at: Instant,
    pub delay: Duration,
}

impl Reveal {
    pub fn new(inserted_at: Instant, position: usize) -> Self {
        Self {
            inserted_at,
            delay: STAGGER_STEP * position as u32,
        }
    }

    pub fn phase(&self, now: Instant) -> RevealPhase {
        let elapsed = now.saturating_duration_since(self.inserted_at);
        if elapsed >= self.delay + SETTLE_AFTER {
            RevealPhase::Revealed
        } else if elapsed >= self.delay {
            RevealPhase::Active
        } else {
            RevealPhase::Hidden
        }
    }
}

/// A rendered result card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub rating: String,
    pub year: String,
    pub saved: bool,
    pub reveal: Reveal,
    /// Source record, kept so the card can be saved to the watchlist.
    pub movie: MovieSummary,
}

impl Card {
    pub fn glyph(&self) -> &'static str {
        if self.saved { "✓" } else { "+" }
    }
}

/// Build cards for the first records allowed by `limit`, in order, skipping
/// records without a poster. `is_saved` marks watchlisted ids.
pub fn render(
    movies: &[MovieSummary],
    limit: CardLimit,
    is_saved: impl Fn(&str) -> bool,
    now: Instant,
) -> Vec<Card> {
    let take = match limit {
        CardLimit::First(n) => n,
        CardLimit::Unbounded => movies.len(),
    };

    movies
        .iter()
        .take(take)
        .enumerate()
        .filter_map(|(idx, movie)| {
            let poster = movie.poster.clone()?;
            Some(Card {
                id: movie.id.clone(),
                title: movie.title.clone(),
                poster,
                rating: movie.rating_label(),
                year: movie.year(),
                saved: is_saved(&movie.id),
                reveal: Reveal::new(now, idx),
                movie: movie.clone(),
            })
        })
        .collect()
}

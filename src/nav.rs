use crate::query::Listing;

/// Entries of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEntry {
    Home,
    TopRated,
    Trending,
    Watchlist,
}

impl NavEntry {
    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::TopRated,
            Self::TopRated => Self::Trending,
            Self::Trending => Self::Watchlist,
            Self::Watchlist => Self::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Home => Self::Watchlist,
            Self::TopRated => Self::Home,
            Self::Trending => Self::TopRated,
            Self::Watchlist => Self::Trending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::TopRated => "Top Rated",
            Self::Trending => "Trending",
            Self::Watchlist => "Watchlist",
        }
    }

    /// Fixed heading shown above the results of this entry.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Home => "Trending This Week",
            Self::TopRated => "Top Rated Movies",
            Self::Trending => "Trending Today",
            Self::Watchlist => "My Watchlist",
        }
    }

    /// What selecting this entry dispatches.
    pub fn action(self) -> NavAction {
        let listing = match self {
            Self::Home => Listing::TrendingWeek,
            Self::TopRated => Listing::TopRated,
            Self::Trending => Listing::TrendingDay,
            Self::Watchlist => return NavAction::ShowWatchlist,
        };
        NavAction::Fetch {
            listing,
            heading: self.heading(),
        }
    }

    pub const ALL: [NavEntry; 4] = [Self::Home, Self::TopRated, Self::Trending, Self::Watchlist];
}

/// Work requested by a navigation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Fetch {
        listing: Listing,
        heading: &'static str,
    },
    ShowWatchlist,
}

/// Which navigation entry is marked active. `None` while a free-text
/// search owns the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    active: Option<NavEntry>,
}

impl Navigation {
    /// Page-load state: Home is active and its listing is fetched.
    pub fn initial() -> (Self, NavAction) {
        Self { active: None }.select(NavEntry::Home)
    }

    /// Clear every marker, mark `entry` and return the dispatch for it.
    pub fn select(self, entry: NavEntry) -> (Self, NavAction) {
        let next = Self { active: Some(entry) };
        (next, entry.action())
    }

    /// Submitting a search clears all markers.
    pub fn enter_search(self) -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<NavEntry> {
        self.active
    }

    pub fn is_active(&self, entry: NavEntry) -> bool {
        self.active == Some(entry)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One movie as returned by a listing, search or recommendations request.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    /// Provider identifier (TMDB numeric id or IMDb id).
    pub id: String,
    pub title: String,
    /// Fully qualified poster URL, `None` when the provider has no image.
    pub poster: Option<String>,
    /// Average rating on a 0-10 scale.
    pub rating: Option<f64>,
    /// Release date (`YYYY-MM-DD`) or a bare year, as the provider sent it.
    pub release_date: Option<String>,
}

impl MovieSummary {
    pub fn year(&self) -> String {
        display_year(self.release_date.as_deref())
    }

    pub fn rating_label(&self) -> String {
        display_rating(self.rating)
    }

    pub fn to_watchlist_entry(&self) -> WatchlistEntry {
        WatchlistEntry {
            title: self.title.clone(),
            year: self.year(),
            id: self.id.clone(),
            poster: self.poster.clone().unwrap_or_default(),
        }
    }
}

/// Extended record shown in the detail modal. Metadata fields are already
/// formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub rating: String,
    pub plot: String,
    pub year: String,
    pub runtime: String,
    pub genres: String,
    pub director: String,
    pub cast: String,
}

/// A saved movie. Serialized field names match the stored JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub title: String,
    pub year: String,
    pub id: String,
    pub poster: String,
}

impl WatchlistEntry {
    /// Watchlist entries are rendered through the same card pipeline as
    /// API results.
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            poster: if self.poster.is_empty() || self.poster == "N/A" {
                None
            } else {
                Some(self.poster.clone())
            },
            rating: None,
            release_date: if self.year == "N/A" {
                None
            } else {
                Some(self.year.clone())
            },
        }
    }
}

/// Four-digit year from a release date, or `N/A`.
pub fn display_year(release_date: Option<&str>) -> String {
    let Some(raw) = release_date.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y").to_string();
    }
    // OMDB sends "1994" or ranges such as "2008–2013"
    let head: String = raw.chars().take(4).collect();
    if head.len() == 4 && head.chars().all(|c| c.is_ascii_digit()) {
        head
    } else {
        "N/A".to_string()
    }
}

/// Rating rounded to one decimal, or `N/A`.
pub fn display_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r.is_finite() => format!("{:.1}", r),
        _ => "N/A".to_string(),
    }
}

//! OMDB (lookup-style) adapter.
//!
//! OMDB only offers search and lookup by IMDb id. Navigation listings are
//! simulated with fixed search terms, and "recommendations" are a second
//! search on the lead word of the matched title.

use serde::Deserialize;

use super::{MovieProvider, PLACEHOLDER_POSTER, non_empty};
use crate::error::{AppError, AppResult};
use crate::model::{MovieDetail, MovieSummary, display_year};
use crate::query::{Listing, Request, SearchQuery};

/// Search terms standing in for the curated listings OMDB lacks.
const TRENDING_WEEK_TERM: &str = "avengers";
const TOP_RATED_TERM: &str = "godfather";
const TRENDING_DAY_TERM: &str = "star wars";

/// Words skipped when picking the lead word of a title.
const STOP_WORDS: [&str; 4] = ["the", "a", "an", "of"];

pub struct OmdbProvider {
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResponse {
    #[serde(default)]
    search: Vec<OmdbSearchItem>,
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetail {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    actors: Option<String>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self { api_key, api_url }
    }

    fn request(&self, extra: &[(&str, &str)]) -> AppResult<Request> {
        let mut params = vec![("apikey", self.api_key.as_str())];
        params.extend_from_slice(extra);
        Request::build(&self.api_url, "/", &params)
    }

    fn search_term(&self, term: &str) -> AppResult<Request> {
        self.request(&[("s", term), ("type", "movie")])
    }
}

/// First word of a title that is not an article, used to find related
/// titles ("The Dark Knight" searches "Dark").
fn lead_word(title: &str) -> &str {
    title
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|w| !w.is_empty() && !STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .unwrap_or(title)
}

/// OMDB answers a search with no hits as `Response: "False"` and an error
/// string; only the "not found" flavour of that is an empty result.
fn is_no_match(error: &str) -> bool {
    let lower = error.to_lowercase();
    lower.contains("not found") || lower.contains("too many results")
}

impl MovieProvider for OmdbProvider {
    fn name(&self) -> &'static str {
        "OMDb"
    }

    fn listing(&self, listing: Listing) -> AppResult<Request> {
        let term = match listing {
            Listing::TrendingWeek => TRENDING_WEEK_TERM,
            Listing::TopRated => TOP_RATED_TERM,
            Listing::TrendingDay => TRENDING_DAY_TERM,
        };
        self.search_term(term)
    }

    fn search(&self, query: &SearchQuery) -> AppResult<Request> {
        self.search_term(query.as_str())
    }

    fn recommendations(&self, seed: &MovieSummary) -> AppResult<Request> {
        self.search_term(lead_word(&seed.title))
    }

    fn detail(&self, id: &str) -> AppResult<Request> {
        self.request(&[("i", id), ("plot", "full")])
    }

    fn decode_list(&self, body: &[u8]) -> AppResult<Vec<MovieSummary>> {
        let response: OmdbSearchResponse =
            serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))?;

        if response.response != "True" {
            let error = response.error.unwrap_or_default();
            if is_no_match(&error) {
                return Ok(Vec::new());
            }
            return Err(AppError::Decode(format!("OMDb error: {}", error)));
        }

        Ok(response
            .search
            .into_iter()
            .map(|item| MovieSummary {
                id: item.imdb_id,
                title: item.title,
                poster: non_empty(item.poster),
                rating: None,
                release_date: non_empty(item.year),
            })
            .collect())
    }

    fn decode_detail(&self, body: &[u8]) -> AppResult<MovieDetail> {
        let d: OmdbDetail =
            serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))?;

        if d.response != "True" {
            return Err(AppError::NotFound(
                d.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        let na = || "N/A".to_string();
        Ok(MovieDetail {
            id: d.imdb_id.unwrap_or_default(),
            title: d.title.unwrap_or_default(),
            poster: non_empty(d.poster).unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            rating: non_empty(d.imdb_rating).unwrap_or_else(na),
            plot: non_empty(d.plot).unwrap_or_default(),
            year: display_year(d.year.as_deref()),
            runtime: non_empty(d.runtime).unwrap_or_else(na),
            genres: non_empty(d.genre).unwrap_or_else(na),
            director: non_empty(d.director).unwrap_or_else(na),
            cast: non_empty(d.actors).unwrap_or_else(na),
        })
    }

    fn page_url(&self, id: &str) -> String {
        format!("https://www.imdb.com/title/{}/", id)
    }
}

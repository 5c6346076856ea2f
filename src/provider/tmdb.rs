//! TMDB (discovery-style) adapter.
//!
//! Listings, search and recommendations all answer with a
//! `{"results": [...]}` envelope. Poster paths are relative and are joined
//! onto the image base URL.

use serde::Deserialize;

use super::{MovieProvider, PLACEHOLDER_POSTER, non_empty};
use crate::error::{AppError, AppResult};
use crate::model::{MovieDetail, MovieSummary, display_rating, display_year};
use crate::query::{Listing, Request, SearchQuery};

/// Number of cast members listed in the detail modal.
const CAST_LIMIT: usize = 5;

pub struct TmdbProvider {
    api_key: String,
    api_url: String,
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    /// Trending endpoints can mix in entries that only carry `name`
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetail {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<TmdbNamed>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
}

#[derive(Debug, Deserialize)]
struct TmdbNamed {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbNamed>,
    #[serde(default)]
    crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    name: String,
    #[serde(default)]
    job: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, image_url: String) -> Self {
        Self {
            api_key,
            api_url,
            image_url,
        }
    }

    fn request(&self, path: &str, extra: &[(&str, &str)]) -> AppResult<Request> {
        let mut params = vec![("api_key", self.api_key.as_str())];
        params.extend_from_slice(extra);
        Request::build(&self.api_url, path, &params)
    }

    fn poster_url(&self, path: Option<String>) -> Option<String> {
        non_empty(path).map(|p| {
            if p.starts_with("http") {
                p
            } else {
                format!("{}{}", self.image_url.trim_end_matches('/'), p)
            }
        })
    }
}

impl MovieProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "TMDB"
    }

    fn listing(&self, listing: Listing) -> AppResult<Request> {
        let path = match listing {
            Listing::TrendingWeek => "/trending/movie/week",
            Listing::TopRated => "/movie/top_rated",
            Listing::TrendingDay => "/trending/movie/day",
        };
        self.request(path, &[])
    }

    fn search(&self, query: &SearchQuery) -> AppResult<Request> {
        self.request("/search/movie", &[("query", query.as_str())])
    }

    fn recommendations(&self, seed: &MovieSummary) -> AppResult<Request> {
        self.request(&format!("/movie/{}/recommendations", seed.id), &[])
    }

    fn detail(&self, id: &str) -> AppResult<Request> {
        self.request(&format!("/movie/{}", id), &[("append_to_response", "credits")])
    }

    fn decode_list(&self, body: &[u8]) -> AppResult<Vec<MovieSummary>> {
        let response: TmdbListResponse =
            serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))?;

        Ok(response
            .results
            .into_iter()
            .map(|m| MovieSummary {
                id: m.id.to_string(),
                title: m.title.or(m.name).unwrap_or_default(),
                poster: self.poster_url(m.poster_path),
                rating: m.vote_average,
                release_date: non_empty(m.release_date),
            })
            .collect())
    }

    fn decode_detail(&self, body: &[u8]) -> AppResult<MovieDetail> {
        let d: TmdbDetail =
            serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))?;
        let credits = d.credits.unwrap_or_default();

        let director = credits
            .crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let cast = credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let genres = d
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(MovieDetail {
            id: d.id.to_string(),
            title: d.title.unwrap_or_default(),
            poster: self
                .poster_url(d.poster_path)
                .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            rating: display_rating(d.vote_average),
            plot: d.overview.unwrap_or_default(),
            year: display_year(d.release_date.as_deref()),
            runtime: d
                .runtime
                .filter(|r| *r > 0)
                .map(|r| format!("{} min", r))
                .unwrap_or_else(|| "N/A".to_string()),
            genres: or_na(genres),
            director: or_na(director),
            cast: or_na(cast),
        })
    }

    fn page_url(&self, id: &str) -> String {
        format!("https://www.themoviedb.org/movie/{}", id)
    }
}

fn or_na(value: String) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TmdbProvider {
        TmdbProvider::new(
            "abc".to_string(),
            "https://api.themoviedb.org/3".to_string(),
            "https://image.tmdb.org/t/p/w1280".to_string(),
        )
    }

    #[test]
    fn test_listing_urls() {
        let p = provider();
        let week = p.listing(Listing::TrendingWeek).unwrap();
        assert_eq!(week.url.path(), "/3/trending/movie/week");
        assert_eq!(week.param("api_key").as_deref(), Some("abc"));
        assert_eq!(p.listing(Listing::TopRated).unwrap().url.path(), "/3/movie/top_rated");
        assert_eq!(p.listing(Listing::TrendingDay).unwrap().url.path(), "/3/trending/movie/day");
    }

    #[test]
    fn test_search_and_recommendation_urls() {
        let p = provider();
        let search = p.search(&SearchQuery::parse(" the batman ").unwrap()).unwrap();
        assert_eq!(search.url.path(), "/3/search/movie");
        assert_eq!(search.param("query").as_deref(), Some("the batman"));

        let seed = MovieSummary {
            id: "415".to_string(),
            title: "Batman & Robin".to_string(),
            poster: None,
            rating: None,
            release_date: None,
        };
        let rec = p.recommendations(&seed).unwrap();
        assert_eq!(rec.url.path(), "/3/movie/415/recommendations");
    }

    #[test]
    fn test_decode_list() {
        let body = br#"{"page":1,"results":[
            {"id":155,"title":"The Dark Knight","poster_path":"/qJ2.jpg","vote_average":8.512,"release_date":"2008-07-16"},
            {"id":9,"title":"No Poster","poster_path":null,"vote_average":5.0,"release_date":""}
        ]}"#;
        let movies = provider().decode_list(body).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "155");
        assert_eq!(
            movies[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/qJ2.jpg")
        );
        assert_eq!(movies[0].rating_label(), "8.5");
        assert_eq!(movies[0].year(), "2008");
        assert!(movies[1].poster.is_none());
        assert_eq!(movies[1].year(), "N/A");
    }

    #[test]
    fn test_decode_list_without_results_is_empty() {
        let movies = provider()
            .decode_list(br#"{"status_message":"nothing here"}"#)
            .unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn test_decode_list_rejects_garbage() {
        let err = provider().decode_list(b"<html>").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn test_decode_detail() {
        let body = br#"{"id":155,"title":"The Dark Knight","poster_path":"/qJ2.jpg",
            "vote_average":8.5,"overview":"Batman raises the stakes.","release_date":"2008-07-16",
            "runtime":152,"genres":[{"id":1,"name":"Drama"},{"id":2,"name":"Action"}],
            "credits":{"cast":[{"name":"Christian Bale"},{"name":"Heath Ledger"}],
                       "crew":[{"name":"Christopher Nolan","job":"Director"},{"name":"Hans Zimmer","job":"Original Music Composer"}]}}"#;
        let d = provider().decode_detail(body).unwrap();
        assert_eq!(d.title, "The Dark Knight");
        assert_eq!(d.runtime, "152 min");
        assert_eq!(d.genres, "Drama, Action");
        assert_eq!(d.director, "Christopher Nolan");
        assert_eq!(d.cast, "Christian Bale, Heath Ledger");
        assert_eq!(d.year, "2008");
        assert_eq!(d.rating, "8.5");
    }

    #[test]
    fn test_decode_detail_missing_poster_uses_placeholder() {
        let d = provider()
            .decode_detail(br#"{"id":1,"title":"Bare"}"#)
            .unwrap();
        assert_eq!(d.poster, PLACEHOLDER_POSTER);
        assert_eq!(d.director, "N/A");
        assert_eq!(d.runtime, "N/A");
    }
}

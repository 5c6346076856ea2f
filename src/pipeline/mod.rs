//! Fetch-render pipeline.
//!
//! Each operation issues one or two GET requests through the configured
//! [`Transport`], decodes with the active [`MovieProvider`] and reports back
//! to the UI loop as [`UiEvent`]s. Operations are spawned as independent
//! tokio tasks; nothing cancels or orders them, so when two overlap the one
//! that finishes last owns the results pane.

pub mod messages;

use std::sync::Arc;
use std::sync::mpsc::Sender;

use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::model::MovieSummary;
use crate::provider::{MovieProvider, Transport};
use crate::query::{Request, SearchQuery};
use crate::render::CardLimit;

pub use messages::{DetailEvent, PaneEvent, UiChannels, UiEvent};

pub const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";
pub const NO_RESULTS: &str = "No movies found.";
pub const NO_MATCH_HEADING: &str = "No movies found. Try another search!";
pub const RECOMMEND_ERROR_HEADING: &str = "Error finding recommendations.";
pub const DETAIL_NOT_FOUND: &str = "Movie not found";
pub const DETAIL_ERROR: &str = "Error loading details";

/// Heading shown once the top search match is known.
pub fn because_you_liked(title: &str) -> String {
    format!("Because you liked \"{}\"...", title)
}

#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn MovieProvider>,
    transport: Arc<dyn Transport>,
    tx: Sender<UiEvent>,
    grid_limit: usize,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        transport: Arc<dyn Transport>,
        tx: Sender<UiEvent>,
        grid_limit: usize,
    ) -> Self {
        Self {
            provider,
            transport,
            tx,
            grid_limit,
        }
    }

    pub fn provider(&self) -> &dyn MovieProvider {
        self.provider.as_ref()
    }

    fn pane(&self, event: PaneEvent) {
        // A closed receiver means the UI is shutting down
        let _ = self.tx.send(UiEvent::Pane(event));
    }

    async fn fetch_list(&self, request: &Request) -> AppResult<Vec<MovieSummary>> {
        let body = self.transport.get(request).await?;
        let movies = self.provider.decode_list(&body)?;
        tracing::info!(
            provider = self.provider.name(),
            url = %request.redacted(),
            count = movies.len(),
            "list fetched"
        );
        Ok(movies)
    }

    /// Fetch `request` and render it under `heading`.
    pub async fn run(&self, request: AppResult<Request>, heading: &str) {
        self.pane(PaneEvent::ShowLoader);
        self.pane(PaneEvent::Heading(heading.to_string()));

        let result = match request {
            Ok(ref req) => self.fetch_list(req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(movies) if movies.is_empty() => {
                self.pane(PaneEvent::HideLoader);
                self.pane(PaneEvent::Message(NO_RESULTS.to_string()));
            }
            Ok(movies) => {
                self.pane(PaneEvent::HideLoader);
                self.pane(PaneEvent::Render {
                    movies,
                    limit: CardLimit::First(self.grid_limit),
                });
            }
            Err(e) => {
                tracing::error!(error = %e, transport = e.is_transport(), heading, "fetch failed");
                self.pane(PaneEvent::HideLoader);
                self.pane(PaneEvent::Message(GENERIC_ERROR.to_string()));
            }
        }
    }

    /// Search for `query`, then render recommendations for the top match.
    pub async fn recommend(&self, query: SearchQuery) {
        self.pane(PaneEvent::ShowLoader);

        if let Err(e) = self.recommend_inner(&query).await {
            tracing::error!(
                error = %e,
                transport = e.is_transport(),
                query = query.as_str(),
                "recommendation failed"
            );
            self.pane(PaneEvent::HideLoader);
            self.pane(PaneEvent::Heading(RECOMMEND_ERROR_HEADING.to_string()));
        }
    }

    async fn recommend_inner(&self, query: &SearchQuery) -> AppResult<()> {
        let search = self.provider.search(query)?;
        let matches = self.fetch_list(&search).await?;

        let Some(best) = matches.first() else {
            self.pane(PaneEvent::HideLoader);
            self.pane(PaneEvent::Heading(NO_MATCH_HEADING.to_string()));
            self.pane(PaneEvent::Clear);
            return Ok(());
        };

        // Applied before the dependent request resolves and not reverted
        // if it fails
        self.pane(PaneEvent::Heading(because_you_liked(&best.title)));

        let rec_request = self.provider.recommendations(best)?;
        let recommendations = self.fetch_list(&rec_request).await?;

        self.pane(PaneEvent::HideLoader);
        self.pane(PaneEvent::Render {
            movies: recommendations,
            limit: CardLimit::First(self.grid_limit),
        });
        Ok(())
    }

    /// Fetch the extended record for the detail modal.
    pub async fn detail(&self, id: String) {
        let result = match self.provider.detail(&id) {
            Ok(req) => match self.transport.get(&req).await {
                Ok(body) => self.provider.decode_detail(&body),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        let event = match result {
            Ok(detail) => DetailEvent::Loaded { id, detail },
            Err(e) => {
                tracing::warn!(error = %e, id = %id, "detail lookup failed");
                let title = match e {
                    AppError::NotFound(_) => DETAIL_NOT_FOUND,
                    _ => DETAIL_ERROR,
                };
                DetailEvent::Failed {
                    id,
                    title: title.to_string(),
                }
            }
        };
        let _ = self.tx.send(UiEvent::Detail(event));
    }

    pub fn spawn_run(&self, request: AppResult<Request>, heading: String) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.run(request, &heading).await })
    }

    pub fn spawn_recommend(&self, query: SearchQuery) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.recommend(query).await })
    }

    pub fn spawn_detail(&self, id: String) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.detail(id).await })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::{AppError, AppResult};
    use crate::provider::Transport;
    use crate::query::Request;

    /// Canned answers keyed by request path plus the searched term, if any.
    #[derive(Default)]
    pub struct CannedTransport {
        responses: HashMap<String, Result<String, u16>>,
        pub calls: Mutex<Vec<String>>,
    }

    pub fn key_of(request: &Request) -> String {
        match request.param("query").or_else(|| request.param("s")) {
            Some(q) => format!("{}?{}", request.url.path(), q),
            None => request.url.path().to_string(),
        }
    }

    impl CannedTransport {
        pub fn ok(mut self, key: &str, body: &str) -> Self {
            self.responses.insert(key.to_string(), Ok(body.to_string()));
            self
        }

        pub fn status(mut self, key: &str, status: u16) -> Self {
            self.responses.insert(key.to_string(), Err(status));
            self
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, request: &Request) -> AppResult<Vec<u8>> {
            let key = key_of(request);
            self.calls.lock().unwrap().push(key.clone());
            match self.responses.get(&key) {
                Some(Ok(body)) => Ok(body.clone().into_bytes()),
                Some(Err(404)) => Err(AppError::NotFound(key)),
                Some(Err(status)) => Err(AppError::Status {
                    status: *status,
                    url: key,
                }),
                None => Err(AppError::Status { status: 599, url: key }),
            }
        }
    }
}

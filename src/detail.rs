use crate::model::MovieDetail;
use crate::pipeline::DetailEvent;

const LOADING: &str = "Loading...";

/// Fields displayed by the detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
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

impl DetailFields {
    fn loading() -> Self {
        Self {
            title: LOADING.to_string(),
            poster: String::new(),
            rating: String::new(),
            plot: String::new(),
            year: String::new(),
            runtime: String::new(),
            genres: String::new(),
            director: String::new(),
            cast: String::new(),
        }
    }

    fn error(title: String) -> Self {
        Self {
            title,
            ..Self::blank()
        }
    }

    fn blank() -> Self {
        Self {
            title: String::new(),
            ..Self::loading()
        }
    }

    /// Labelled metadata lines in display order.
    pub fn metadata(&self) -> [(&'static str, &str); 5] {
        [
            ("Year", self.year.as_str()),
            ("Runtime", self.runtime.as_str()),
            ("Genre", self.genres.as_str()),
            ("Director", self.director.as_str()),
            ("Cast", self.cast.as_str()),
        ]
    }
}

impl From<MovieDetail> for DetailFields {
    fn from(d: MovieDetail) -> Self {
        Self {
            title: d.title,
            poster: d.poster,
            rating: d.rating,
            plot: d.plot,
            year: d.year,
            runtime: d.runtime,
            genres: d.genres,
            director: d.director,
            cast: d.cast,
        }
    }
}

/// Open/closed state of the detail modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailModal {
    #[default]
    Closed,
    Open {
        id: String,
        loading: bool,
        fields: DetailFields,
        scroll: u16,
    },
}

impl DetailModal {
    /// Open for `id` with every field reset to the loading placeholder.
    /// The caller issues the fetch.
    pub fn open(id: &str) -> Self {
        Self::Open {
            id: id.to_string(),
            loading: true,
            fields: DetailFields::loading(),
            scroll: 0,
        }
    }

    pub fn close(self) -> Self {
        Self::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Apply a lookup result. Results for an id other than the one on
    /// display are dropped.
    pub fn apply(self, event: DetailEvent) -> Self {
        let current = match &self {
            Self::Open { id, .. } => id.clone(),
            Self::Closed => return self,
        };
        match event {
            DetailEvent::Loaded { id: for_id, detail } if for_id == current => Self::Open {
                id: for_id,
                loading: false,
                fields: detail.into(),
                scroll: 0,
            },
            DetailEvent::Failed { id: for_id, title } if for_id == current => Self::Open {
                id: for_id,
                loading: false,
                fields: DetailFields::error(title),
                scroll: 0,
            },
            _ => self,
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        if let Self::Open { scroll, .. } = self {
            *scroll = if delta < 0 {
                scroll.saturating_sub(delta.unsigned_abs() as u16)
            } else {
                scroll.saturating_add(delta as u16)
            };
        }
    }
}

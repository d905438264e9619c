//! Leaderboard scraping.
//!
//! Parsing is split from retrieval: `team` and `event` hold pure HTML
//! parsers, while the source traits below describe what the aggregator
//! needs from the leaderboard site. `CtftimeClient` implements them over
//! HTTP.

pub mod event;
pub mod team;

use async_trait::async_trait;
use scraper::Selector;
use thiserror::Error;
use url::Url;

use crate::fetch::{FetchError, Fetcher};
use crate::models::EventRecord;

pub use event::parse_event_weight;
pub use team::parse_team_events;

/// Errors from fetching a leaderboard page, tagged with the requested id.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("team {team_id}: {source}")]
    Team {
        team_id: String,
        #[source]
        source: FetchError,
    },

    #[error("event {event_id}: {source}")]
    Event {
        event_id: String,
        #[source]
        source: FetchError,
    },
}

impl ScrapeError {
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            ScrapeError::Team { source, .. } | ScrapeError::Event { source, .. } => source,
        }
    }
}

/// Provides a team's historical event results.
#[async_trait]
pub trait TeamEventSource: Send + Sync {
    /// Fetch a team's events, highest rating first.
    async fn fetch_team_events(&self, team_id: &str) -> Result<Vec<EventRecord>, ScrapeError>;
}

/// Provides per-event rating weights.
#[async_trait]
pub trait EventWeightSource: Send + Sync {
    /// Fetch an event's rating weight, `None` when the page has none.
    async fn fetch_event_weight(&self, event_id: &str) -> Result<Option<f64>, ScrapeError>;

    /// Public link to an event's page.
    fn event_link(&self, event_id: &str) -> String;
}

/// Everything the aggregation layer needs from the leaderboard site.
pub trait LeaderboardSource: TeamEventSource + EventWeightSource {}

impl<T: TeamEventSource + EventWeightSource> LeaderboardSource for T {}

/// HTTP client for the CTFtime leaderboard.
#[derive(Debug, Clone)]
pub struct CtftimeClient {
    fetcher: Fetcher,
    base_url: Url,
}

impl CtftimeClient {
    pub fn new(fetcher: Fetcher, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { fetcher, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn page_url(&self, kind: &str, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(kind)
            .push(id);
        Ok(url)
    }

    pub fn team_url(&self, team_id: &str) -> Result<Url, FetchError> {
        self.page_url("team", team_id)
    }

    pub fn event_url(&self, event_id: &str) -> Result<Url, FetchError> {
        self.page_url("event", event_id)
    }
}

#[async_trait]
impl TeamEventSource for CtftimeClient {
    async fn fetch_team_events(&self, team_id: &str) -> Result<Vec<EventRecord>, ScrapeError> {
        let tag = |source| ScrapeError::Team {
            team_id: team_id.to_string(),
            source,
        };
        let url = self.team_url(team_id).map_err(tag)?;
        let html = self.fetcher.fetch_text(&url).await.map_err(tag)?;
        Ok(parse_team_events(&html, &self.base_url))
    }
}

#[async_trait]
impl EventWeightSource for CtftimeClient {
    async fn fetch_event_weight(&self, event_id: &str) -> Result<Option<f64>, ScrapeError> {
        let tag = |source| ScrapeError::Event {
            event_id: event_id.to_string(),
            source,
        };
        let url = self.event_url(event_id).map_err(tag)?;
        let html = self.fetcher.fetch_text(&url).await.map_err(tag)?;
        Ok(parse_event_weight(&html))
    }

    fn event_link(&self, event_id: &str) -> String {
        match self.event_url(event_id) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}event/{}", self.base_url, event_id),
        }
    }
}

/// Build a selector from a static CSS string.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

/// In-memory leaderboard for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct StaticLeaderboard {
        pub teams: HashMap<String, Vec<EventRecord>>,
        pub weights: HashMap<String, f64>,
        pub failing_events: Vec<String>,
        pub weight_calls: Mutex<Vec<String>>,
    }

    impl StaticLeaderboard {
        pub fn with_team(mut self, team_id: &str, events: Vec<EventRecord>) -> Self {
            self.teams.insert(team_id.to_string(), events);
            self
        }

        pub fn with_weight(mut self, event_id: &str, weight: f64) -> Self {
            self.weights.insert(event_id.to_string(), weight);
            self
        }

        pub fn with_failing_event(mut self, event_id: &str) -> Self {
            self.failing_events.push(event_id.to_string());
            self
        }

        pub fn weight_calls(&self) -> Vec<String> {
            self.weight_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TeamEventSource for StaticLeaderboard {
        async fn fetch_team_events(
            &self,
            team_id: &str,
        ) -> Result<Vec<EventRecord>, ScrapeError> {
            self.teams
                .get(team_id)
                .cloned()
                .ok_or_else(|| ScrapeError::Team {
                    team_id: team_id.to_string(),
                    source: FetchError::HttpStatus {
                        status: 404,
                        message: "Not Found".to_string(),
                    },
                })
        }
    }

    #[async_trait]
    impl EventWeightSource for StaticLeaderboard {
        async fn fetch_event_weight(&self, event_id: &str) -> Result<Option<f64>, ScrapeError> {
            self.weight_calls.lock().unwrap().push(event_id.to_string());
            if self.failing_events.iter().any(|e| e == event_id) {
                return Err(ScrapeError::Event {
                    event_id: event_id.to_string(),
                    source: FetchError::HttpStatus {
                        status: 503,
                        message: "Service Unavailable".to_string(),
                    },
                });
            }
            Ok(self.weights.get(event_id).copied())
        }

        fn event_link(&self, event_id: &str) -> String {
            format!("https://ctftime.org/event/{}", event_id)
        }
    }
}

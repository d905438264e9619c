//! Top-N aggregation of team ratings.
//!
//! Both modes sort by rating points before slicing, so callers may pass
//! events in any order. Equal ratings keep their input order.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{sort_by_rating_desc, EventRecord, HostedSummary, TeamSummary, HOST_PLACE};
use crate::scrape::{EventWeightSource, LeaderboardSource, ScrapeError};

/// Multiplier applied to an event's weight to credit its hosting team.
pub const HOSTED_WEIGHT_MULTIPLIER: f64 = 2.0;

fn take_top(mut events: Vec<EventRecord>, top_n: i64) -> TeamSummary {
    sort_by_rating_desc(&mut events);
    events.truncate(top_n.max(0) as usize);
    TeamSummary::from_top(events)
}

/// Select the `top_n` highest-rated events and total their points.
///
/// With `exclude_hosted`, events the team organized are dropped first.
pub fn summarize(events: &[EventRecord], top_n: i64, exclude_hosted: bool) -> TeamSummary {
    let filtered = events
        .iter()
        .filter(|e| !exclude_hosted || !e.is_hosted)
        .cloned()
        .collect();
    take_top(filtered, top_n)
}

/// Build the synthetic record standing in for a hosted event.
pub fn hosted_event_record(event_id: &str, weight: f64, link: String) -> EventRecord {
    EventRecord {
        place: HOST_PLACE.to_string(),
        name: format!("Your hosted event - {}", event_id),
        rating_points: HOSTED_WEIGHT_MULTIPLIER * weight,
        is_hosted: true,
        link: Some(link),
    }
}

/// Rank a team's non-hosted events, optionally adding one hosted event.
///
/// The baseline excludes every hosted event. When `include_hosted` is set
/// and an event id is given, that event's weight is fetched and a synthetic
/// record worth twice the weight competes with the baseline events for the
/// top slots. A missing weight or a failed fetch falls back to the baseline;
/// a failure is reported through `warning` rather than as an error.
pub async fn summarize_with_hosted_option<W: EventWeightSource + ?Sized>(
    weights: &W,
    events: &[EventRecord],
    top_n: i64,
    event_id: Option<&str>,
    include_hosted: bool,
) -> HostedSummary {
    let base_events: Vec<EventRecord> = events.iter().filter(|e| !e.is_hosted).cloned().collect();
    let baseline = take_top(base_events.clone(), top_n);

    let event_id = event_id.map(str::trim).filter(|id| !id.is_empty());
    let Some(event_id) = event_id.filter(|_| include_hosted) else {
        return HostedSummary::baseline(baseline);
    };

    let weight = match weights.fetch_event_weight(event_id).await {
        Ok(Some(weight)) => weight,
        Ok(None) => {
            info!("No rating weight found for event {}, using baseline", event_id);
            return HostedSummary::baseline(baseline);
        }
        Err(e) => {
            warn!("Falling back to baseline: {}", e);
            return HostedSummary {
                warning: Some(format!("Failed to fetch event weight: {}", e)),
                ..HostedSummary::baseline(baseline)
            };
        }
    };

    let hosted = hosted_event_record(event_id, weight, weights.event_link(event_id));
    let hosted_points = hosted.rating_points;

    let mut candidates = base_events;
    candidates.push(hosted);

    HostedSummary {
        summary: take_top(candidates, top_n),
        hosted_weight: Some(weight),
        hosted_points: Some(hosted_points),
        warning: None,
    }
}

/// Everything shown for one team lookup.
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team_id: String,

    /// All scraped events, highest rating first
    pub events: Vec<EventRecord>,

    #[serde(flatten)]
    pub ranking: HostedSummary,
}

/// Fetch a team's events and rank them.
///
/// Only the team page fetch can fail; weight problems end up in the
/// report's warning.
pub async fn team_report<S: LeaderboardSource + ?Sized>(
    source: &S,
    team_id: &str,
    top_n: i64,
    event_id: Option<&str>,
    include_hosted: bool,
) -> Result<TeamReport, ScrapeError> {
    let team_id = team_id.trim();
    let events = source.fetch_team_events(team_id).await?;
    info!("Team {}: {} events", team_id, events.len());

    let ranking =
        summarize_with_hosted_option(source, &events, top_n, event_id, include_hosted).await;

    Ok(TeamReport {
        team_id: team_id.to_string(),
        events,
        ranking,
    })
}

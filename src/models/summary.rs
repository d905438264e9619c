//! Aggregation result models.

use serde::Serialize;

use super::EventRecord;

/// Top-N selection of a team's events and their summed rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSummary {
    pub top: Vec<EventRecord>,
    pub total: f64,
}

impl TeamSummary {
    /// Build a summary from an already-selected top slice.
    pub fn from_top(top: Vec<EventRecord>) -> Self {
        let total = top.iter().fold(0.0, |acc, e| acc + e.rating_points);
        Self { top, total }
    }
}

/// Result of the hosted-substitution mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostedSummary {
    #[serde(flatten)]
    pub summary: TeamSummary,

    /// Weight fetched for the hosted event, when one was found
    #[serde(rename = "event_weight")]
    pub hosted_weight: Option<f64>,

    /// Points credited to the synthetic hosted record (2 x weight)
    pub hosted_points: Option<f64>,

    /// Non-fatal problem encountered while fetching the weight
    pub warning: Option<String>,
}

impl HostedSummary {
    pub fn baseline(summary: TeamSummary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    pub fn top(&self) -> &[EventRecord] {
        &self.summary.top
    }

    pub fn total(&self) -> f64 {
        self.summary.total
    }
}

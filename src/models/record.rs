//! Event record model.

use serde::{Deserialize, Serialize};

/// Place marker used for synthetic hosted entries.
pub const HOST_PLACE: &str = "host";

/// One historical event result from a team's leaderboard profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Final place as printed on the page, or `"host"` for synthetic entries
    pub place: String,

    /// Event title
    #[serde(rename = "event_name")]
    pub name: String,

    /// Rating points earned, with any hosted marker already stripped
    pub rating_points: f64,

    /// Whether the team organized this event
    pub is_hosted: bool,

    /// Link to the event page, when the row carried one
    #[serde(rename = "event_link")]
    pub link: Option<String>,
}

impl EventRecord {
    /// Create a record for a regular (non-hosted) result.
    pub fn new(place: impl Into<String>, name: impl Into<String>, rating_points: f64) -> Self {
        Self {
            place: place.into(),
            name: name.into(),
            rating_points,
            is_hosted: false,
            link: None,
        }
    }

    /// Builder method to mark the record as hosted.
    pub fn hosted(mut self) -> Self {
        self.is_hosted = true;
        self
    }

    /// Builder method to attach an event link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// True for records synthesized from a hosted event's weight.
    pub fn is_synthetic(&self) -> bool {
        self.place == HOST_PLACE
    }

    /// Suffix for text tables: projected hosted rows are spelled out,
    /// scraped hosted rows keep the leaderboard's `*`.
    pub fn table_marker(&self) -> &'static str {
        if self.is_synthetic() {
            " (hosted, projected)"
        } else if self.is_hosted {
            " *"
        } else {
            ""
        }
    }
}

/// Sort records by rating points, highest first.
///
/// The sort is stable, so records with equal points keep their input order.
pub fn sort_by_rating_desc(records: &mut [EventRecord]) {
    records.sort_by(|a, b| b.rating_points.total_cmp(&a.rating_points));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = EventRecord::new("3", "Some CTF 2024", 21.5)
            .hosted()
            .with_link("https://ctftime.org/event/1");

        assert_eq!(record.place, "3");
        assert!(record.is_hosted);
        assert_eq!(record.link.as_deref(), Some("https://ctftime.org/event/1"));
        assert!(!record.is_synthetic());
    }

    #[test]
    fn test_table_marker() {
        let projected = EventRecord::new(HOST_PLACE, "Home CTF", 60.0).hosted();
        let scraped = EventRecord::new("1", "Home CTF 2023", 12.0).hosted();
        let played = EventRecord::new("4", "Quals", 20.0);

        assert_eq!(projected.table_marker(), " (hosted, projected)");
        assert_eq!(scraped.table_marker(), " *");
        assert_eq!(played.table_marker(), "");
    }

    #[test]
    fn test_sort_by_rating_desc_is_stable() {
        let mut records = vec![
            EventRecord::new("1", "a", 10.0),
            EventRecord::new("2", "b", 30.0),
            EventRecord::new("3", "c", 10.0),
            EventRecord::new("4", "d", 20.0),
        ];

        sort_by_rating_desc(&mut records);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_record_serialization_field_names() {
        let record = EventRecord::new("7", "Quals", 12.25).with_link("/event/9");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["event_name"], "Quals");
        assert_eq!(json["rating_points"], 12.25);
        assert_eq!(json["is_hosted"], false);
        assert_eq!(json["event_link"], "/event/9");
    }
}

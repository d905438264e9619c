//! Team profile page parsing.
//!
//! The team page lists past results in the first `table.table-striped`.
//! After the header row, each result row has five cells:
//! `(unused, place, event name + link, unused, rating[*])`.
//! A trailing `*` on the rating marks an event the team hosted.

use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use super::selector;
use crate::models::{sort_by_rating_desc, EventRecord};

const EXPECTED_CELLS: usize = 5;
const HOSTED_MARKER: char = '*';

/// Parse a team profile page into event records, highest rating first.
///
/// A page without the results table yields no records. Rows with the wrong
/// cell count or an unparsable rating are skipped. Relative event links are
/// resolved against `base_url`.
pub fn parse_team_events(html: &str, base_url: &Url) -> Vec<EventRecord> {
    let document = Html::parse_document(html);

    let table_sel = selector("table.table-striped");
    let row_sel = selector("tr");
    let cell_sel = selector("td");
    let link_sel = selector("a[href]");

    let Some(table) = document.select(&table_sel).next() else {
        debug!("No results table on team page");
        return Vec::new();
    };

    let mut events = Vec::new();

    for (index, row) in table.select(&row_sel).enumerate().skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() != EXPECTED_CELLS {
            debug!("Skipping row {}: {} cells", index, cells.len());
            continue;
        }

        let rating_raw = cell_text(&cells[4]);
        let Some(rating_points) = parse_rating(&rating_raw) else {
            debug!("Skipping row {}: unparsable rating {:?}", index, rating_raw);
            continue;
        };

        let place = cell_text(&cells[1]);
        let name = normalize_whitespace(&cells[2].text().collect::<String>());
        let link = cells[2]
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_link(base_url, href));

        events.push(EventRecord {
            place,
            name,
            rating_points,
            is_hosted: rating_raw.contains(HOSTED_MARKER),
            link,
        });
    }

    sort_by_rating_desc(&mut events);
    events
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse rating text, ignoring the hosted marker.
fn parse_rating(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(HOSTED_MARKER, "");
    let value: f64 = cleaned.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn resolve_link(base_url: &Url, href: &str) -> String {
    match base_url.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

//! Event detail page parsing.

use scraper::Html;

use super::selector;

const WEIGHT_PREFIX: &str = "rating weight:";

/// Extract the rating weight from an event page.
///
/// Looks for the first `<p>` whose text starts with `Rating weight:`
/// (case-insensitive) and keeps only the digits and dots after the colon,
/// e.g. `Rating weight: 23.71` gives `23.71`.
pub fn parse_event_weight(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);
    let paragraph_sel = selector("p");

    document
        .select(&paragraph_sel)
        .map(|p| p.text().collect::<String>())
        .filter(|text| text.trim().to_lowercase().starts_with(WEIGHT_PREFIX))
        .find_map(|text| weight_from_text(text.trim()))
}

fn weight_from_text(text: &str) -> Option<f64> {
    let (_, after_colon) = text.split_once(':')?;
    let number: String = after_colon
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if number.is_empty() {
        return None;
    }
    number.parse().ok()
}

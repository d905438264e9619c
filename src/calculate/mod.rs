//! Event rating calculation.
//!
//! Implements the CTFtime per-event rating formula and the typed form
//! layer that turns raw user input into formula arguments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid user-supplied input for the rating formula.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ValidationError {
    /// Message shown to users; the field detail stays in logs.
    pub fn user_message(&self) -> &'static str {
        "Please provide valid numeric inputs."
    }
}

/// Calculate the rating a team earns for a single event.
///
/// A team with no positive points ratio earns nothing, regardless of place.
/// A non-positive `total_teams` also yields zero. Negative places are not
/// range-checked and pass straight through the arithmetic.
pub fn rate(
    weight: f64,
    total_teams: i64,
    best_points: f64,
    team_place: i64,
    team_points: f64,
) -> f64 {
    let points_coef = if best_points > 0.0 {
        team_points / best_points
    } else {
        0.0
    };
    let place_coef = if team_place > 0 {
        1.0 / team_place as f64
    } else {
        0.0
    };

    if points_coef <= 0.0 {
        return 0.0;
    }

    let denom = if total_teams > 0 {
        1.0 / (1.0 + team_place as f64 / total_teams as f64)
    } else {
        0.0
    };
    if denom == 0.0 {
        return 0.0;
    }

    ((points_coef + place_coef) * weight) / denom
}

/// Parsed formula arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingInputs {
    pub weight: f64,
    pub total_teams: i64,
    pub best_points: f64,
    pub team_place: i64,
    pub team_points: f64,
}

impl RatingInputs {
    pub fn rate(&self) -> f64 {
        rate(
            self.weight,
            self.total_teams,
            self.best_points,
            self.team_place,
            self.team_points,
        )
    }
}

/// A submitted form value: raw text, a JSON number or a JSON bool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormField {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FormField {
    pub(crate) fn as_text(&self) -> String {
        match self {
            FormField::Bool(b) => b.to_string(),
            FormField::Number(n) => n.to_string(),
            FormField::Text(s) => s.trim().to_string(),
        }
    }

    /// Checkbox semantics: any non-empty value other than `false`/`0` is set.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormField::Bool(b) => *b,
            FormField::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FormField::Text(s) => {
                let s = s.trim();
                !s.is_empty() && !s.eq_ignore_ascii_case("false") && s != "0"
            }
        }
    }
}

impl From<&str> for FormField {
    fn from(s: &str) -> Self {
        FormField::Text(s.to_string())
    }
}

/// Raw rating form as submitted by a user.
///
/// Missing or blank fields default to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingForm {
    #[serde(default)]
    pub weight: Option<FormField>,
    #[serde(default)]
    pub total_teams: Option<FormField>,
    #[serde(default)]
    pub best_points: Option<FormField>,
    #[serde(default)]
    pub team_place: Option<FormField>,
    #[serde(default)]
    pub team_points: Option<FormField>,
}

impl RatingForm {
    /// Validate every field and produce formula arguments.
    pub fn parse(&self) -> Result<RatingInputs, ValidationError> {
        Ok(RatingInputs {
            weight: parse_float("weight", self.weight.as_ref())?,
            total_teams: parse_int("total_teams", self.total_teams.as_ref())?,
            best_points: parse_float("best_points", self.best_points.as_ref())?,
            team_place: parse_int("team_place", self.team_place.as_ref())?,
            team_points: parse_float("team_points", self.team_points.as_ref())?,
        })
    }
}

fn parse_float(field: &'static str, value: Option<&FormField>) -> Result<f64, ValidationError> {
    let Some(text) = value.map(FormField::as_text) else {
        return Ok(0.0);
    };
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse()
        .map_err(|_| ValidationError::InvalidNumber { field, value: text })
}

fn parse_int(field: &'static str, value: Option<&FormField>) -> Result<i64, ValidationError> {
    let Some(text) = value.map(FormField::as_text) else {
        return Ok(0);
    };
    if text.is_empty() {
        return Ok(0);
    }
    text.parse()
        .map_err(|_| ValidationError::InvalidNumber { field, value: text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: [&str; 5]) -> RatingForm {
        RatingForm {
            weight: Some(fields[0].into()),
            total_teams: Some(fields[1].into()),
            best_points: Some(fields[2].into()),
            team_place: Some(fields[3].into()),
            team_points: Some(fields[4].into()),
        }
    }

    #[test]
    fn test_rate_reference_value() {
        let expected = ((750.0 / 1000.0 + 1.0 / 10.0) * 50.0) / (1.0 / (1.0 + 10.0 / 100.0));
        let rating = rate(50.0, 100, 1000.0, 10, 750.0);

        assert_eq!(rating, expected);
        assert!((rating - 46.75).abs() < 1e-9);
    }

    #[test]
    fn test_rate_zero_best_points() {
        assert_eq!(rate(50.0, 100, 0.0, 10, 750.0), 0.0);
        assert_eq!(rate(50.0, 100, -5.0, 10, 750.0), 0.0);
    }

    #[test]
    fn test_rate_zero_team_points_even_in_first_place() {
        assert_eq!(rate(50.0, 100, 1000.0, 1, 0.0), 0.0);
    }

    #[test]
    fn test_rate_zero_total_teams() {
        assert_eq!(rate(50.0, 0, 1000.0, 10, 750.0), 0.0);
        assert_eq!(rate(50.0, -3, 1000.0, 10, 750.0), 0.0);
    }

    #[test]
    fn test_rate_zero_place_drops_place_coefficient() {
        // place 0: no place credit, denominator is 1
        let rating = rate(10.0, 100, 100.0, 0, 50.0);
        assert!((rating - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_negative_place_passes_through() {
        // Not range-checked: just follows the arithmetic.
        let expected = ((50.0 / 100.0) * 10.0) / (1.0 / (1.0 + -5.0 / 100.0));
        assert_eq!(rate(10.0, 100, 100.0, -5, 50.0), expected);
    }

    #[test]
    fn test_rate_first_place_full_points() {
        // (1 + 1) * 20 * (1 + 1/10)
        let rating = rate(20.0, 10, 500.0, 1, 500.0);
        assert!((rating - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_form_parse() {
        let inputs = form(["50", "100", "1000", "10", "750"]).parse().unwrap();
        assert_eq!(
            inputs,
            RatingInputs {
                weight: 50.0,
                total_teams: 100,
                best_points: 1000.0,
                team_place: 10,
                team_points: 750.0,
            }
        );
        assert_eq!(inputs.rate(), rate(50.0, 100, 1000.0, 10, 750.0));
    }

    #[test]
    fn test_form_blank_fields_default_to_zero() {
        let inputs = form(["", " ", "", "", ""]).parse().unwrap();
        assert_eq!(inputs, RatingInputs::default());

        let inputs = RatingForm::default().parse().unwrap();
        assert_eq!(inputs, RatingInputs::default());
    }

    #[test]
    fn test_form_invalid_number() {
        let err = form(["abc", "100", "1000", "10", "750"]).parse().unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: "weight",
                value: "abc".to_string()
            }
        );
        assert_eq!(err.user_message(), "Please provide valid numeric inputs.");
    }

    #[test]
    fn test_form_fractional_place_rejected() {
        let err = form(["50", "100", "1000", "2.5", "750"]).parse().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidNumber {
                field: "team_place",
                ..
            }
        ));
    }

    #[test]
    fn test_form_field_truthiness() {
        let field = |json: &str| serde_json::from_str::<FormField>(json).unwrap();

        assert!(field("true").is_truthy());
        assert!(field(r#""on""#).is_truthy());
        assert!(field("1").is_truthy());
        assert!(!field("false").is_truthy());
        assert!(!field(r#""false""#).is_truthy());
        assert!(!field(r#"" ""#).is_truthy());
        assert!(!field("0").is_truthy());
    }

    #[test]
    fn test_form_bool_is_not_a_number() {
        let form: RatingForm = serde_json::from_str(r#"{"weight": true}"#).unwrap();

        assert!(matches!(
            form.parse(),
            Err(ValidationError::InvalidNumber { field: "weight", .. })
        ));
    }

    #[test]
    fn test_form_from_json_numbers() {
        let form: RatingForm = serde_json::from_str(
            r#"{"weight": 50, "total_teams": "100", "best_points": 1000.5, "team_place": 10}"#,
        )
        .unwrap();
        let inputs = form.parse().unwrap();

        assert_eq!(inputs.weight, 50.0);
        assert_eq!(inputs.total_teams, 100);
        assert_eq!(inputs.best_points, 1000.5);
        assert_eq!(inputs.team_place, 10);
        assert_eq!(inputs.team_points, 0.0);
    }
}

//! Validation of raw request fields into typed movie attributes.

use crate::features::{encode, FeatureVector, GenreSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_TITLE: &str = "Unknown Movie";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field '{field}' must be greater than 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// A numeric field as submitted: JSON clients send numbers, form-style
/// clients send text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionRequest {
    pub title: Option<String>,
    pub distributor: Option<String>,
    pub mpaa: Option<String>,
    pub opening_theaters: Option<NumberOrText>,
    pub release_days: Option<NumberOrText>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputPolicy {
    /// Reject `<= 0` theater and day counts instead of letting them encode
    /// to 0.
    pub reject_non_positive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieAttributes {
    pub title: String,
    pub distributor: String,
    pub mpaa: String,
    pub opening_theaters: f64,
    pub release_days: f64,
    /// Tags as submitted, kept for display.
    pub genre_tags: Vec<String>,
    pub genres: GenreSet,
}

impl MovieAttributes {
    pub fn encode(&self) -> FeatureVector {
        encode(
            &self.title,
            &self.distributor,
            &self.mpaa,
            self.opening_theaters,
            self.release_days,
            &self.genres,
        )
    }
}

fn required_label(field: &'static str, value: &Option<String>) -> Result<String, InputError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(InputError::MissingField(field)),
    }
}

fn parse_number(field: &'static str, raw: &NumberOrText) -> Result<f64, InputError> {
    let value = match raw {
        NumberOrText::Number(n) => *n,
        NumberOrText::Text(text) => {
            let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return Err(InputError::MissingField(field));
            }
            cleaned
                .parse::<f64>()
                .map_err(|_| InputError::InvalidNumber {
                    field,
                    value: text.clone(),
                })?
        }
    };
    if !value.is_finite() {
        return Err(InputError::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn required_number(
    field: &'static str,
    value: &Option<NumberOrText>,
    policy: InputPolicy,
) -> Result<f64, InputError> {
    let raw = value.as_ref().ok_or(InputError::MissingField(field))?;
    let number = parse_number(field, raw)?;
    if policy.reject_non_positive && number <= 0.0 {
        return Err(InputError::NonPositive {
            field,
            value: number,
        });
    }
    Ok(number)
}

impl PredictionRequest {
    pub fn parse(&self, policy: InputPolicy) -> Result<MovieAttributes, InputError> {
        let title = match &self.title {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => DEFAULT_TITLE.to_string(),
        };
        let ignored = GenreSet::unrecognized(&self.genres);
        if !ignored.is_empty() {
            warn!("Ignoring unrecognized genres {:?} for {:?}", ignored, title);
        }
        Ok(MovieAttributes {
            title,
            distributor: required_label("distributor", &self.distributor)?,
            mpaa: required_label("mpaa", &self.mpaa)?,
            opening_theaters: required_number("opening_theaters", &self.opening_theaters, policy)?,
            release_days: required_number("release_days", &self.release_days, policy)?,
            genre_tags: self.genres.clone(),
            genres: GenreSet::from_tags(&self.genres),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Genre;

    fn make_request() -> PredictionRequest {
        PredictionRequest {
            title: Some("Frozen".to_string()),
            distributor: Some("Walt Disney Studios".to_string()),
            mpaa: Some("PG".to_string()),
            opening_theaters: Some(NumberOrText::Number(3742.0)),
            release_days: Some(NumberOrText::Text("120".to_string())),
            genres: vec!["animation".to_string(), "comedy".to_string()],
        }
    }

    #[test]
    fn test_parse_valid_request() {
        let attrs = make_request().parse(InputPolicy::default()).unwrap();
        assert_eq!(attrs.title, "Frozen");
        assert_eq!(attrs.opening_theaters, 3742.0);
        assert_eq!(attrs.release_days, 120.0);
        assert!(attrs.genres.contains(Genre::Animation));
        assert!(attrs.genres.contains(Genre::Comedy));
        assert_eq!(attrs.encode().distributor(), 3.0);
    }

    #[test]
    fn test_title_defaults() {
        let mut request = make_request();
        request.title = None;
        assert_eq!(request.parse(InputPolicy::default()).unwrap().title, DEFAULT_TITLE);
        request.title = Some("   ".to_string());
        assert_eq!(request.parse(InputPolicy::default()).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_missing_fields() {
        let mut request = make_request();
        request.distributor = None;
        assert_eq!(
            request.parse(InputPolicy::default()),
            Err(InputError::MissingField("distributor"))
        );

        let mut request = make_request();
        request.mpaa = Some("".to_string());
        assert_eq!(
            request.parse(InputPolicy::default()),
            Err(InputError::MissingField("mpaa"))
        );

        let mut request = make_request();
        request.release_days = None;
        assert_eq!(
            request.parse(InputPolicy::default()),
            Err(InputError::MissingField("release_days"))
        );
    }

    #[test]
    fn test_thousands_separators_accepted() {
        let mut request = make_request();
        request.opening_theaters = Some(NumberOrText::Text(" 4,000 ".to_string()));
        let attrs = request.parse(InputPolicy::default()).unwrap();
        assert_eq!(attrs.opening_theaters, 4000.0);
    }

    #[test]
    fn test_invalid_numbers() {
        let mut request = make_request();
        request.opening_theaters = Some(NumberOrText::Text("lots".to_string()));
        assert_eq!(
            request.parse(InputPolicy::default()),
            Err(InputError::InvalidNumber {
                field: "opening_theaters",
                value: "lots".to_string()
            })
        );

        let mut request = make_request();
        request.release_days = Some(NumberOrText::Text("NaN".to_string()));
        assert!(matches!(
            request.parse(InputPolicy::default()),
            Err(InputError::InvalidNumber {
                field: "release_days",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_allowed_by_default() {
        let mut request = make_request();
        request.opening_theaters = Some(NumberOrText::Number(0.0));
        let attrs = request.parse(InputPolicy::default()).unwrap();
        assert_eq!(attrs.encode().opening_theaters(), 0.0);
    }

    #[test]
    fn test_non_positive_rejected_in_strict_mode() {
        let policy = InputPolicy {
            reject_non_positive: true,
        };
        let mut request = make_request();
        request.release_days = Some(NumberOrText::Number(-3.0));
        assert_eq!(
            request.parse(policy),
            Err(InputError::NonPositive {
                field: "release_days",
                value: -3.0
            })
        );
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        let mut request = make_request();
        request.distributor = Some("Neon".to_string());
        let attrs = request.parse(InputPolicy::default()).unwrap();
        assert_eq!(attrs.distributor, "Neon");
        assert_eq!(attrs.encode().distributor(), 0.0);
    }

    #[test]
    fn test_deserialize_mixed_json() {
        let request: PredictionRequest = serde_json::from_str(
            r#"{ "distributor": "MGM", "mpaa": "R", "opening_theaters": "2,500",
                 "release_days": 45, "genres": ["horror", "thriller"] }"#,
        )
        .unwrap();
        assert_eq!(request.title, None);
        assert_eq!(
            request.opening_theaters,
            Some(NumberOrText::Text("2,500".to_string()))
        );
        assert_eq!(request.release_days, Some(NumberOrText::Number(45.0)));
        let attrs = request.parse(InputPolicy::default()).unwrap();
        assert_eq!(attrs.genres.len(), 2);
    }
}

use super::input::{InputError, MovieAttributes};
use crate::predict::{PredictionError, PredictionResult};
use serde::Serialize;
use thiserror::Error;

/// Everything a single request can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Input(_) => ErrorKind::Input,
            RequestError::Prediction(_) => ErrorKind::Prediction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Prediction,
}

/// A successful prediction together with the attributes it was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub attributes: MovieAttributes,
    pub result: PredictionResult,
}

impl Prediction {
    /// Rows of the human readable report, in display order.
    pub fn report_rows(&self) -> Vec<(&'static str, String)> {
        let genres = if self.attributes.genre_tags.is_empty() {
            "None".to_string()
        } else {
            self.attributes.genre_tags.join(", ")
        };
        vec![
            ("Title", self.attributes.title.clone()),
            ("Predicted revenue", self.result.formatted.clone()),
            ("In millions", self.result.millions.clone()),
            (
                "Opening theaters",
                (self.attributes.opening_theaters.trunc() as i64).to_string(),
            ),
            (
                "Release days",
                (self.attributes.release_days.trunc() as i64).to_string(),
            ),
            ("MPAA rating", self.attributes.mpaa.clone()),
            ("Distributor", self.attributes.distributor.clone()),
            ("Genres", genres),
        ]
    }
}

/// Wire payload of a handled request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success {
        success: bool,
        title: String,
        predicted_revenue: f64,
        formatted_revenue: String,
        prediction_millions: String,
        /// Set when the prediction was made without the fitted scaler.
        degraded: bool,
    },
    Failure {
        success: bool,
        kind: ErrorKind,
        error: String,
    },
}

impl PredictionResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success { .. })
    }

    pub fn with_degraded(mut self, value: bool) -> Self {
        if let PredictionResponse::Success { degraded, .. } = &mut self {
            *degraded = value;
        }
        self
    }
}

impl From<&Result<Prediction, RequestError>> for PredictionResponse {
    fn from(outcome: &Result<Prediction, RequestError>) -> Self {
        match outcome {
            Ok(prediction) => PredictionResponse::Success {
                success: true,
                title: prediction.attributes.title.clone(),
                predicted_revenue: prediction.result.revenue,
                formatted_revenue: prediction.result.formatted.clone(),
                prediction_millions: prediction.result.millions.clone(),
                degraded: false,
            },
            Err(err) => PredictionResponse::Failure {
                success: false,
                kind: err.kind(),
                error: err.to_string(),
            },
        }
    }
}

use super::format::{format_currency, format_millions};
use crate::features::{inverse_log, FeatureVector, FEATURE_COUNT};
use crate::model::{ArtifactError, FeatureScaler, ModelError, Regressor};
use thiserror::Error;
use tracing::debug;

/// The single failure kind of the predict path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Prediction failed: scaler rejected the feature vector: {0}")]
    Scaler(ModelError),

    #[error("Prediction failed: model rejected the scaled vector: {0}")]
    Model(ModelError),

    #[error("Prediction failed: revenue 10^{0} is not representable")]
    Overflow(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub revenue: f64,
    pub formatted: String,
    pub millions: String,
}

impl PredictionResult {
    pub fn from_revenue(revenue: f64) -> Self {
        PredictionResult {
            revenue,
            formatted: format_currency(revenue),
            millions: format_millions(revenue),
        }
    }
}

/// Fitted scaler and model, loaded once and shared read-only by every
/// request.
pub struct PredictionService {
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn Regressor>,
}

impl PredictionService {
    /// Both collaborators must accept vectors of exactly [`FEATURE_COUNT`]
    /// features.
    pub fn new(
        scaler: Box<dyn FeatureScaler>,
        model: Box<dyn Regressor>,
    ) -> Result<Self, ArtifactError> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                artifact: "scaler",
                expected: FEATURE_COUNT,
                actual: scaler.n_features(),
            });
        }
        if model.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                artifact: "model",
                expected: FEATURE_COUNT,
                actual: model.n_features(),
            });
        }
        Ok(PredictionService { scaler, model })
    }

    pub fn model_description(&self) -> String {
        self.model.describe()
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, PredictionError> {
        let scaled = self
            .scaler
            .transform(vector.as_slice())
            .map_err(PredictionError::Scaler)?;
        let log_revenue = self.model.predict(&scaled).map_err(PredictionError::Model)?;
        let revenue = inverse_log(log_revenue);
        if !revenue.is_finite() {
            return Err(PredictionError::Overflow(log_revenue));
        }
        debug!("Predicted log10 revenue {} -> {}", log_revenue, revenue);
        Ok(PredictionResult::from_revenue(revenue))
    }
}

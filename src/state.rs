//! Startup assembly and request handling.

use crate::config::{AppConfig, ScalerFallback};
use crate::features::FEATURE_COUNT;
use crate::model::{load_model, load_scaler, StandardScaler};
use crate::predict::PredictionService;
use crate::request::{
    InputError, InputPolicy, Prediction, PredictionRequest, PredictionResponse, RequestError,
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

/// Everything a request needs. Built once, never mutated, shared by
/// reference between concurrently handled requests.
pub struct AppState {
    pub service: PredictionService,
    pub input_policy: InputPolicy,
    /// True when the scaler artifact could not be loaded and the identity
    /// scaler is in use.
    pub degraded: bool,
}

impl AppState {
    pub fn new(service: PredictionService, input_policy: InputPolicy) -> Self {
        AppState {
            service,
            input_policy,
            degraded: false,
        }
    }

    pub fn load(config: &AppConfig) -> Result<Self> {
        info!("Loading model from {:?}...", config.model_path);
        let model = load_model(&config.model_path)
            .with_context(|| format!("Could not load model {:?}", config.model_path))?;

        info!("Loading scaler from {:?}...", config.scaler_path);
        let (scaler, degraded) = match load_scaler(&config.scaler_path) {
            Ok(scaler) => (scaler, false),
            Err(err) => match config.scaler_fallback {
                ScalerFallback::Fail => {
                    return Err(err).with_context(|| {
                        format!(
                            "Could not load scaler {:?} (use --scaler-fallback identity to start anyway)",
                            config.scaler_path
                        )
                    });
                }
                ScalerFallback::Identity => {
                    warn!(
                        "Scaler not loaded ({}), using an untrained identity scaler. Predictions will be inaccurate.",
                        err
                    );
                    (StandardScaler::identity(FEATURE_COUNT), true)
                }
            },
        };

        let service = PredictionService::new(Box::new(scaler), Box::new(model))
            .context("Artifacts do not match the feature layout")?;
        info!("Prediction service ready: {}", service.model_description());

        Ok(AppState {
            service,
            input_policy: config.input_policy,
            degraded,
        })
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, RequestError> {
        let attributes = request.parse(self.input_policy)?;
        let vector = attributes.encode();
        let result = self.service.predict(&vector)?;
        Ok(Prediction { attributes, result })
    }

    pub fn handle(&self, request: &PredictionRequest) -> PredictionResponse {
        self.respond(&self.predict(request))
    }

    /// Wire payload for `outcome`, flagged when the identity scaler is in use.
    pub fn respond(&self, outcome: &Result<Prediction, RequestError>) -> PredictionResponse {
        PredictionResponse::from(outcome).with_degraded(self.degraded)
    }

    /// Handles one JSON request per line, in parallel. The output holds one
    /// response per non-blank line, in input order.
    pub fn handle_json_lines(&self, lines: &[String]) -> Vec<PredictionResponse> {
        lines
            .par_iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let outcome = serde_json::from_str::<PredictionRequest>(line)
                    .map_err(|e| RequestError::from(InputError::Malformed(e.to_string())))
                    .and_then(|request| self.predict(&request));
                self.respond(&outcome)
            })
            .collect()
    }
}

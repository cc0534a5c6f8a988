//! Artifact files written to temporary directories

use super::constants::*;
use anyhow::Result;
use box_office_predictor::config::{AppConfig, CliConfig, ScalerFallback};
use box_office_predictor::features::FEATURE_COLUMNS;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestArtifacts {
    // Kept alive for the lifetime of the test.
    _dir: TempDir,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

fn linear_model_json() -> serde_json::Value {
    let mut coefficients = vec![0.0; 10];
    coefficients[1] = THEATERS_COEF;
    coefficients[3] = DAYS_COEF;
    coefficients[4] = ACTION_COEF;
    json!({
        "type": "linear",
        "feature_names": FEATURE_COLUMNS,
        "coefficients": coefficients,
        "intercept": INTERCEPT,
    })
}

/// A boosted ensemble equivalent to a step function of the theaters column:
/// 6.0 up to 1000 theaters (log10 = 3), 7.0 above.
fn tree_ensemble_json() -> serde_json::Value {
    json!({
        "type": "tree_ensemble",
        "n_features": 10,
        "aggregation": "sum",
        "base_score": 5.0,
        "trees": [
            { "nodes": [
                { "feature": 1, "threshold": 0.0, "left": 1, "right": 2 },
                { "value": 1.0 },
                { "value": 2.0 }
            ] }
        ]
    })
}

fn scaler_json() -> serde_json::Value {
    let mut mean = vec![0.0; 10];
    mean[1] = THEATERS_MEAN;
    json!({
        "mean": mean,
        "scale": vec![1.0; 10],
        "feature_names": FEATURE_COLUMNS,
    })
}

impl TestArtifacts {
    /// Linear model plus a fitted scaler.
    pub fn linear() -> Result<Self> {
        Self::write(&linear_model_json(), Some(&scaler_json()))
    }

    pub fn tree_ensemble() -> Result<Self> {
        Self::write(&tree_ensemble_json(), Some(&scaler_json()))
    }

    /// Linear model with no scaler file next to it.
    pub fn without_scaler() -> Result<Self> {
        Self::write(&linear_model_json(), None)
    }

    pub fn with_raw(model: &str, scaler: Option<&str>) -> Result<Self> {
        let dir = TempDir::new()?;
        let model_path = dir.path().join("model.json");
        let scaler_path = dir.path().join("scaler.json");
        fs::write(&model_path, model)?;
        if let Some(scaler) = scaler {
            fs::write(&scaler_path, scaler)?;
        }
        Ok(TestArtifacts {
            _dir: dir,
            model_path,
            scaler_path,
        })
    }

    fn write(model: &serde_json::Value, scaler: Option<&serde_json::Value>) -> Result<Self> {
        let scaler = scaler.map(|s| s.to_string());
        Self::with_raw(&model.to_string(), scaler.as_deref())
    }

    pub fn config(&self, fallback: ScalerFallback, reject_non_positive: bool) -> Result<AppConfig> {
        let cli = CliConfig {
            model_path: Some(self.model_path.clone()),
            scaler_path: None,
            scaler_fallback: fallback,
            reject_non_positive,
        };
        AppConfig::resolve(&cli, None)
    }
}

/// What the fixture linear model predicts, in dollars.
pub fn expected_linear_revenue(opening_theaters: f64, release_days: f64, action: bool) -> f64 {
    let theaters = if opening_theaters > 0.0 {
        opening_theaters.log10()
    } else {
        0.0
    };
    let days = if release_days > 0.0 {
        release_days.log10()
    } else {
        0.0
    };
    let action = if action { 1.0 } else { 0.0 };
    let log_revenue = INTERCEPT
        + THEATERS_COEF * (theaters - THEATERS_MEAN)
        + DAYS_COEF * days
        + ACTION_COEF * action;
    10f64.powf(log_revenue)
}

//! Reading model and scaler artifacts from disk.

use super::{LinearRegressor, ModelError, Regressor, StandardScaler, TreeEnsemble};
use crate::features::FEATURE_COLUMNS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("Artifact columns {actual:?} do not match the expected columns {expected:?}")]
    ColumnOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("The {artifact} expects {actual} features, the encoder produces {expected}")]
    FeatureCount {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Any model kind this crate can load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    model: ModelArtifact,
}

impl ModelArtifact {
    fn validated(self) -> Result<Self, ArtifactError> {
        Ok(match self {
            ModelArtifact::Linear(m) => ModelArtifact::Linear(m.validated()?),
            ModelArtifact::TreeEnsemble(m) => ModelArtifact::TreeEnsemble(m.validated()?),
        })
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            ModelArtifact::Linear(m) => m,
            ModelArtifact::TreeEnsemble(m) => m,
        }
    }
}

impl Regressor for ModelArtifact {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.inner().predict(features)
    }
}

fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check_feature_names(names: Option<&Vec<String>>) -> Result<(), ArtifactError> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.iter().map(String::as_str).eq(FEATURE_COLUMNS) {
        return Ok(());
    }
    Err(ArtifactError::ColumnOrder {
        expected: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        actual: names.clone(),
    })
}

pub fn parse_model(content: &str, path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let file: ModelFile = serde_json::from_str(content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    check_feature_names(file.feature_names.as_ref())?;
    file.model.validated()
}

pub fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let model = parse_model(&read_artifact(path)?, path)?;
    info!("Loaded {} from {:?}", model.describe(), path);
    Ok(model)
}

pub fn parse_scaler(content: &str, path: &Path) -> Result<StandardScaler, ArtifactError> {
    let scaler: StandardScaler =
        serde_json::from_str(content).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    check_feature_names(scaler.feature_names.as_ref())?;
    scaler.validated()
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let scaler = parse_scaler(&read_artifact(path)?, path)?;
    info!("Loaded scaler from {:?}", path);
    Ok(scaler)
}

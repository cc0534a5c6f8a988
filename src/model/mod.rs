//! Fitted model and scaler artifacts.
//!
//! The prediction path only sees the two capabilities below. Concrete
//! implementations are deserialized from JSON files produced by the
//! training pipeline.

mod artifact;
mod linear;
mod scaler;
mod tree_ensemble;

pub use artifact::{
    load_model, load_scaler, parse_model, parse_scaler, ArtifactError, ModelArtifact,
};
pub use linear::LinearRegressor;
pub use scaler::StandardScaler;
pub use tree_ensemble::{Aggregation, Node, Tree, TreeEnsemble};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("non-finite value at feature {index}")]
    NonFiniteInput { index: usize },

    #[error("model produced a non-finite value: {0}")]
    NonFiniteOutput(f64),
}

/// Affine per-feature normalization fitted during training.
pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// A fitted regressor producing a single scalar per input row.
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;

    /// Short human readable description, used in logs and `check`.
    fn describe(&self) -> String;

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;
}

pub(crate) fn check_shape(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteInput { index });
    }
    Ok(())
}

pub(crate) fn check_output(value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFiniteOutput(value))
    }
}

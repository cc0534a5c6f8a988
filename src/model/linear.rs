use super::{check_output, check_shape, ArtifactError, ModelError, Regressor};
use serde::Deserialize;

/// Ordinary least squares style model: `intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        LinearRegressor {
            coefficients,
            intercept,
        }
        .validated()
    }

    pub(crate) fn validated(self) -> Result<Self, ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::Invalid(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(self)
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn describe(&self) -> String {
        format!("linear ({} coefficients)", self.coefficients.len())
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_shape(self.coefficients.len(), features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        check_output(self.intercept + dot)
    }
}

use super::{check_shape, ArtifactError, FeatureScaler, ModelError};
use serde::Deserialize;

/// Standardization parameters as exported from the training notebook.
///
/// A missing `mean` means the data was not centered, a missing `scale`
/// means it was not scaled. Zero scale entries come from constant columns
/// and are treated as 1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(skip)]
    n_features: usize,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        StandardScaler {
            mean: Some(mean),
            scale: Some(scale),
            feature_names: None,
            n_features: 0,
        }
        .validated()
    }

    /// The untrained default: passes vectors of `n_features` through unchanged.
    pub fn identity(n_features: usize) -> Self {
        StandardScaler {
            mean: None,
            scale: None,
            feature_names: None,
            n_features,
        }
    }

    /// Checks internal consistency and fixes up the feature count. Must be
    /// called after deserializing.
    pub(crate) fn validated(mut self) -> Result<Self, ArtifactError> {
        let n = match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) if mean.len() != scale.len() => {
                return Err(ArtifactError::Invalid(format!(
                    "scaler mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                )));
            }
            (Some(mean), _) => mean.len(),
            (None, Some(scale)) => scale.len(),
            (None, None) => match &self.feature_names {
                Some(names) => names.len(),
                None => {
                    return Err(ArtifactError::Invalid(
                        "scaler has neither mean, scale nor feature_names".to_string(),
                    ))
                }
            },
        };
        if n == 0 {
            return Err(ArtifactError::Invalid("scaler has zero features".to_string()));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .flatten()
            .any(|v| !v.is_finite())
        {
            return Err(ArtifactError::Invalid(
                "scaler parameters must be finite".to_string(),
            ));
        }
        self.n_features = n;
        Ok(self)
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_shape(self.n_features, features)?;
        let scaled = features
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let mean = self.mean.as_ref().map_or(0.0, |m| m[i]);
                let scale = self.scale.as_ref().map_or(1.0, |s| s[i]);
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect();
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert_eq!(scaler.transform(&[3.0, 0.0]).unwrap(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![1.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(scaler.transform(&[4.0, 4.0]).unwrap(), vec![3.0, 3.0]);
    }

    #[test]
    fn test_identity_passes_through() {
        let scaler = StandardScaler::identity(3);
        assert_eq!(
            scaler.transform(&[1.5, -2.0, 0.0]).unwrap(),
            vec![1.5, -2.0, 0.0]
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = StandardScaler::identity(10);
        assert_eq!(
            scaler.transform(&[1.0; 4]),
            Err(ModelError::ShapeMismatch {
                expected: 10,
                actual: 4
            })
        );
    }

    #[test]
    fn test_mismatched_parameter_lengths_rejected() {
        let result = StandardScaler::new(vec![0.0; 3], vec![1.0; 2]);
        assert!(matches!(result, Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_partial_parameters_from_json() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{ "scale": [2.0, 4.0] }"#).unwrap();
        let scaler = scaler.validated().unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert_eq!(scaler.transform(&[2.0, 2.0]).unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_empty_scaler_rejected() {
        let scaler: StandardScaler = serde_json::from_str("{}").unwrap();
        assert!(scaler.validated().is_err());
    }
}

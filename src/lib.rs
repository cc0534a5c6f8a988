//! Box Office Predictor Library
//!
//! Encodes movie attributes into the feature layout of an externally
//! trained revenue model, runs the fitted scaler and model, and formats the
//! predicted revenue.

pub mod config;
pub mod features;
pub mod model;
pub mod predict;
pub mod request;
pub mod state;

// Re-export commonly used types for convenience
pub use features::{encode, FeatureVector, GenreSet};
pub use predict::{PredictionError, PredictionResult, PredictionService};
pub use request::{InputError, PredictionRequest, PredictionResponse, RequestError};
pub use state::AppState;

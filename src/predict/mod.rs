//! Scale, predict and invert the log-scale target.

mod format;
mod service;

pub use format::{format_currency, format_millions};
pub use service::{PredictionError, PredictionResult, PredictionService};

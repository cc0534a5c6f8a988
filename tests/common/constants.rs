//! Shared constants for end-to-end tests
//!
//! The fixture model is linear so expected revenues can be computed by
//! hand: only the two log columns and the action flag carry weight.

/// Log10 revenue of a movie with every weighted feature at its scaler mean.
pub const INTERCEPT: f64 = 6.0;

/// Scaler mean of the opening theaters column (log10 of 1000 theaters).
pub const THEATERS_MEAN: f64 = 3.0;

pub const THEATERS_COEF: f64 = 1.0;

pub const DAYS_COEF: f64 = 0.5;

pub const ACTION_COEF: f64 = 0.25;

pub const UNIVERSAL: &str = "Universal";

pub const PG_13: &str = "PG-13";

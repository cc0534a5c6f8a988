//! Common test infrastructure
//!
//! Tests only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{make_request, TestArtifacts};
//!
//! #[test]
//! fn test_predict() {
//!     let artifacts = TestArtifacts::linear().unwrap();
//!     let config = artifacts.config(ScalerFallback::Fail, false).unwrap();
//!     let state = AppState::load(&config).unwrap();
//!     assert!(state.handle(&make_request(4000.0, 90.0, &["action"])).is_success());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{expected_linear_revenue, TestArtifacts};

use box_office_predictor::request::{NumberOrText, PredictionRequest};

pub fn make_request(opening_theaters: f64, release_days: f64, genres: &[&str]) -> PredictionRequest {
    PredictionRequest {
        title: Some("Test Movie".to_string()),
        distributor: Some(UNIVERSAL.to_string()),
        mpaa: Some(PG_13.to_string()),
        opening_theaters: Some(NumberOrText::Number(opening_theaters)),
        release_days: Some(NumberOrText::Number(release_days)),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected.abs() * 1e-9;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        actual
    );
}

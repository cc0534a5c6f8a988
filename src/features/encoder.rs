//! Raw movie attributes to the model's input vector.

use super::{GenreSet, DISTRIBUTORS, MPAA_RATINGS};
use tracing::debug;

pub const FEATURE_COUNT: usize = 10;

/// Column names of the training frame. The model was fit on exactly this
/// order and mispredicts silently if it changes.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "distributor",
    "opening_theaters",
    "MPAA",
    "release_days",
    "action",
    "animation",
    "comedy",
    "drama",
    "horror",
    "thriller",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    pub fn distributor(&self) -> f64 {
        self.0[0]
    }

    pub fn opening_theaters(&self) -> f64 {
        self.0[1]
    }

    pub fn mpaa(&self) -> f64 {
        self.0[2]
    }

    pub fn release_days(&self) -> f64 {
        self.0[3]
    }

    pub fn genres(&self) -> &[f64] {
        &self.0[4..]
    }
}

/// `log10(x)` for positive `x`, literal 0 otherwise.
///
/// Zero is not a log-domain floor, it is what the training pipeline
/// substituted and the model expects it.
pub fn log_feature(x: f64) -> f64 {
    if x > 0.0 {
        x.log10()
    } else {
        0.0
    }
}

/// Inverse of the log-scale target transform.
pub fn inverse_log(value: f64) -> f64 {
    10f64.powf(value)
}

pub fn encode(
    title: &str,
    distributor: &str,
    mpaa: &str,
    opening_theaters: f64,
    release_days: f64,
    genres: &GenreSet,
) -> FeatureVector {
    if DISTRIBUTORS.lookup(distributor).is_none() {
        debug!(
            "Unknown {} {:?} for {:?}, encoding as 0",
            DISTRIBUTORS.name(),
            distributor,
            title
        );
    }
    if MPAA_RATINGS.lookup(mpaa).is_none() {
        debug!(
            "Unknown {} {:?} for {:?}, encoding as 0",
            MPAA_RATINGS.name(),
            mpaa,
            title
        );
    }

    let g = genres.indicators();
    FeatureVector([
        DISTRIBUTORS.encode(distributor) as f64,
        log_feature(opening_theaters),
        MPAA_RATINGS.encode(mpaa) as f64,
        log_feature(release_days),
        g[0],
        g[1],
        g[2],
        g[3],
        g[4],
        g[5],
    ])
}

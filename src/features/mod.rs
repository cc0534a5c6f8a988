mod category_table;
mod encoder;
mod genre;

pub use category_table::{CategoryTable, DISTRIBUTORS, MPAA_RATINGS};
pub use encoder::{
    encode, inverse_log, log_feature, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT,
};
pub use genre::{Genre, GenreSet};

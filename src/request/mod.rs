//! The request boundary: raw fields in, a prediction or a user-visible
//! error out.

mod input;
mod response;

pub use input::{
    InputError, InputPolicy, MovieAttributes, NumberOrText, PredictionRequest, DEFAULT_TITLE,
};
pub use response::{ErrorKind, Prediction, PredictionResponse, RequestError};

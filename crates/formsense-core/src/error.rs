//! Error types for the FormSense system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown exercise: {name}")]
    UnknownExercise { name: String },

    #[error("Invalid exercise definition: {0}")]
    InvalidDefinition(String),

    #[error("Importance weight out of range for criterion {criterion}: {value}")]
    ImportanceOutOfRange { criterion: String, value: f64 },

    #[error("Pose query failed: {0}")]
    PoseQuery(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

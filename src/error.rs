use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid constant combination detected at initialization
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Out-of-range clock value; callers keep the previous time texture
    #[error("Invalid time value: hour {hour} (0-23), minute {minute} (0-59)")]
    InvalidTimeValue { hour: u32, minute: u32 },

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

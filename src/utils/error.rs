use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed address {address:?}: expected at least 4 comma-separated segments")]
    MalformedAddress { address: String },

    #[error("Invalid listing URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Route provider error: {message}")]
    RouteError { message: String },

    #[error("Delivery error: {message}")]
    DeliveryError { message: String },

    #[error("Message store error: {message}")]
    StoreError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, NotifierError>;

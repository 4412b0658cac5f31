use thiserror::Error;

/// Errors returned by MyRadio API accessors.
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or its response body not read
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The server answered with a non-2xx status and no API envelope
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The API envelope carried a status other than OK
    #[error("{endpoint} response not OK: {status} ({payload})")]
    ApiError {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Status reported in the envelope.
        status: String,
        /// Envelope payload as JSON text, usually the reason.
        payload: String,
    },

    /// A response or payload did not have the expected shape
    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    /// A track length is not `H:MM:SS`
    #[error("Failed to parse track length {length:?}: {reason}")]
    LengthParseError {
        /// Length as received.
        length: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A date field did not match its wire format
    #[error("Failed to parse date {raw:?}: {source}")]
    DateParseError {
        /// Date as received.
        raw: String,
        /// Underlying parse failure.
        source: chrono::ParseError,
    },

    /// The user has never set a bio
    #[error("No bio set")]
    NoBio,

    /// The user has no profile photo
    #[error("No profile picture set")]
    NoProfilePhoto,

    /// No usable API key or base URL
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for MyRadio API accessors.
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

use std::fmt;

/// Result type for tablo-adapters operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the adapter layer
#[derive(Debug)]
pub enum Error {
    /// The backend rejected or failed the request
    Backend(String),

    /// The addressed record does not exist
    NotFound(String),

    /// Response payload could not be decoded
    Json(serde_json::Error),

    /// Response carried a record the controller cannot use
    Record(tablo_types::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Record(err) => write!(f, "Record error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Record(err) => Some(err),
            Error::Backend(_) | Error::NotFound(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<tablo_types::Error> for Error {
    fn from(err: tablo_types::Error) -> Self {
        Error::Record(err)
    }
}

use std::fmt;

/// Result type for tablo-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// Record has no usable `id` field
    MissingId(String),
    /// Record is not a JSON object
    NotAnObject(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingId(detail) => write!(f, "record has no id: {}", detail),
            Error::NotAnObject(detail) => write!(f, "record is not an object: {}", detail),
        }
    }
}

impl std::error::Error for Error {}

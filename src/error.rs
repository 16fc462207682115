//! Error results that can occur converting images
use std::{
    collections::TryReserveError,
    fmt::{Debug, Display, Formatter, Result},
    io,
};

/// An error that can occur when converting a disk image to a WOZ
/// image.
pub struct Error {
    kind: ErrorKind,
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create a new Error with a given ErrorKind variant
    pub fn new(kind: ErrorKind) -> Error {
        Error { kind }
    }

    /// Return the kind of error that occurred
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Create an error for input data that isn't the expected length
    pub fn input_size(expected: usize, actual: usize) -> Error {
        Error::new(ErrorKind::Invalid(InvalidErrorKind::InputSize {
            expected,
            actual,
        }))
    }

    /// Create an error for invalid or unexpected data
    pub fn invalid(message: &str) -> Error {
        Error::new(ErrorKind::Invalid(InvalidErrorKind::Invalid(
            message.to_string(),
        )))
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::new(ErrorKind::Io(e))
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Error {
        Error::new(ErrorKind::Config(e))
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Error {
        Error::new(ErrorKind::Allocation(e))
    }
}

/// The kinds of errors that can occur when converting an image.
pub enum ErrorKind {
    /// Generic error type
    Message(String),

    /// An error that occurs while reading or writing image data.
    Io(io::Error),

    /// An error loading or reading configuration settings
    Config(config::ConfigError),

    /// An error that occurs when dealing with invalid or unexpected
    /// data.
    Invalid(InvalidErrorKind),

    /// A buffer for the track or container data couldn't be
    /// allocated.
    Allocation(TryReserveError),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ErrorKind::Message(message) => write!(f, "An error occurred: {}", message),
            ErrorKind::Io(e) => write!(f, "{}", e),
            ErrorKind::Config(e) => write!(f, "Configuration error: {}", e),
            ErrorKind::Invalid(e) => write!(f, "{}", e),
            ErrorKind::Allocation(e) => write!(f, "Memory allocation failed: {}", e),
        }
    }
}

impl ErrorKind {
    /// Return a new generic ErrorKind::Message with a given string message.
    pub fn new(message: &str) -> ErrorKind {
        ErrorKind::Message(message.to_string())
    }
}

/// An InvalidErrorKind is returned when the data is invalid.
pub enum InvalidErrorKind {
    /// The data was invalid
    Invalid(String),
    /// The input image wasn't the size the converter requires
    InputSize {
        /// The required size in bytes
        expected: usize,
        /// The size of the data that was given
        actual: usize,
    },
}

impl Display for InvalidErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            InvalidErrorKind::Invalid(message) => write!(f, "Image is invalid: {}", message),
            InvalidErrorKind::InputSize { expected, actual } => write!(
                f,
                "Image is {} bytes, expected a 16-sector 5.25\" image of {} bytes",
                actual, expected
            ),
        }
    }
}

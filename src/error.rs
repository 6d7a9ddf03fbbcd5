use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Category of a failure reported by the I/O layer, the band sources or the
/// parse-info registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Allocation failure
    Memory,
    /// Backend read failure, including truncated or out-of-bounds reads
    Read,
    /// Backend write failure
    Write,
    /// Seek outside the addressable range or backend seek failure
    Seek,
    /// Failure to acquire a file or stream
    OpeningResource,
    /// Malformed stride or offset parameters
    InvalidArgument,
    /// Operation on a closed or otherwise unusable handle
    InvalidObject,
    /// Uncategorized backend failure
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Memory => "memory",
            ErrorKind::Read => "read",
            ErrorKind::Write => "write",
            ErrorKind::Seek => "seek",
            ErrorKind::OpeningResource => "opening resource",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidObject => "invalid object",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured failure descriptor.
///
/// Every fallible operation in this crate returns one of these instead of
/// panicking. The `location` is captured where the error was created, which
/// is the function that detected the failure, not the caller that observed it.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message} (at {location})")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl Error {
    /// Create an error of the given kind at the caller's location.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn memory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Memory, message)
    }

    #[track_caller]
    pub fn read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Read, message)
    }

    #[track_caller]
    pub fn write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Write, message)
    }

    #[track_caller]
    pub fn seek(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Seek, message)
    }

    #[track_caller]
    pub fn opening_resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OpeningResource, message)
    }

    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    #[track_caller]
    pub fn invalid_object(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidObject, message)
    }

    /// Wrap an OS error, embedding its text in the message.
    #[track_caller]
    pub fn from_io(kind: ErrorKind, context: &str, err: std::io::Error) -> Self {
        Self::new(kind, format!("{}: {}", context, err))
    }

    /// Prefix the message with additional context, keeping kind and location.
    pub fn with_context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location where the failure was detected.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

pub type Result<T> = std::result::Result<T, Error>;

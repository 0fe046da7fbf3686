use chrono::{DateTime, Utc};

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors produced by the validated minting entry points.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The timestamp carries no offset information, so it cannot be placed on the UTC timeline.
    #[error("timestamp has no UTC offset; pass a UTC time or a local time with a known offset")]
    UnspecifiedKind,

    /// The timestamp, once normalized to UTC, lies before the Unix epoch or after the current
    /// time.
    #[error("timestamp {0} must be between 1970-01-01T00:00:00Z and now")]
    OutOfRange(DateTime<Utc>),

    /// The process-wide generator was already installed.
    #[error("process-wide generator is already initialized")]
    AlreadyInitialized,
}

/// Error parsing an invalid string representation of GUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("invalid string representation")]
pub struct ParseError {}

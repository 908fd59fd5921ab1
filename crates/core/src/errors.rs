use core::fmt::Display;

use displaydoc::Display;

use crate::types::ConnectionState;

/// A specialized result type for the LumiPet animation core.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when editing, storing or publishing animations.
#[derive(Clone, PartialEq, Eq, Display, Debug)]
pub enum Error {
    /// Malformed grid or animation data: {0}
    Format(String),
    /// Index {index} is out of range, expected a value below {len}.
    OutOfRange { index: usize, len: usize },
    /// Frame rate {0} is outside of the [1, 24] fps range.
    FpsOutOfRange(u8),
    /// Operation would break an animation invariant: {0}
    InvariantViolation(&'static str),
    /// Unable to publish a message, the bus is {0}.
    NotConnected(ConnectionState),
    /// Animation name must not be empty.
    EmptyName,
    /// Storage backend error: {0}
    Storage(String),
    /// Bus transport error: {0}
    Transport(String),
}

impl Error {
    /// Creates a new data format error.
    pub fn format<E>(err: E) -> Self
    where
        E: Display,
    {
        Self::Format(err.to_string())
    }

    /// Creates a new storage backend error.
    pub fn storage<E>(err: E) -> Self
    where
        E: Display,
    {
        Self::Storage(err.to_string())
    }

    /// Creates a new bus transport error.
    pub fn transport<E>(err: E) -> Self
    where
        E: Display,
    {
        Self::Transport(err.to_string())
    }

    /// Checks that the given index fits into a sequence of the given length.
    pub fn check_index(index: usize, len: usize) -> Result<usize> {
        if index < len {
            Ok(index)
        } else {
            Err(Self::OutOfRange { index, len })
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::format(err)
    }
}

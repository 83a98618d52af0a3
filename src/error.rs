use std::fmt;

#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The maximum number of quanta is out of the allowed range
    InvalidConfiguration,
    /// The quantisation level can't be doubled any further
    LevelOverflow,
    /// The slice provided to the function is too small
    BufferTooSmall,
    /// A pixel didn't resolve to any palette slot
    UnknownColor,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => write!(f, "Invalid configuration"),
            Self::LevelOverflow => write!(f, "Quantisation level overflow"),
            Self::BufferTooSmall => write!(f, "Buffer is too small"),
            Self::UnknownColor => write!(f, "Color has no palette slot"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for Error {}

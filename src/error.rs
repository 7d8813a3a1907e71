use thiserror::Error;

/// Boxed source error carried by [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing a permutation session.
///
/// All of them are reported before any engine state exists, so a caller never
/// observes a half-built session.
#[derive(Debug, Error)]
pub enum Error {
    /// The element source could not be consumed as an ordered sequence.
    #[error("element source failed at position {index}: {source}")]
    Argument {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// An order key could not be produced or ordered.
    #[error("invalid key for element {index}: {reason}")]
    InvalidKey { index: usize, reason: KeyError },
}

/// Why an order key was rejected.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key function failed.
    #[error("key function failed: {0}")]
    Mapping(#[source] BoxError),

    /// The key has no ordering against the key of element `other`.
    #[error("key is not comparable with the key of element {other}")]
    Incomparable { other: usize },
}

impl Error {
    pub fn argument<E: Into<BoxError>>(index: usize, source: E) -> Self {
        Error::Argument {
            index,
            source: source.into(),
        }
    }

    pub fn mapping<E: Into<BoxError>>(index: usize, source: E) -> Self {
        Error::InvalidKey {
            index,
            reason: KeyError::Mapping(source.into()),
        }
    }

    pub fn incomparable(index: usize, other: usize) -> Self {
        Error::InvalidKey {
            index,
            reason: KeyError::Incomparable { other },
        }
    }

    /// Index of the element that caused the error.
    pub fn index(&self) -> usize {
        match self {
            Error::Argument { index, .. } | Error::InvalidKey { index, .. } => *index,
        }
    }
}

//! Error handling.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::error;
use std::convert::Infallible;
use thiserror::Error;
use crate::decode::Pos;


//------------ ErrorKind -----------------------------------------------------

/// The kind of structural problem encountered while encoding or decoding.
///
/// All of these are local and permanent: retrying the same operation on the
/// same data will fail in the same way.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum ErrorKind {
    /// The identifier octets are not correctly encoded.
    #[error("malformed identifier octets")]
    MalformedTag,

    /// The length octets are not correctly encoded.
    #[error("malformed length octets")]
    MalformedLength,

    /// The data ended before the content of a value was complete.
    #[error("unexpected end of content")]
    TruncatedContent,

    /// There is data left after the last value that can’t be a value.
    #[error("trailing data")]
    TrailingContent,

    /// The data ended before the end-of-contents of an indefinite value.
    #[error("unterminated indefinite length value")]
    UnterminatedIndefiniteLength,

    /// The encoding is not allowed in the selected mode.
    #[error("encoding not permitted in this mode")]
    DialectViolation,

    /// Implicit tagging was asked for a framing the inner value can’t have.
    #[error("implicit tag cannot carry the requested framing")]
    UnsupportedDialectCombination,

    /// Values are nested deeper than permitted.
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,

    /// An indefinite length value is larger than permitted.
    #[error("indefinite length scan limit exceeded")]
    ScanLimitExceeded,

    /// A tag number is larger than permitted.
    #[error("tag number out of range")]
    InvalidTagNumber,
}


//------------ ContentError --------------------------------------------------

/// The encoded data is not valid.
///
/// The error contains the kind of problem and the position in the source
/// where the offending value or octet started.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("{kind} at position {pos}")]
pub struct ContentError {
    kind: ErrorKind,
    pos: Pos,
}

impl ContentError {
    /// Creates a new content error.
    pub fn new(kind: ErrorKind, pos: Pos) -> Self {
        ContentError { kind, pos }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position in the source where the error happened.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl From<DecodeError<Infallible>> for ContentError {
    fn from(err: DecodeError<Infallible>) -> Self {
        match err {
            DecodeError::Content(err) => err,
            DecodeError::Source(err) => match err { }
        }
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// This can either be a problem with the encoded data itself or a problem
/// with reading from the source. The latter is described by the source’s
/// own error type, which is `Infallible` for data already in memory.
#[derive(Debug, Error)]
pub enum DecodeError<S: error::Error + 'static = Infallible> {
    /// The data was not correctly encoded.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Reading from the source failed.
    #[error("source error: {0}")]
    Source(#[source] S),
}

impl<S: error::Error + 'static> DecodeError<S> {
    /// Creates a content error of the given kind at the given position.
    pub fn content(kind: ErrorKind, pos: Pos) -> Self {
        DecodeError::Content(ContentError::new(kind, pos))
    }

    /// Creates an error from a source error.
    pub fn from_source(err: S) -> Self {
        DecodeError::Source(err)
    }

    /// Returns the kind of a content error.
    ///
    /// Returns `None` if this is a source error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DecodeError::Content(err) => Some(err.kind()),
            DecodeError::Source(_) => None,
        }
    }
}


//------------ EncodeError ---------------------------------------------------

/// An error happened while encoding a value tree.
///
/// Content errors are detected before anything is written. They identify
/// the offending value by its position in a depth-first, pre-order walk of
/// the tree, starting with the root at 0. Target errors are whatever the
/// target reported while writing.
#[derive(Debug, Error)]
pub enum EncodeError<T: error::Error + 'static = Infallible> {
    /// The value tree cannot be encoded in the selected mode.
    #[error("{kind} at value {node}")]
    Content {
        /// The kind of problem.
        kind: ErrorKind,

        /// The pre-order index of the offending value.
        node: usize,
    },

    /// Writing to the target failed.
    #[error("target error: {0}")]
    Target(#[source] T),
}

impl<T: error::Error + 'static> EncodeError<T> {
    /// Creates a content error for the given node.
    pub fn content(kind: ErrorKind, node: usize) -> Self {
        EncodeError::Content { kind, node }
    }

    /// Returns the kind of a content error.
    ///
    /// Returns `None` if this is a target error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EncodeError::Content { kind, .. } => Some(*kind),
            EncodeError::Target(_) => None,
        }
    }
}

impl EncodeError<Infallible> {
    /// Converts the error into one for a target with a different error type.
    pub fn into_target<U: error::Error + 'static>(self) -> EncodeError<U> {
        match self {
            EncodeError::Content { kind, node } => {
                EncodeError::Content { kind, node }
            }
            EncodeError::Target(err) => match err { }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            ContentError::new(ErrorKind::TruncatedContent, 4.into())
                .to_string(),
            "unexpected end of content at position 4"
        );
        assert_eq!(
            EncodeError::<Infallible>::content(
                ErrorKind::DialectViolation, 2
            ).to_string(),
            "encoding not permitted in this mode at value 2"
        );
    }

    #[test]
    fn kinds() {
        let err = DecodeError::<std::io::Error>::content(
            ErrorKind::MalformedLength, 0.into()
        );
        assert_eq!(err.kind(), Some(ErrorKind::MalformedLength));
        let err = DecodeError::from_source(
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof)
        );
        assert_eq!(err.kind(), None);
    }
}

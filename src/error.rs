//! The error type used throughout this crate.

use std::str::Utf8Error;

/// A type alias of `Result<T, E>` whose error type is fixed to [`Error`].
///
/// [`Error`]: ./enum.Error.html
pub type Result<T> = std::result::Result<T, Error>;

/// The error type which will be returned from the operations in this crate.
#[derive(Debug, failure::Fail)]
pub enum Error {
    /// The request URI was replaced after resource matching had started.
    ///
    /// Reassignment is only permitted while every matched-trail stack is
    /// still empty. Receiving this error indicates a dispatcher bug.
    #[fail(display = "the request URI can only be replaced before resource matching has started")]
    MatchingAlreadyStarted,

    /// A component carried percent-encoded bytes which do not form valid UTF-8.
    #[fail(display = "malformed percent-encoding in the {}: {}", location, cause)]
    Decode {
        /// Which component failed to decode.
        location: &'static str,
        /// The underlying UTF-8 failure.
        cause: Utf8Error,
    },

    /// The input string could not be parsed as a URI reference.
    #[fail(display = "invalid URI reference: {}", reason)]
    Parse {
        /// Why the input was rejected.
        reason: &'static str,
    },

    /// Typed access to the query was requested, but the request URI has no query string.
    #[fail(display = "missing query string")]
    MissingQuery,

    /// The query string could not be deserialized into the requested type.
    #[fail(display = "invalid query string: {}", cause)]
    InvalidQuery {
        /// The underlying deserialization failure.
        cause: failure::Error,
    },
}

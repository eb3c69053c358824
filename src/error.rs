//! Unified error type.

use std::fmt;

/// The error type returned by the crate's fallible operations.
///
/// Failures inside a request are expressed as HTTP statuses written to the
/// response, not as `Error`s. Wiring mistakes that can only happen at build
/// time (a duplicate registry key, [`Registry::must_get`] on a missing key)
/// panic instead. What is left surfaces here: socket failures and chains
/// composed from keys that were read at runtime.
///
/// [`Registry::must_get`]: crate::Registry::must_get
#[derive(Debug)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    Io(std::io::Error),
    /// A chain referenced a key that nothing registered.
    UnknownMiddleware(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::UnknownMiddleware(key) => write!(f, "unknown middleware `{key}`"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::UnknownMiddleware(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_key() {
        let err = Error::UnknownMiddleware("middleware.Gzip".to_owned());
        assert_eq!(err.to_string(), "unknown middleware `middleware.Gzip`");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert!(err.to_string().starts_with("io: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}

use serde::de;

use std::fmt::Display;

/// Errors raised while extracting typed data from a parsed tree.
///
/// Parsing a querystring never fails; these only come out of
/// [`from_node`](crate::from_node) and friends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message produced by a `Deserialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// The requested type cannot be built from the root of a querystring.
    #[error("cannot deserialize {0} at the top level; try deserializing into a struct or map")]
    TopLevel(&'static str),

    /// The node found at some position does not have the shape the target
    /// type asked for.
    #[error("invalid node: expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Generate error to show top-level type cannot be deserialized.
    pub fn top_level(object: &'static str) -> Self {
        Error::TopLevel(object)
    }

    pub(crate) fn unexpected(expected: &'static str, found: &'static str) -> Self {
        Error::Unexpected { expected, found }
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

use serde::de;

use crate::error::Result;
use crate::value::Node;

/// Configuration for parsing behavior.
///
/// The `Config` struct allows you to customize how `qs_value` splits keys
/// into nested paths.
///
/// ## Nesting Depth
///
/// The `max_depth` parameter controls how many bracket groups of a key are
/// turned into nested levels. Anything beyond that is kept as one literal
/// key at the deepest level. A `max_depth` of 0 means no nesting is done at
/// all (flat key-value pairs only).
///
/// Default value: unlimited. Untrusted input cannot make the tree grow
/// faster than the input itself, so a limit is only needed to bound how deep
/// the resulting tree can be.
///
/// ```
/// use qs_value::Config;
///
/// let tree = Config::new().max_depth(0).parse_str("a[b][c]=1");
/// assert_eq!(tree["a[b][c]"], "1");
///
/// let tree = Config::new().max_depth(1).parse_str("a[b][c]=1");
/// assert_eq!(tree["a"]["b"]["[c]"], "1");
///
/// let tree = Config::new().parse_str("a[b][c]=1");
/// assert_eq!(tree["a"]["b"]["c"], "1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    /// Specifies the maximum number of bracket groups that will be parsed
    /// as nested keys. Default is unlimited.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses an encoded querystring using this `Config`.
    ///
    /// The result is always a [`Node::Mapping`].
    pub fn parse_str(self, input: &str) -> Node {
        crate::parse::parse_str(input, self)
    }

    /// Builds a tree from already split and decoded `(key, value)` pairs
    /// using this `Config`.
    ///
    /// Keys still go through bracket parsing, but nothing is percent-decoded.
    pub fn parse_pairs<I, K, V>(self, pairs: I) -> Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        crate::parse::parse_pairs(pairs, self)
    }

    /// Deserializes a querystring from a `&str` using this `Config`.
    pub fn deserialize_str<T: de::DeserializeOwned>(self, input: &str) -> Result<T> {
        crate::de::from_root(self.parse_str(input))
    }

    /// Deserializes already split and decoded pairs using this `Config`.
    pub fn deserialize_pairs<T, I, K, V>(self, pairs: I) -> Result<T>
    where
        T: de::DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        crate::de::from_root(self.parse_pairs(pairs))
    }
}

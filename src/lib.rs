//! Querystring parsing into nested, ordered trees
//!
//! Querystrings are not formally defined and loosely take the form of
//! _nested_ urlencoded queries: `user[name]=tj&user[tags][]=a&ids[0]=1`.
//!
//! This library parses them into a [`Node`] tree following the conventions
//! of [qs](https://github.com/ljharb/qs) and
//! [`Rack::Utils::parse_nested_query`](http://www.rubydoc.info/github/rack/rack/Rack/Utils#parse_nested_query-class_method),
//! without needing a schema up front.
//!
//! ## Parsing rules
//!
//! - Pairs are separated by `&`; a key and its value by `=`. A key without
//!   `=` gets an empty value, and empty keys are ignored.
//! - Both sides are percent-decoded, with `+` meaning a space. Malformed
//!   escapes are kept as they are.
//! - `a[b]=1` nests `b` under `a`. `a[]=1` appends to a list, and `a[0]=1`
//!   writes at an index.
//! - Writing the same key twice collects the values into a list:
//!   `k=a&k=b` parses to `{k: [a, b]}`.
//! - A container whose keys are all indices becomes a list, ordered by index
//!   with any gaps closed. Any other key keeps it a map.
//! - Keys touching names like `__proto__` or `constructor` are dropped.
//!
//! Parsing never fails: every input produces a tree.
//!
//! ## Usage
//!
//! ```
//! let tree = qs_value::parse("user[name]=tj&user[tags][]=a&user[tags][]=b&ids[2]=x&ids[0]=y");
//!
//! assert_eq!(tree["user"]["name"], "tj");
//! assert_eq!(tree["user"]["tags"][1], "b");
//! assert_eq!(tree["ids"][0], "y");
//! assert_eq!(tree["ids"][1], "x");
//! ```
//!
//! Trees can be deserialized into your own types:
//!
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     user_ids: Vec<u8>,
//! }
//!
//! let params: QueryParams = qs_value::from_str("\
//!     name=Acme&id=42&address[postcode]=12345&\
//!     address[city]=Carrot+City&user_ids[]=1&user_ids[]=2")
//!     .unwrap();
//! assert_eq!(params.address.city, "Carrot City");
//! assert_eq!(params.user_ids, [1, 2]);
//! ```

mod config;
mod de;
mod error;
mod parse;
mod value;

pub use crate::config::Config;
#[doc(inline)]
pub use crate::de::{from_node, from_str};
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::parse::key::{KeyPath, RESERVED_NAMES, Segment};
#[doc(inline)]
pub use crate::parse::{Pairs, decode, tokenize};
pub use crate::value::{Mapping, Node};

/// Parses an encoded querystring into a tree.
///
/// The result is always a [`Node::Mapping`]; the empty string gives an empty
/// one.
///
/// ```
/// let tree = qs_value::parse("items=bar&items=baz&a[]=1&a[999999999]=2");
/// assert_eq!(tree.to_string(), r#"{"items": ["bar", "baz"], "a": ["1", "2"]}"#);
/// assert!(qs_value::parse("").is_empty());
/// ```
pub fn parse(input: &str) -> Node {
    Config::default().parse_str(input)
}

/// Builds a tree from already split and decoded `(key, value)` pairs.
///
/// Use this when something else already split a form-encoded document: the
/// keys still go through bracket parsing, but nothing is percent-decoded.
///
/// ```
/// let tree = qs_value::parse_pairs([
///     ("user[name]", "tobi"),
///     ("user[email][main]", "tobi@lb.com"),
/// ]);
/// assert_eq!(tree["user"]["email"]["main"], "tobi@lb.com");
/// ```
pub fn parse_pairs<I, K, V>(pairs: I) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    Config::default().parse_pairs(pairs)
}

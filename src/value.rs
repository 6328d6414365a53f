//! The tree produced by parsing a querystring.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// An ordered map of keys to nodes.
///
/// Keys keep the order in which they were first written.
pub type Mapping = IndexMap<String, Node>;

/// A parsed querystring value.
///
/// Every leaf is a string: the querystring format has no other scalar
/// types, and no attempt is made to guess them. Use
/// [`from_node`](crate::from_node) to turn a tree into typed data.
///
/// - `String`: leaf values such as the `bar` in `foo=bar`
/// - `Sequence`: arrays, from `a[]=1&a[]=2`, `a[0]=1&a[1]=2` or repeated keys
/// - `Mapping`: nested objects like `user[name]=John&user[age]=30`
#[derive(Clone, PartialEq, Eq)]
pub enum Node {
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    /// A short name for the kind of node, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Looks up the element at `index` if this node is a sequence.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        self.as_sequence().and_then(|seq| seq.get(index))
    }

    /// Number of children of a sequence or mapping. Strings have none.
    pub fn len(&self) -> usize {
        match self {
            Node::String(_) => 0,
            Node::Sequence(seq) => seq.len(),
            Node::Mapping(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Node {
    /// The empty mapping, which is what an empty querystring parses to.
    fn default() -> Self {
        Node::Mapping(Mapping::new())
    }
}

impl Index<&str> for Node {
    type Output = Node;

    /// # Panics
    ///
    /// Panics if the node is not a mapping or has no such key.
    fn index(&self, key: &str) -> &Node {
        match self.get(key) {
            Some(node) => node,
            None => panic!("no key {key:?} in {} node", self.kind()),
        }
    }
}

impl Index<usize> for Node {
    type Output = Node;

    /// # Panics
    ///
    /// Panics if the node is not a sequence or the index is out of bounds.
    fn index(&self, index: usize) -> &Node {
        match self.get_index(index) {
            Some(node) => node,
            None => panic!("no index {index} in {} node", self.kind()),
        }
    }
}

impl PartialEq<str> for Node {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Node {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(seq: Vec<Node>) -> Self {
        Node::Sequence(seq)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Node::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(s) => write!(f, "String({s:?})"),
            Node::Sequence(seq) => f.debug_list().entries(seq.iter()).finish(),
            Node::Mapping(map) => f.debug_map().entries(map.iter()).finish(),
        }
    }
}

impl fmt::Display for Node {
    /// Compact, JSON-like rendering: `{"a": ["1", "2"]}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(s) => write!(f, "{s:?}"),
            Node::Sequence(seq) => {
                f.write_str("[")?;
                for (i, node) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{node}")?;
                }
                f.write_str("]")
            }
            Node::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, node)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {node}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(seq) => serializer.collect_seq(seq),
            Node::Mapping(map) => serializer.collect_map(map),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Mapping, Node};

    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        Node::from_iter([
            ("name", Node::from("tj")),
            ("tags", Node::from_iter([Node::from("a"), Node::from("b")])),
        ])
    }

    #[test]
    fn index_and_accessors() {
        let node = sample();
        assert_eq!(node["name"], "tj");
        assert_eq!(node["tags"][1], "b");
        assert_eq!(node.get("missing"), None);
        assert_eq!(node["tags"].get("name"), None);
        assert_eq!(node["tags"].len(), 2);
        assert!(node["name"].is_empty());
    }

    #[test]
    #[should_panic(expected = "no key \"missing\"")]
    fn index_missing_key_panics() {
        let _ = &sample()["missing"];
    }

    #[test]
    fn default_is_empty_mapping() {
        assert_eq!(Node::default(), Node::Mapping(Mapping::new()));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(sample().to_string(), r#"{"name": "tj", "tags": ["a", "b"]}"#);
    }

    #[test]
    fn serializes_in_insertion_order() {
        let node = Node::from_iter([("z", Node::from("1")), ("a", Node::from("2"))]);
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"z":"1","a":"2"}"#);
    }
}

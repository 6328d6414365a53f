//! Deserialization of parsed trees into typed data.
//!
//! There are two `Deserializer` objects here: `QsDeserializer` and
//! `NodeDeserializer`.
//!
//! The former sits at the root of a parsed querystring, which is always a
//! mapping, and so only supports map-like outputs (structs, maps and enums).
//!
//! `NodeDeserializer` handles everything below that. Leaves are strings,
//! handed to `StringParsingDeserializer`, which parses them into whatever
//! primitive is asked for.

mod string_parser;

use indexmap::map::IntoIter;
use serde::de::{self, Deserializer as _};
use serde::forward_to_deserialize_any;

use crate::error::{Error, Result};
use crate::value::{Mapping, Node};

use string_parser::StringParsingDeserializer;

/// Deserializes a querystring from a `&str`.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Query {
///     name: String,
///     age: u8,
///     tags: Vec<String>,
/// }
///
/// let q = Query {
///     name: "Alice".to_owned(),
///     age: 24,
///     tags: vec!["a".to_owned(), "b".to_owned()],
/// };
///
/// assert_eq!(
///     qs_value::from_str::<Query>("name=Alice&age=24&tags[]=a&tags[]=b").unwrap(),
///     q
/// );
/// ```
pub fn from_str<T: de::DeserializeOwned>(input: &str) -> Result<T> {
    crate::Config::default().deserialize_str(input)
}

/// Deserializes an already parsed tree, or any part of one.
///
/// ```
/// let tree = qs_value::parse("ids[]=1&ids[]=2");
/// let ids: Vec<u32> = qs_value::from_node(tree["ids"].clone()).unwrap();
/// assert_eq!(ids, [1, 2]);
/// ```
pub fn from_node<T: de::DeserializeOwned>(node: Node) -> Result<T> {
    T::deserialize(NodeDeserializer(node))
}

pub(crate) fn from_root<T: de::DeserializeOwned>(node: Node) -> Result<T> {
    match node {
        Node::Mapping(map) => T::deserialize(QsDeserializer(map)),
        other => from_node(other),
    }
}

macro_rules! top_level_unsupported {
    ($($method:ident => $object:literal),*) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(Error::top_level($object))
            }
        )*
    };
}

/// A deserializer for the root of a querystring.
///
/// Supported top-level outputs are structs, maps and enums.
struct QsDeserializer(Mapping);

impl<'de> de::Deserializer<'de> for QsDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(NodeMap::new(self.0))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        NodeDeserializer(Node::Mapping(self.0)).deserialize_enum(name, variants, visitor)
    }

    /// Throws an error.
    ///
    /// Sequences are not supported at the top level.
    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("sequence"))
    }

    /// Throws an error.
    ///
    /// Tuples are not supported at the top level.
    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("tuple"))
    }

    /// Throws an error.
    ///
    /// TupleStructs are not supported at the top level.
    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("tuple struct"))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("unit struct"))
    }

    top_level_unsupported! {
        deserialize_bool => "primitive",
        deserialize_i8 => "primitive",
        deserialize_i16 => "primitive",
        deserialize_i32 => "primitive",
        deserialize_i64 => "primitive",
        deserialize_u8 => "primitive",
        deserialize_u16 => "primitive",
        deserialize_u32 => "primitive",
        deserialize_u64 => "primitive",
        deserialize_f32 => "primitive",
        deserialize_f64 => "primitive",
        deserialize_char => "primitive",
        deserialize_str => "string",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit"
    }

    forward_to_deserialize_any! {
        identifier
    }
}

/// Deserializes any node below the root.
struct NodeDeserializer(Node);

macro_rules! deserialize_primitive {
    ($method:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.0 {
                Node::String(s) => StringParsingDeserializer::<Error>::new(s).$method(visitor),
                other => NodeDeserializer(other).deserialize_any(visitor),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for NodeDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::String(s) => visitor.visit_string(s),
            Node::Sequence(seq) => visitor.visit_seq(NodeSeq(seq.into_iter())),
            Node::Mapping(map) => visitor.visit_map(NodeMap::new(map)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::String(s) if s.is_empty() => visitor.visit_none(),
            other => visitor.visit_some(NodeDeserializer(other)),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::String(s) if s.is_empty() => visitor.visit_unit(),
            other => NodeDeserializer(other).deserialize_any(visitor),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// A single string is accepted as a sequence of one element, since
    /// `ids=1` is how a one-element list is often written.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::Sequence(seq) => visitor.visit_seq(NodeSeq(seq.into_iter())),
            Node::String(s) => visitor.visit_seq(NodeSeq(std::iter::once(Node::String(s)))),
            Node::Mapping(_) => Err(Error::unexpected("sequence", "mapping")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::Mapping(map) => visitor.visit_map(NodeMap::new(map)),
            other => Err(Error::unexpected("mapping", other.kind())),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Node::String(s) => visitor.visit_enum(StringParsingDeserializer::<Error>::new(s)),
            Node::Mapping(map) if map.len() == 1 => {
                let mut iter = map.into_iter();
                match iter.next() {
                    Some((variant, value)) => visitor.visit_enum(NodeEnum { variant, value }),
                    None => Err(Error::unexpected("single-key mapping", "empty mapping")),
                }
            }
            Node::Mapping(_) => Err(Error::unexpected("single-key mapping", "mapping")),
            Node::Sequence(_) => Err(Error::unexpected("enum", "sequence")),
        }
    }

    deserialize_primitive!(deserialize_bool);
    deserialize_primitive!(deserialize_i8);
    deserialize_primitive!(deserialize_i16);
    deserialize_primitive!(deserialize_i32);
    deserialize_primitive!(deserialize_i64);
    deserialize_primitive!(deserialize_i128);
    deserialize_primitive!(deserialize_u8);
    deserialize_primitive!(deserialize_u16);
    deserialize_primitive!(deserialize_u32);
    deserialize_primitive!(deserialize_u64);
    deserialize_primitive!(deserialize_u128);
    deserialize_primitive!(deserialize_f32);
    deserialize_primitive!(deserialize_f64);
    deserialize_primitive!(deserialize_char);

    forward_to_deserialize_any! {
        str string bytes byte_buf identifier ignored_any
    }
}

struct NodeSeq<I: Iterator<Item = Node>>(I);

impl<'de, I: Iterator<Item = Node>> de::SeqAccess<'de> for NodeSeq<I> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.0.next() {
            Some(node) => seed.deserialize(NodeDeserializer(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.0.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct NodeMap {
    iter: IntoIter<String, Node>,
    value: Option<Node>,
}

impl NodeMap {
    fn new(map: Mapping) -> Self {
        NodeMap {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for NodeMap {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(StringParsingDeserializer::<Error>::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(NodeDeserializer(value)),
            None => Err(de::Error::custom(
                "Somehow the map was empty after a non-empty key was returned",
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// An enum written as a single-key mapping: `shape[circle][radius]=1`.
struct NodeEnum {
    variant: String,
    value: Node,
}

impl<'de> de::EnumAccess<'de> for NodeEnum {
    type Error = Error;
    type Variant = NodeDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringParsingDeserializer::<Error>::new(self.variant))?;
        Ok((variant, NodeDeserializer(self.value)))
    }
}

impl<'de> de::VariantAccess<'de> for NodeDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod test {
    use super::{from_node, from_root};
    use crate::error::Error;
    use crate::value::Node;

    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Address {
        city: String,
        postcode: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct QueryParams {
        id: u8,
        name: String,
        address: Address,
        phone: u32,
        user_ids: Vec<u8>,
    }

    #[test]
    fn nested_struct() {
        let tree = crate::parse(
            "name=Acme&id=42&phone=12345&address[postcode]=12345&\
             address[city]=Carrot+City&user_ids[0]=1&user_ids[1]=2&\
             user_ids[2]=3&user_ids[3]=4",
        );
        let params: QueryParams = from_root(tree).unwrap();
        assert_eq!(
            params,
            QueryParams {
                id: 42,
                name: "Acme".to_string(),
                phone: 12345,
                address: Address {
                    city: "Carrot City".to_string(),
                    postcode: "12345".to_string(),
                },
                user_ids: vec![1, 2, 3, 4],
            }
        );
    }

    #[test]
    fn numeric_map_keys() {
        let tree = crate::parse("a[3]=x&a[y]=z");
        let map: HashMap<String, BTreeMap<String, String>> = from_root(tree).unwrap();
        assert_eq!(map["a"]["3"], "x");

        let tree = crate::parse("scores[7]=1&scores[x]=2");
        #[derive(Debug, Deserialize)]
        struct Scores {
            scores: HashMap<String, u8>,
        }
        let scores: Scores = from_root(tree).unwrap();
        assert_eq!(scores.scores["7"], 1);
    }

    #[test]
    fn options() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Query {
            a: Option<u8>,
            b: Option<u8>,
            c: Option<u8>,
        }
        let query: Query = from_root(crate::parse("a=1&b=")).unwrap();
        assert_eq!(
            query,
            Query {
                a: Some(1),
                b: None,
                c: None
            }
        );
    }

    #[test]
    fn single_value_as_sequence() {
        let ids: Vec<u32> = from_node(Node::from("7")).unwrap();
        assert_eq!(ids, vec![7]);
    }

    #[test]
    fn enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Shape {
            Point,
            Circle { radius: f64 },
            Named(String),
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Query {
            shapes: Vec<Shape>,
        }

        let query: Query = from_root(crate::parse(
            "shapes[0]=point&shapes[1][circle][radius]=1.5&shapes[2][named]=x",
        ))
        .unwrap();
        assert_eq!(
            query.shapes,
            vec![
                Shape::Point,
                Shape::Circle { radius: 1.5 },
                Shape::Named("x".to_string())
            ]
        );
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let err = from_root::<Vec<String>>(crate::parse("a=1")).unwrap_err();
        assert!(matches!(err, Error::TopLevel("sequence")), "got: {err}");
    }

    #[test]
    fn wrong_shape() {
        let err = from_node::<HashMap<String, String>>(Node::from("x")).unwrap_err();
        assert_eq!(err.to_string(), "invalid node: expected mapping, found string");
    }

    #[test]
    fn unparsable_primitive() {
        #[derive(Debug, Deserialize)]
        struct Query {
            #[allow(dead_code)]
            id: u8,
        }
        let err = from_root::<Query>(crate::parse("id=abc")).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "got: {err}");
    }
}

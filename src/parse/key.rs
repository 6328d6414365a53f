//! Splitting a decoded key such as `user[names][]` into its path.

use std::fmt;

/// Names that would alias the shared base object in JavaScript, where this
/// querystring convention comes from.
///
/// A key containing any of these as a name segment is dropped entirely, so
/// that trees produced here are safe to hand on to code that turns them
/// into JavaScript objects.
pub const RESERVED_NAMES: &[&str] = &[
    "__proto__",
    "constructor",
    "prototype",
    "toString",
    "toLocaleString",
    "valueOf",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
];

/// One bracketed component of a key.
///
/// Segments can be names (for object keys), integers (for array indices),
/// or empty brackets meaning "append". This allows handling `user[name]`,
/// `items[0]` and `items[]` alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'k> {
    Name(&'k str),
    Index(usize),
    Append,
}

impl<'k> Segment<'k> {
    fn from_content(content: &'k str) -> Self {
        if content.is_empty() {
            return Segment::Append;
        }
        if content.bytes().all(|b| b.is_ascii_digit()) {
            // too large for an index: fall back to the string case
            if let Ok(index) = content.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Name(content)
    }
}

/// A parsed key: the root name, then zero or more bracket segments.
///
/// Parsing is lenient and never fails on malformed brackets:
/// - a `[` without a closing `]` is kept as literal text;
/// - text after a closing `]` that does not open a new group, and everything
///   beyond the configured depth, becomes one final literal name;
/// - a key starting with `[` takes its first group as the root name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPath<'k> {
    root: &'k str,
    segments: Vec<Segment<'k>>,
}

impl<'k> KeyPath<'k> {
    /// Parses `key`, returning `None` when it has an empty root (and so
    /// cannot produce an entry).
    pub fn parse(key: &'k str, max_depth: usize) -> Option<Self> {
        let (mut root, mut rest) = match key.find('[') {
            Some(open) if max_depth > 0 && key[open..].contains(']') => key.split_at(open),
            _ => (key, ""),
        };

        if root.is_empty() && !rest.is_empty() {
            let close = rest.find(']')?;
            root = &rest[1..close];
            rest = &rest[close + 1..];
        }
        if root.is_empty() {
            return None;
        }

        let mut segments = Vec::new();
        while !rest.is_empty() {
            let close = match rest.find(']') {
                Some(close) if rest.starts_with('[') && segments.len() < max_depth => close,
                _ => {
                    segments.push(Segment::Name(rest));
                    break;
                }
            };
            segments.push(Segment::from_content(&rest[1..close]));
            rest = &rest[close + 1..];
        }

        Some(KeyPath { root, segments })
    }

    pub fn root(&self) -> &'k str {
        self.root
    }

    /// The segments after the root, in order.
    pub fn segments(&self) -> &[Segment<'k>] {
        &self.segments
    }

    /// Returns the first reserved name used anywhere in the path.
    pub fn reserved_name(&self) -> Option<&'k str> {
        std::iter::once(self.root)
            .chain(self.segments.iter().filter_map(|segment| match segment {
                Segment::Name(name) => Some(*name),
                _ => None,
            }))
            .find(|name| RESERVED_NAMES.contains(name))
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Name(name) => write!(f, "[{name}]")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Append => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

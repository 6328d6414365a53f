//! Parsing querystrings into a [`Node`] tree.
//!
//! Parsing happens in two steps. [`tokenize`] splits the input on `&` into
//! `key=value` pairs and percent-decodes both sides. Each decoded key is then
//! split into a [`KeyPath`] and its value merged into a growing tree, in
//! input order. Once all pairs are in, containers whose keys are all indices
//! are turned into sequences.

use std::borrow::Cow;
use std::str::Split;

use crate::Config;
use crate::value::Node;

mod decode;
pub mod key;
mod merge;

use key::KeyPath;
use merge::Accumulator;

pub use decode::decode;

/// Splits an encoded querystring into decoded `(key, value)` pairs.
///
/// - Empty segments (`a=1&&b=2`, a trailing `&`) are skipped.
/// - A segment without `=` has an empty value.
/// - A segment whose decoded key is empty is skipped.
/// - Decoding never fails: see [`decode`].
///
/// ```
/// let pairs: Vec<_> = qs_value::tokenize("a=1&b&c=x=y&&=z").collect();
/// assert_eq!(pairs.len(), 3);
/// assert_eq!(pairs[1], ("b".into(), "".into()));
/// assert_eq!(pairs[2], ("c".into(), "x=y".into()));
/// ```
pub fn tokenize(input: &str) -> Pairs<'_> {
    Pairs {
        inner: input.split('&'),
    }
}

/// Iterator over the decoded pairs of a querystring, created by [`tokenize`].
#[derive(Clone, Debug)]
pub struct Pairs<'qs> {
    inner: Split<'qs, char>,
}

impl<'qs> Iterator for Pairs<'qs> {
    type Item = (Cow<'qs, str>, Cow<'qs, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let segment = self.inner.next()?;
            if segment.is_empty() {
                continue;
            }
            let (key, value) = split_pair(segment);
            let key = decode(key);
            if key.is_empty() {
                continue;
            }
            return Some((key, decode(value)));
        }
    }
}

/// Splits a segment at the `=` that ends its key.
///
/// This is the first `=` outside of any `[...]` group, so that keys like
/// `a[<=>]` survive intact. When every `=` sits inside an unterminated group
/// the first one is used instead.
fn split_pair(segment: &str) -> (&str, &str) {
    let mut in_brackets = false;
    let mut first_eq = None;
    for (idx, b) in segment.bytes().enumerate() {
        match b {
            b'[' => in_brackets = true,
            b']' => in_brackets = false,
            b'=' if !in_brackets => return (&segment[..idx], &segment[idx + 1..]),
            b'=' if first_eq.is_none() => first_eq = Some(idx),
            _ => {}
        }
    }
    match first_eq {
        Some(idx) => (&segment[..idx], &segment[idx + 1..]),
        None => (segment, ""),
    }
}

pub(crate) fn parse_str(input: &str, config: Config) -> Node {
    let mut acc = Accumulator::default();
    for (key, value) in tokenize(input) {
        insert(&mut acc, &key, value.into_owned(), config);
    }
    acc.finish()
}

pub(crate) fn parse_pairs<I, K, V>(pairs: I, config: Config) -> Node
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut acc = Accumulator::default();
    for (key, value) in pairs {
        insert(&mut acc, key.as_ref(), value.into(), config);
    }
    acc.finish()
}

fn insert(acc: &mut Accumulator, key: &str, value: String, config: Config) {
    let Some(path) = KeyPath::parse(key, config.max_depth) else {
        // empty keys never produce an entry
        return;
    };
    if let Some(name) = path.reserved_name() {
        tracing::debug!(key, name, "dropping key with a reserved name");
        return;
    }
    tracing::trace!(key = %path, "merging pair");
    acc.merge(&path, value);
}

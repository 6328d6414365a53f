//! Folding decoded pairs into a tree.
//!
//! Containers are built as ordered maps while pairs are merged, even when
//! they are written through indices (`a[0]=x`) or appends (`a[]=x`), since a
//! later non-numeric sibling can still turn them into objects. Once every
//! pair is in, [`Accumulator::finish`] decides bottom-up which containers
//! become sequences.

use std::cmp::Ordering;
use std::mem;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::key::{KeyPath, Segment};
use crate::value::{Mapping, Node};

/// A node under construction.
#[derive(Debug, PartialEq)]
enum Slot {
    Value(String),
    /// Repeated writes of plain values to the same key, e.g. `k=a&k=b`.
    Values(Vec<String>),
    Table(Table),
}

/// A container under construction, keyed by names and stringified indices.
#[derive(Debug, Default, PartialEq)]
struct Table {
    entries: IndexMap<String, Slot>,
    /// One past the highest index written so far; where appends go.
    next_index: usize,
    /// Lowest index that may still be free once `next_index` has saturated.
    spare_index: usize,
    /// Whether any key is not an index, which keeps this a mapping.
    named: bool,
}

/// The root of the tree being built.
#[derive(Debug, Default)]
pub struct Accumulator {
    root: Table,
}

/// Whether a key renders an index, and so may become a sequence position.
fn is_index(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Orders index keys numerically, whatever their length.
fn cmp_index(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.cmp(b))
}

impl Slot {
    fn kind(&self) -> &'static str {
        match self {
            Slot::Value(_) => "value",
            Slot::Values(_) => "values",
            Slot::Table(_) => "table",
        }
    }

    /// Returns the container to descend into. Repeated values are turned into
    /// an indexed table; a single value cannot be descended into, in which
    /// case the kind found is returned instead.
    fn as_table_mut(&mut self) -> Result<&mut Table, &'static str> {
        if let Slot::Values(values) = self {
            let values = mem::take(values);
            *self = Slot::Table(Table::from_values(values));
        }
        match self {
            Slot::Table(table) => Ok(table),
            other => Err(other.kind()),
        }
    }

    /// Returns the container an append writes to, moving any existing values
    /// into it first.
    fn as_append_target(&mut self) -> &mut Table {
        match self {
            Slot::Table(_) => {}
            Slot::Value(value) => {
                let value = mem::take(value);
                *self = Slot::Table(Table::from_values(vec![value]));
            }
            Slot::Values(values) => {
                let values = mem::take(values);
                *self = Slot::Table(Table::from_values(values));
            }
        }
        match self {
            Slot::Table(table) => table,
            _ => unreachable!("slot was just made a table"),
        }
    }

    fn into_node(self) -> Node {
        match self {
            Slot::Value(value) => Node::String(value),
            Slot::Values(values) => Node::Sequence(values.into_iter().map(Node::String).collect()),
            Slot::Table(table) => table.into_node(),
        }
    }
}

impl Table {
    fn from_values(values: Vec<String>) -> Self {
        let mut table = Table::default();
        for value in values {
            table.push(Slot::Value(value));
        }
        table
    }

    fn note_index(&mut self, index: usize) {
        if index >= self.next_index {
            self.next_index = index.saturating_add(1);
        }
    }

    /// The map key for `segment`, recording what it tells us about the
    /// container's shape.
    fn key_for(&mut self, segment: Segment<'_>) -> String {
        let key = match segment {
            Segment::Name(name) => name.to_owned(),
            Segment::Index(index) => {
                self.note_index(index);
                itoa::Buffer::new().format(index).to_owned()
            }
            // `[]` in the middle of a key has no position to refer to
            Segment::Append => String::new(),
        };
        if !is_index(&key) {
            self.named = true;
        }
        key
    }

    /// The slot at `key`, created as an empty table when missing.
    fn child(&mut self, key: String) -> &mut Slot {
        self.entries
            .entry(key)
            .or_insert_with(|| Slot::Table(Table::default()))
    }

    fn next_free_index(&mut self) -> usize {
        let mut buffer = itoa::Buffer::new();
        if !self.entries.contains_key(buffer.format(self.next_index)) {
            return self.next_index;
        }
        // only once `usize::MAX` itself has been used as an index
        while self.entries.contains_key(buffer.format(self.spare_index)) {
            self.spare_index += 1;
        }
        self.spare_index
    }

    fn push(&mut self, slot: Slot) {
        let index = self.next_free_index();
        self.note_index(index);
        let key = itoa::Buffer::new().format(index).to_owned();
        self.entries.insert(key, slot);
    }

    /// Writes a plain value to `key`, combining it with whatever is there.
    ///
    /// Returns `false` when the existing node is a named table, which a plain
    /// value can neither replace nor join.
    fn combine(&mut self, key: String, value: String) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(v) => {
                v.insert(Slot::Value(value));
            }
            Entry::Occupied(mut o) => {
                let slot = o.get_mut();
                match slot {
                    Slot::Value(existing) => {
                        let existing = mem::take(existing);
                        *slot = Slot::Values(vec![existing, value]);
                    }
                    Slot::Values(values) => values.push(value),
                    Slot::Table(table) if !table.named => table.push(Slot::Value(value)),
                    Slot::Table(_) => return false,
                }
            }
        }
        true
    }

    /// Converts this table to a sequence when every key is an index,
    /// ordering by the numeric value of the keys and closing any gaps.
    fn into_node(self) -> Node {
        if self.named {
            return Node::Mapping(self.into_mapping());
        }
        let mut entries: Vec<(String, Slot)> = self.entries.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| cmp_index(a, b));
        Node::Sequence(entries.into_iter().map(|(_, slot)| slot.into_node()).collect())
    }

    fn into_mapping(self) -> Mapping {
        self.entries
            .into_iter()
            .map(|(key, slot)| (key, slot.into_node()))
            .collect()
    }
}

impl Accumulator {
    /// Writes `value` at `path`.
    ///
    /// A write that conflicts with the kind of node already in place (such as
    /// `a[x]=1&a[x][y]=2`, where `a[x]` is already a value) is skipped: the
    /// first node written at a position decides its kind.
    pub fn merge(&mut self, path: &KeyPath<'_>, value: String) {
        let Some((last, middle)) = path.segments().split_last() else {
            if !self.root.combine(path.root().to_owned(), value) {
                tracing::debug!(key = %path, "skipping value written over a nested map");
            }
            return;
        };

        let mut slot = self.root.child(path.root().to_owned());
        for segment in middle {
            let table = match slot.as_table_mut() {
                Ok(table) => table,
                Err(found) => {
                    tracing::debug!(key = %path, found, "skipping key nested under a value");
                    return;
                }
            };
            let key = table.key_for(*segment);
            slot = table.child(key);
        }

        if *last == Segment::Append {
            let table = slot.as_append_target();
            // `a[]` and `a[]=` create the sequence but add nothing to it
            if !value.is_empty() {
                table.push(Slot::Value(value));
            }
            return;
        }

        let table = match slot.as_table_mut() {
            Ok(table) => table,
            Err(found) => {
                tracing::debug!(key = %path, found, "skipping key nested under a value");
                return;
            }
        };
        let key = table.key_for(*last);
        if !table.combine(key, value) {
            tracing::debug!(key = %path, "skipping value written over a nested map");
        }
    }

    /// Finishes the tree. The root always stays a mapping.
    pub fn finish(self) -> Node {
        Node::Mapping(self.root.into_mapping())
    }
}

//! Parsed representation of a TRE's contents

use derive_more::derive::{Deref, IntoIterator};
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::schema::FieldType;
use crate::value::FieldValue;

/// A leaf value of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleEntry {
    name: String,
    value: FieldValue,
}

impl SimpleEntry {
    /// Create an entry from its stored representation
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>, field_type: FieldType) -> Self {
        Self::from_value(name, FieldValue::new(value, field_type))
    }

    /// Create an entry from an already wrapped value
    pub fn from_value(name: impl Into<String>, value: FieldValue) -> Self {
        SimpleEntry {
            name: name.into(),
            value,
        }
    }

    /// Name of the field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored value
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The declared type of the stored value
    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }

    /// The stored bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// The stored value as text
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.value.text()
    }

    /// The value as a 32 bit integer
    pub fn int_value(&self) -> Result<i32> {
        self.value.to_i32().map_err(|source| self.invalid(source))
    }

    /// The value as a 64 bit integer
    pub fn long_value(&self) -> Result<i64> {
        self.value.to_i64().map_err(|source| self.invalid(source))
    }

    /// The value as an unsigned integer of any size
    pub fn big_uint_value(&self) -> Result<BigUint> {
        self.value.to_big_uint().map_err(|source| self.invalid(source))
    }

    /// The value as a double
    pub fn double_value(&self) -> Result<f64> {
        self.value.to_f64().map_err(|source| self.invalid(source))
    }

    fn invalid(&self, source: crate::error::ValueError) -> Error {
        Error::InvalidValue {
            name: self.name.clone(),
            source,
        }
    }
}

/// The iterations of a repeating group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupListEntry {
    name: String,
    groups: Vec<Group>,
}

impl GroupListEntry {
    /// Create an empty group list
    pub fn new(name: impl Into<String>) -> Self {
        GroupListEntry {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Name of the loop
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One group per iteration, in order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Append the next iteration
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Number of iterations
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no iterations
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A node of the value tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A field value
    Simple(SimpleEntry),
    /// A repeating group
    GroupList(GroupListEntry),
}

impl Entry {
    /// Name of the field or loop
    pub fn name(&self) -> &str {
        match self {
            Entry::Simple(entry) => entry.name(),
            Entry::GroupList(entry) => entry.name(),
        }
    }
}

impl From<SimpleEntry> for Entry {
    fn from(value: SimpleEntry) -> Self {
        Entry::Simple(value)
    }
}

impl From<GroupListEntry> for Entry {
    fn from(value: GroupListEntry) -> Self {
        Entry::GroupList(value)
    }
}

/// An ordered list of entries
///
/// The order is the schema order and serialization replays it, so entries built by hand must be
/// added in the order their fields appear in the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct Group {
    #[into_iterator(owned, ref)]
    entries: Vec<Entry>,
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn add(&mut self, entry: impl Into<Entry>) {
        self.entries.push(entry.into());
    }

    /// Append every entry of `other`
    pub fn append(&mut self, other: Group) {
        self.entries.extend(other.entries);
    }

    /// The entries in order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The first entry named `name`
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// The first field value named `name`
    pub fn simple(&self, name: &str) -> Option<&SimpleEntry> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Simple(simple) if simple.name() == name => Some(simple),
            _ => None,
        })
    }

    /// The first group list named `name`
    pub fn group_list(&self, name: &str) -> Option<&GroupListEntry> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::GroupList(list) if list.name() == name => Some(list),
            _ => None,
        })
    }

    /// The stored text of the field `name`
    pub fn field_value(&self, name: &str) -> Result<std::borrow::Cow<'_, str>> {
        self.require(name).map(SimpleEntry::text)
    }

    /// The value of the field `name` as a 32 bit integer
    pub fn int_value(&self, name: &str) -> Result<i32> {
        self.require(name)?.int_value()
    }

    /// The value of the field `name` as a 64 bit integer
    pub fn long_value(&self, name: &str) -> Result<i64> {
        self.require(name)?.long_value()
    }

    /// The value of the field `name` as an unsigned integer of any size
    pub fn big_uint_value(&self, name: &str) -> Result<BigUint> {
        self.require(name)?.big_uint_value()
    }

    /// The value of the field `name` as a double
    pub fn double_value(&self, name: &str) -> Result<f64> {
        self.require(name)?.double_value()
    }

    fn require(&self, name: &str) -> Result<&SimpleEntry> {
        self.simple(name)
            .ok_or_else(|| crate::error::FieldError::MissingEntry(name.to_owned()).into())
    }
}

impl FromIterator<Entry> for Group {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Group {
            entries: iter.into_iter().collect(),
        }
    }
}

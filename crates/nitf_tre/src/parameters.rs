//! Values of already processed fields, used to resolve lengths, loop counts and conditions

use indexmap::IndexMap;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::schema::FieldType;
use crate::value::FieldValue;

/// Sequential symbol table for one parse or serialize pass of a single TRE
///
/// Values are visible to every field processed after them, regardless of loop nesting. A name
/// that is recorded again (for example once per loop iteration) shadows the earlier value.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    values: IndexMap<String, FieldValue>,
}

impl ParameterTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of `name`
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>, field_type: FieldType) {
        self.insert(name, FieldValue::new(value, field_type));
    }

    /// Record an already wrapped value under `name`
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Whether `name` has been recorded
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of recorded names
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored value of `name`
    pub fn get(&self, name: &str) -> Result<&FieldValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::ParameterNotFound(name.to_owned()))
    }

    /// The stored bytes of `name`
    pub fn get_text(&self, name: &str) -> Result<&[u8]> {
        self.get(name).map(FieldValue::as_bytes)
    }

    /// The value of `name` as a 32 bit integer
    pub fn get_int(&self, name: &str) -> Result<i32> {
        self.get(name)?.to_i32().map_err(|source| invalid(name, source))
    }

    /// The value of `name` as a 64 bit integer
    pub fn get_long(&self, name: &str) -> Result<i64> {
        self.get(name)?.to_i64().map_err(|source| invalid(name, source))
    }

    /// The value of `name` as an unsigned integer of any size
    pub fn get_big_uint(&self, name: &str) -> Result<BigUint> {
        self.get(name)?
            .to_big_uint()
            .map_err(|source| invalid(name, source))
    }

    /// The value of `name` as a double
    pub fn get_double(&self, name: &str) -> Result<f64> {
        self.get(name)?.to_f64().map_err(|source| invalid(name, source))
    }

    /// The value of `name` as a non-negative length or count
    pub fn get_count(&self, name: &str) -> Result<usize> {
        let value = self.get_long(name)?;
        usize::try_from(value).map_err(|_| Error::InvalidCount {
            name: name.to_owned(),
            value,
        })
    }
}

fn invalid(name: &str, source: crate::error::ValueError) -> Error {
    Error::InvalidValue {
        name: name.to_owned(),
        source,
    }
}

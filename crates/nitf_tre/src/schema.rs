//! Schema model describing the byte layout of each TRE tag.
//!
//! A [`Schema`] is an ordered list of [`SchemaNode`]s. Fields are read and written in order,
//! loops repeat their children and conditionals include their children only when their
//! condition holds against the values parsed so far.

use bon::Builder;
use derive_more::derive::Display;
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::parameters::ParameterTable;
use crate::types::MAX_BODY_LENGTH;

/// Declared type of a field, which drives numeric access and serialization padding
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// ASCII text, right padded with spaces
    #[default]
    #[display("string")]
    #[cfg_attr(feature = "serde", serde(rename = "string"))]
    String,

    /// ASCII decimal integer, left padded with zeros
    #[display("integer")]
    #[cfg_attr(feature = "serde", serde(rename = "integer"))]
    Integer,

    /// ASCII decimal real, fixed point or exponential
    #[display("real")]
    #[cfg_attr(feature = "serde", serde(rename = "real"))]
    Real,

    /// Binary unsigned integer of any width, most significant byte first
    #[display("UINT")]
    #[cfg_attr(feature = "serde", serde(rename = "UINT"))]
    UnsignedBigEndian,

    /// Binary 4 or 8 byte big endian IEEE-754 float
    #[display("IEEE754")]
    #[cfg_attr(feature = "serde", serde(rename = "IEEE754"))]
    Ieee754,
}

/// Text format used when serializing a [`FieldType::Real`] field
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RealFormat {
    /// Zero padded fixed point, e.g. `0012.500`
    #[default]
    #[display("fixed")]
    #[cfg_attr(feature = "serde", serde(rename = "fixed"))]
    Fixed,

    /// Exponential notation with a two digit signed exponent, e.g. `1.250000E+01`
    #[display("UE")]
    #[cfg_attr(feature = "serde", serde(rename = "UE"))]
    Exponential,
}

/// Where the byte length of a field comes from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldLength {
    /// A literal number of bytes
    Fixed(usize),

    /// The integer value of a previously parsed field
    Field(String),
}

impl FieldLength {
    /// The length in bytes, given the values processed so far
    ///
    /// Lengths read from a field may not exceed the largest possible body.
    pub fn resolve(&self, params: &ParameterTable) -> Result<usize> {
        match self {
            FieldLength::Fixed(length) => Ok(*length),
            FieldLength::Field(name) => {
                let length = params.get_count(name)?;
                if length > MAX_BODY_LENGTH {
                    return Err(Error::LengthTooLarge {
                        name: name.clone(),
                        length,
                    });
                }
                Ok(length)
            }
        }
    }
}

/// Where the number of iterations of a loop comes from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RepeatCount {
    /// A literal number of iterations
    Fixed(usize),

    /// The integer value of a previously parsed field
    Field(String),

    /// One of the formulas understood by [`crate::formula::Formula`]
    Formula(String),
}

impl RepeatCount {
    /// The number of iterations, given the values processed so far
    pub fn resolve(&self, params: &ParameterTable) -> Result<usize> {
        match self {
            RepeatCount::Fixed(count) => Ok(*count),
            RepeatCount::Field(name) => params.get_count(name),
            RepeatCount::Formula(formula) => {
                let value = Formula::compute(formula, params)?;
                usize::try_from(value).map_err(|_| Error::InvalidCount {
                    name: formula.clone(),
                    value,
                })
            }
        }
    }
}

/// Header placement a tag is restricted to
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Location {
    /// File header user defined or extended header data
    #[display("file")]
    File,

    /// Image subheader user defined or extended subheader data
    #[display("image")]
    Image,
}

/// A single field of a TRE
///
/// A field without a name is filler: it is skipped when parsing and written as its fixed value
/// (or spaces) when serializing. A field that only carries a long name is kept in the value tree
/// under that long name but is never visible to conditions, lengths or loop counts.
///
/// ```
/// use nitf_tre::schema::{FieldLength, FieldSchema, FieldType};
///
/// let field = FieldSchema::builder()
///     .name("NUMB")
///     .field_type(FieldType::Integer)
///     .length(FieldLength::Fixed(2))
///     .min_value(1.0)
///     .build();
///
/// assert_eq!(field.entry_name(), Some("NUMB"));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSchema {
    /// Name used in the value tree and the parameter table
    #[builder(into)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,

    /// Descriptive name, used in the value tree when `name` is empty
    #[builder(into)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub long_name: Option<String>,

    /// Declared type of the value
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub field_type: FieldType,

    /// Length of the value in bytes
    pub length: FieldLength,

    /// Inclusive lower bound for numeric values
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_value: Option<f64>,

    /// Inclusive upper bound for numeric values
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_value: Option<f64>,

    /// Text format for real values
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: Option<RealFormat>,

    /// Literal value written for filler fields
    #[builder(into)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub fixed_value: Option<String>,
}

impl FieldSchema {
    /// Name of the entry this field produces in the value tree, or `None` for filler
    pub fn entry_name(&self) -> Option<&str> {
        self.parameter_name().or_else(|| {
            self.long_name
                .as_deref()
                .filter(|long_name| !long_name.is_empty())
        })
    }

    /// Name this field is recorded under in the parameter table
    pub fn parameter_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A repeating group of nodes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopSchema {
    /// Name of the group list entry in the value tree
    pub name: String,

    /// How many times the children repeat
    pub count: RepeatCount,

    /// Nodes making up one iteration
    pub children: Vec<SchemaNode>,
}

/// Nodes included only when a condition holds
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConditionalSchema {
    /// Condition text, see [`crate::condition::Condition`]
    pub condition: String,

    /// Nodes spliced into the enclosing group when the condition holds
    pub children: Vec<SchemaNode>,
}

/// A node of a TRE layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SchemaNode {
    /// A single value
    Field(FieldSchema),
    /// A repeating group
    Loop(LoopSchema),
    /// A conditional block
    Conditional(ConditionalSchema),
}

impl SchemaNode {
    /// Create a loop node
    pub fn repeat(name: impl Into<String>, count: RepeatCount, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Loop(LoopSchema {
            name: name.into(),
            count,
            children,
        })
    }

    /// Create a conditional node
    pub fn when(condition: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Conditional(ConditionalSchema {
            condition: condition.into(),
            children,
        })
    }
}

impl From<FieldSchema> for SchemaNode {
    fn from(value: FieldSchema) -> Self {
        SchemaNode::Field(value)
    }
}

/// Layout of one TRE tag
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    /// Prefix used when the TRE's values are flattened into metadata
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: Option<String>,

    /// Header placement the tag is restricted to, `None` for anywhere
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Location>,

    /// Top level nodes in order
    pub nodes: Vec<SchemaNode>,
}

impl Schema {
    /// Create an unrestricted schema from its nodes
    pub fn new(nodes: Vec<SchemaNode>) -> Self {
        Schema {
            nodes,
            ..Default::default()
        }
    }

    /// Restrict the schema to a header placement
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the metadata prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Lookup of TRE layouts by tag
///
/// Implementations are only read while parsing and serializing, so one repository can be shared
/// by any number of concurrent parses. Registering new schemas while a parse is running is up to
/// the caller to serialize.
pub trait SchemaRepository {
    /// The layout of `tag`, or `None` when the tag is unknown
    fn lookup(&self, tag: &str) -> Option<&Schema>;
}

impl<T: SchemaRepository + ?Sized> SchemaRepository for &T {
    fn lookup(&self, tag: &str) -> Option<&Schema> {
        (**self).lookup(tag)
    }
}

/// In memory [`SchemaRepository`] keeping schemas in registration order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` for `tag`, returning the schema it replaced
    pub fn register(&mut self, tag: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.schemas.insert(tag.into(), schema)
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no tags are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the registered tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_ref())
    }

    /// Load a registry from a JSON object mapping tags to schemas
    #[cfg(feature = "serde")]
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::IOError(e.into()))
    }
}

impl SchemaRepository for SchemaRegistry {
    fn lookup(&self, tag: &str) -> Option<&Schema> {
        self.schemas.get(tag)
    }
}

//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::Location;
use crate::tre::TreSource;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`FieldError`]
    #[error(transparent)]
    Field(#[from] FieldError),

    /// parameter {0} has not been parsed yet
    #[error("parameter {0} has not been parsed yet")]
    ParameterNotFound(String),

    /// {name}: {source}
    #[error("{name}: {source}")]
    InvalidValue {
        /// Name of the field or parameter holding the value
        name: String,
        /// What was wrong with it
        #[source]
        source: ValueError,
    },

    /// {name} resolved to {value}, which is not a usable length or count
    #[error("{name} resolved to {value}, which is not a usable length or count")]
    InvalidCount {
        /// The field reference or formula that produced the value
        name: String,
        /// The resolved value
        value: i64,
    },

    /// {name} gives a length of {length}, longer than any tre body
    #[error("{name} gives a length of {length}, longer than any tre body")]
    LengthTooLarge {
        /// The field reference holding the length
        name: String,
        /// The resolved length
        length: usize,
    },

    /// formula `{0}` overflows
    #[error("formula `{0}` overflows")]
    FormulaOverflow(String),

    /// unsupported condition `{0}`
    #[error("unsupported condition `{0}`")]
    #[diagnostic(help("conditions take the form `A=x`, `A!=x`, `A!=` or `<condition> AND <condition>`"))]
    UnsupportedCondition(String),

    /// unknown formula `{0}`
    #[error("unknown formula `{0}`")]
    UnknownFormula(String),

    /// filler value `{value}` does not fit in {length} bytes
    #[error("filler value `{value}` does not fit in {length} bytes")]
    FillerTooLong {
        /// The fixed value declared for the filler
        value: String,
        /// The length of the filler
        length: usize,
    },

    /// {remaining} bytes were left over after parsing
    #[error("{remaining} bytes were left over after parsing")]
    TrailingData {
        /// Number of bytes the schema did not consume
        remaining: usize,
    },

    /// {tag} declares {length} bytes but only {remaining} remain in the area
    #[error("{tag} declares {length} bytes but only {remaining} remain in the area")]
    TruncatedArea {
        /// Tag of the offending TRE
        tag: String,
        /// Body length declared by its envelope
        length: usize,
        /// Bytes left in the area after the envelope
        remaining: usize,
    },

    /// field {field} needs {length} bytes but only {available} remain
    #[error("field {field} needs {length} bytes but only {available} remain")]
    TruncatedField {
        /// Name of the field, `filler` for unnamed fields
        field: String,
        /// Bytes the field declares
        length: usize,
        /// Bytes left in the body
        available: usize,
    },

    /// no schema is registered for {0}
    #[error("no schema is registered for {0}")]
    UnknownSchema(String),

    /// tag `{0}` is not a valid tre tag
    #[error("tag `{0}` is not a valid tre tag")]
    InvalidTag(String),

    /// body of {tag} is {length} bytes, the length field only holds 99999
    #[error("body of {tag} is {length} bytes, the length field only holds 99999")]
    BodyTooLong {
        /// Tag of the offending TRE
        tag: String,
        /// Length of its body
        length: usize,
    },

    /// {tag} is restricted to {location} headers and cannot be written to {origin}
    #[error("{tag} is restricted to {location} headers and cannot be written to {origin}")]
    LocationMismatch {
        /// Tag of the offending TRE
        tag: String,
        /// Placement declared by the schema
        location: Location,
        /// Structural origin the TRE was written for
        origin: TreSource,
    },

    /// tres for {origin} need {size} bytes, the maximum is {max}
    #[error("tres for {origin} need {size} bytes, the maximum is {max}")]
    SizeExceeded {
        /// Structural origin being written
        origin: TreSource,
        /// Total bytes the TREs would take
        size: usize,
        /// Maximum allowed for the origin
        max: usize,
    },

    /// tre {0} holds raw data and has no entries
    #[error("tre {0} holds raw data and has no entries")]
    Unparsed(String),
}

/// Error type to provide further information when a field cannot be serialized
#[derive(Error, Diagnostic, Debug)]
pub enum FieldError {
    /// no entry named {0}
    #[error("no entry named {0}")]
    MissingEntry(String),

    /// value {value} of {field} is outside the range {min} to {max}
    #[error("value {value} of {field} is outside the range {min} to {max}")]
    OutOfRange {
        /// Name of the field
        field: String,
        /// The offending value
        value: String,
        /// Lower bound, `-inf` when the field has none
        min: String,
        /// Upper bound, `inf` when the field has none
        max: String,
    },

    /// value of {field} is {length} bytes, which does not fit in {capacity}
    #[error("value of {field} is {length} bytes, which does not fit in {capacity}")]
    TooLong {
        /// Name of the field
        field: String,
        /// Length of the value
        length: usize,
        /// Declared width of the field
        capacity: usize,
    },

    /// value of {field} is {actual} bytes, {expected} were declared
    #[error("value of {field} is {actual} bytes, {expected} were declared")]
    LengthMismatch {
        /// Name of the field
        field: String,
        /// The declared length
        expected: usize,
        /// Length of the stored value
        actual: usize,
    },

    /// loop {field} declares {expected} groups but holds {actual}
    #[error("loop {field} declares {expected} groups but holds {actual}")]
    CountMismatch {
        /// Name of the loop
        field: String,
        /// The resolved repeat count
        expected: usize,
        /// Number of groups stored in the entry
        actual: usize,
    },

    /// value `{value}` of {field} is not a valid {kind}
    #[error("value `{value}` of {field} is not a valid {kind}")]
    NotANumber {
        /// Name of the field
        field: String,
        /// The stored text
        value: String,
        /// What it should have been
        kind: &'static str,
    },
}

/// Reasons a stored value cannot be read as the requested kind of number
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum ValueError {
    /// `{value}` is not a valid {kind}
    #[error("`{value}` is not a valid {kind}")]
    NotANumber {
        /// The stored text
        value: String,
        /// What it should have been
        kind: &'static str,
    },

    /// {width} bytes cannot be read as {kind}
    #[error("{width} bytes cannot be read as {kind}")]
    UnsupportedWidth {
        /// Number of stored bytes
        width: usize,
        /// What it should have been
        kind: &'static str,
    },

    /// {value} does not fit in {kind}
    #[error("{value} does not fit in {kind}")]
    Overflow {
        /// The decoded value
        value: String,
        /// The target type
        kind: &'static str,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

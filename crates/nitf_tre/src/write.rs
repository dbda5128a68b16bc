//! Types for serializing TREs
//!

use binrw::BinWrite;
use std::io::{Cursor, Write};
use std::str::FromStr;
use tracing::{instrument, trace};

use crate::{
    collection::TreCollection,
    condition::Condition,
    error::{Error, FieldError, Result},
    parameters::ParameterTable,
    schema::{FieldLength, FieldSchema, FieldType, RealFormat, SchemaNode, SchemaRepository},
    tre::{Tre, TreBody, TreSource},
    tree::Group,
    types::{TreEnvelope, ENVELOPE_LENGTH},
    value::FieldValue,
};

/// TRE serializer driven by a [`SchemaRepository`]
///
/// Raw TREs are written back unchanged. Parsed TREs are laid out by replaying their schema over
/// the stored entries, formatting every value to its declared width.
///
/// ```
/// # fn doit() -> nitf_tre::error::Result<()>
/// # {
/// use nitf_tre::schema::{FieldLength, FieldSchema, FieldType, Schema, SchemaRegistry};
/// use nitf_tre::tre::{Tre, TreSource};
/// use nitf_tre::tree::SimpleEntry;
/// use nitf_tre::TreSerializer;
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(
///     "PIAIMB",
///     Schema::new(vec![FieldSchema::builder()
///         .name("CLOUD")
///         .field_type(FieldType::Integer)
///         .length(FieldLength::Fixed(3))
///         .build()
///         .into()]),
/// );
///
/// let mut tre = Tre::new("PIAIMB", TreSource::ImageExtendedSubheaderData);
/// tre.add(SimpleEntry::new("CLOUD", "50", FieldType::Integer))?;
///
/// let serializer = TreSerializer::new(&registry);
/// assert_eq!(serializer.tre_bytes(&tre)?, b"PIAIMB00003050");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug)]
pub struct TreSerializer<'a, S: ?Sized> {
    schemas: &'a S,
}

impl<'a, S: SchemaRepository + ?Sized> TreSerializer<'a, S> {
    /// Create a serializer looking up layouts in `schemas`
    pub fn new(schemas: &'a S) -> Self {
        TreSerializer { schemas }
    }

    /// The body of `tre`, without its envelope
    #[instrument(skip_all, fields(tag = tre.name(), source = %tre.source()), err)]
    pub fn tre_body(&self, tre: &Tre) -> Result<Vec<u8>> {
        let schema = self.schemas.lookup(tre.name());

        if let Some(location) = schema.and_then(|schema| schema.location) {
            if !tre.source().accepts(Some(location)) {
                return Err(Error::LocationMismatch {
                    tag: tre.name().to_owned(),
                    location,
                    origin: tre.source(),
                });
            }
        }

        match tre.body() {
            TreBody::Raw(data) => Ok(data.clone()),
            TreBody::Entries(entries) => {
                let schema = schema.ok_or_else(|| Error::UnknownSchema(tre.name().to_owned()))?;

                let mut output = Vec::new();
                let mut params = ParameterTable::new();
                serialize_schema(&schema.nodes, entries, &mut output, &mut params)?;
                Ok(output)
            }
        }
    }

    /// `tre` with its envelope, as it appears in a header area
    pub fn tre_bytes(&self, tre: &Tre) -> Result<Vec<u8>> {
        let body = self.tre_body(tre)?;
        let envelope = TreEnvelope::new(tre.name(), body.len())?;

        let mut output = Cursor::new(Vec::with_capacity(ENVELOPE_LENGTH + body.len()));
        envelope.write(&mut output)?;
        output.write_all(&body)?;

        Ok(output.into_inner())
    }

    /// Number of bytes, envelopes included, the TREs of `collection` belonging to `source` take
    pub fn source_size(&self, collection: &TreCollection, source: TreSource) -> Result<usize> {
        collection
            .tres_for_source(source)
            .map(|tre| -> Result<usize> { Ok(ENVELOPE_LENGTH + self.tre_body(tre)?.len()) })
            .sum()
    }

    /// Every TRE of `collection` belonging to `source`, in order
    ///
    /// Fails when the result does not fit in the header area of `source`.
    #[instrument(skip(self, collection), err)]
    pub fn collection_bytes(&self, collection: &TreCollection, source: TreSource) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        for tre in collection.tres_for_source(source) {
            output.extend(self.tre_bytes(tre)?);
        }

        let max = source.max_length();
        if output.len() > max {
            return Err(Error::SizeExceeded {
                origin: source,
                size: output.len(),
                max,
            });
        }

        Ok(output)
    }
}

/// Replay `nodes` over `group`, writing every field to `output`
///
/// Each written value is recorded in `params` in its formatted form, so conditions, lengths and
/// loop counts later in the layout see exactly what a parser would.
pub fn serialize_schema<W: Write>(
    nodes: &[SchemaNode],
    group: &Group,
    output: &mut W,
    params: &mut ParameterTable,
) -> Result<()> {
    for node in nodes {
        match node {
            SchemaNode::Field(field) => serialize_field(field, group, output, params)?,
            SchemaNode::Loop(repeat) => {
                let list = group
                    .group_list(&repeat.name)
                    .ok_or_else(|| FieldError::MissingEntry(repeat.name.clone()))?;

                let expected = repeat.count.resolve(params)?;
                if expected != list.len() {
                    return Err(FieldError::CountMismatch {
                        field: repeat.name.clone(),
                        expected,
                        actual: list.len(),
                    }
                    .into());
                }

                for iteration in list.groups() {
                    serialize_schema(&repeat.children, iteration, output, params)?;
                }
            }
            SchemaNode::Conditional(conditional) => {
                if Condition::check(&conditional.condition, params)? {
                    serialize_schema(&conditional.children, group, output, params)?;
                }
            }
        }
    }

    Ok(())
}

fn serialize_field<W: Write>(
    field: &FieldSchema,
    group: &Group,
    output: &mut W,
    params: &mut ParameterTable,
) -> Result<()> {
    let Some(name) = field.entry_name() else {
        let length = field.length.resolve(params)?;
        output.write_all(&filler(field, length)?)?;
        return Ok(());
    };

    let entry = group
        .simple(name)
        .ok_or_else(|| FieldError::MissingEntry(name.to_owned()))?;

    let width = match &field.length {
        FieldLength::Fixed(length) => *length,
        FieldLength::Field(reference) => {
            let expected = params.get_count(reference)?;
            if entry.value().len() != expected {
                return Err(FieldError::LengthMismatch {
                    field: name.to_owned(),
                    expected,
                    actual: entry.value().len(),
                }
                .into());
            }
            expected
        }
    };

    let bytes = coerce(field, name, entry.value(), width)?;
    trace!(name, length = bytes.len(), "serialized field");

    output.write_all(&bytes)?;
    if let Some(parameter) = field.parameter_name() {
        params.set(parameter, bytes, field.field_type);
    }

    Ok(())
}

fn filler(field: &FieldSchema, length: usize) -> Result<Vec<u8>> {
    let value = field.fixed_value.as_deref().unwrap_or_default();
    if value.len() > length {
        return Err(Error::FillerTooLong {
            value: value.to_owned(),
            length,
        });
    }

    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(length, b' ');
    Ok(bytes)
}

/// Format `value` to exactly `width` bytes according to the declared type of `field`
fn coerce(field: &FieldSchema, name: &str, value: &FieldValue, width: usize) -> Result<Vec<u8>> {
    match field.field_type {
        FieldType::String => pad_right(name, value.as_bytes(), width),
        FieldType::Integer => coerce_integer(field, name, value.as_bytes(), width),
        FieldType::Real => coerce_real(field, name, value.as_bytes(), width),
        FieldType::UnsignedBigEndian => coerce_unsigned(name, value, width),
        FieldType::Ieee754 => {
            if value.len() != width {
                return Err(FieldError::LengthMismatch {
                    field: name.to_owned(),
                    expected: width,
                    actual: value.len(),
                }
                .into());
            }
            Ok(value.as_bytes().to_vec())
        }
    }
}

fn pad_right(name: &str, bytes: &[u8], width: usize) -> Result<Vec<u8>> {
    if bytes.len() > width {
        return Err(too_long(name, bytes.len(), width));
    }

    let mut padded = bytes.to_vec();
    padded.resize(width, b' ');
    Ok(padded)
}

fn coerce_integer(field: &FieldSchema, name: &str, raw: &[u8], width: usize) -> Result<Vec<u8>> {
    let text = raw.trim_ascii();
    if text.is_empty() {
        return Ok(vec![b' '; width]);
    }

    let number: i64 = parse_number(name, text, "integer")?;
    check_range(field, name, number as f64, || number.to_string())?;

    if raw.len() == width {
        return Ok(raw.to_vec());
    }

    let formatted = format!("{number:0width$}");
    if formatted.len() > width {
        return Err(too_long(name, formatted.len(), width));
    }

    Ok(formatted.into_bytes())
}

fn coerce_real(field: &FieldSchema, name: &str, raw: &[u8], width: usize) -> Result<Vec<u8>> {
    let text = raw.trim_ascii();
    if text.is_empty() {
        return Ok(vec![b' '; width]);
    }

    let number: f64 = parse_number(name, text, "real")?;
    if number.is_nan() {
        return pad_right(name, b"NaN", width);
    }
    if number.is_infinite() {
        return Err(FieldError::NotANumber {
            field: name.to_owned(),
            value: String::from_utf8_lossy(text).into_owned(),
            kind: "finite real",
        }
        .into());
    }

    check_range(field, name, number, || number.to_string())?;

    if raw.len() == width {
        return Ok(raw.to_vec());
    }

    let formatted = match field.format.unwrap_or_default() {
        RealFormat::Fixed => fixed_point(number, width),
        RealFormat::Exponential => exponential(number, width),
    };

    formatted
        .map(String::into_bytes)
        .ok_or_else(|| too_long(name, text.len(), width))
}

fn coerce_unsigned(name: &str, value: &FieldValue, width: usize) -> Result<Vec<u8>> {
    let bytes = match value.field_type() {
        FieldType::UnsignedBigEndian => value.as_bytes().to_vec(),
        _ => value
            .to_big_uint()
            .map_err(|source| Error::InvalidValue {
                name: name.to_owned(),
                source,
            })?
            .to_bytes_be(),
    };

    let leading_zeros = bytes.iter().take_while(|byte| **byte == 0).count();
    let significant = &bytes[leading_zeros.min(bytes.len().saturating_sub(width))..];
    if significant.len() > width {
        return Err(too_long(name, significant.len(), width));
    }

    let mut padded = vec![0u8; width - significant.len()];
    padded.extend_from_slice(significant);
    Ok(padded)
}

/// Zero padded fixed point text of exactly `width` characters, giving up fraction digits first
fn fixed_point(value: f64, width: usize) -> Option<String> {
    let integral = format!("{:.0}", value.trunc());
    let mut precision = width.checked_sub(integral.len() + 1).unwrap_or_default();

    loop {
        let formatted = format!("{value:0width$.precision$}");
        if formatted.len() <= width {
            return Some(formatted);
        }
        precision = precision.checked_sub(1)?;
    }
}

/// `d.dddE+XX` text of at most `width` characters, space padded to `width`
fn exponential(value: f64, width: usize) -> Option<String> {
    let base = usize::from(value.is_sign_negative()) + "dE+XX".len();
    if width < base {
        return None;
    }
    let mut precision = width.checked_sub(base + 1).unwrap_or_default();

    loop {
        let formatted = format!("{value:.precision$E}");
        let (mantissa, exponent) = formatted.split_once('E')?;
        let exponent = exponent.parse::<i32>().ok()?;
        let sign = if exponent < 0 { '-' } else { '+' };

        let text = format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs());
        if text.len() <= width {
            return Some(format!("{text:<width$}"));
        }
        precision = precision.checked_sub(1)?;
    }
}

fn check_range(
    field: &FieldSchema,
    name: &str,
    value: f64,
    display: impl FnOnce() -> String,
) -> Result<()> {
    let below = field.min_value.is_some_and(|min| value < min);
    let above = field.max_value.is_some_and(|max| value > max);
    if !(below || above) {
        return Ok(());
    }

    let bound = |bound: Option<f64>, unbounded: &str| {
        bound.map_or_else(|| unbounded.to_owned(), |bound| bound.to_string())
    };

    Err(FieldError::OutOfRange {
        field: name.to_owned(),
        value: display(),
        min: bound(field.min_value, "-inf"),
        max: bound(field.max_value, "inf"),
    }
    .into())
}

fn parse_number<T: FromStr>(name: &str, text: &[u8], kind: &'static str) -> Result<T> {
    std::str::from_utf8(text)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| {
            FieldError::NotANumber {
                field: name.to_owned(),
                value: String::from_utf8_lossy(text).into_owned(),
                kind,
            }
            .into()
        })
}

fn too_long(name: &str, length: usize, capacity: usize) -> Error {
    FieldError::TooLong {
        field: name.to_owned(),
        length,
        capacity,
    }
    .into()
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use std::io::Cursor;
    use tracing_test::traced_test;

    use crate::collection::TreCollection;
    use crate::error::{Error, FieldError, Result};
    use crate::parameters::ParameterTable;
    use crate::read::TreParser;
    use crate::schema::{
        FieldLength, FieldSchema, FieldType, Location, RealFormat, RepeatCount, Schema, SchemaNode,
        SchemaRegistry,
    };
    use crate::tre::{Tre, TreSource};
    use crate::tree::{Group, GroupListEntry, SimpleEntry};
    use crate::value::FieldValue;
    use crate::write::{exponential, fixed_point, serialize_schema, TreSerializer};

    fn field(name: &str, field_type: FieldType, length: usize) -> FieldSchema {
        FieldSchema::builder()
            .name(name)
            .field_type(field_type)
            .length(FieldLength::Fixed(length))
            .build()
    }

    fn write(nodes: Vec<SchemaNode>, entries: &Group) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        serialize_schema(&nodes, entries, &mut output, &mut ParameterTable::new())?;
        Ok(output)
    }

    fn single(name: &str, value: impl Into<Vec<u8>>, field_type: FieldType) -> Group {
        let mut group = Group::new();
        group.add(SimpleEntry::new(name, value, field_type));
        group
    }

    #[test]
    fn integer_below_minimum() {
        let numb = FieldSchema {
            min_value: Some(2.0),
            max_value: Some(104.0),
            ..field("NUMB", FieldType::Integer, 2)
        };

        let result = write(vec![numb.into()], &single("NUMB", "1", FieldType::Integer));

        let Err(Error::Field(error @ FieldError::OutOfRange { .. })) = result else {
            panic!("expected a range error");
        };
        assert_str_eq!(
            error.to_string(),
            "value 1 of NUMB is outside the range 2 to 104"
        );
    }

    #[test]
    fn integer_is_zero_padded() -> Result<()> {
        let nodes = || vec![field("NUMB", FieldType::Integer, 3).into()];

        assert_eq!(write(nodes(), &single("NUMB", "7", FieldType::Integer))?, b"007");
        assert_eq!(write(nodes(), &single("NUMB", "-7", FieldType::Integer))?, b"-07");
        assert_eq!(write(nodes(), &single("NUMB", "+07", FieldType::Integer))?, b"+07");
        assert_eq!(write(nodes(), &single("NUMB", "   ", FieldType::Integer))?, b"   ");
        assert!(matches!(
            write(nodes(), &single("NUMB", "1234", FieldType::Integer)),
            Err(Error::Field(FieldError::TooLong {
                length: 4,
                capacity: 3,
                ..
            }))
        ));
        assert!(matches!(
            write(nodes(), &single("NUMB", "1A", FieldType::Integer)),
            Err(Error::Field(FieldError::NotANumber { .. }))
        ));

        Ok(())
    }

    #[test]
    fn real_is_truncated_to_width() -> Result<()> {
        let entries = single("RATIO", "2.3012343", FieldType::Real);

        assert_eq!(
            write(vec![field("RATIO", FieldType::Real, 8).into()], &entries)?,
            b"2.301234"
        );
        assert_eq!(
            write(vec![field("RATIO", FieldType::Real, 5).into()], &entries)?,
            b"2.301"
        );

        Ok(())
    }

    #[test]
    fn fixed_point_text() {
        assert_eq!(fixed_point(2.5, 8).as_deref(), Some("2.500000"));
        assert_eq!(fixed_point(-2.5, 8).as_deref(), Some("-2.50000"));
        assert_eq!(fixed_point(42.0, 2).as_deref(), Some("42"));
        assert_eq!(fixed_point(9.99999, 4).as_deref(), Some("10.0"));
        assert_eq!(fixed_point(2.7, 1).as_deref(), Some("3"));
        assert_eq!(fixed_point(123456.0, 4), None);
    }

    #[test]
    fn exponential_text() {
        assert_eq!(exponential(12.5, 12).as_deref(), Some("1.250000E+01"));
        assert_eq!(exponential(-0.00125, 10).as_deref(), Some("-1.250E-03"));
        assert_eq!(exponential(0.0, 7).as_deref(), Some("0.0E+00"));
        assert_eq!(exponential(1.0, 4), None);
    }

    #[test]
    fn real_formats() -> Result<()> {
        let ue = FieldSchema {
            format: Some(RealFormat::Exponential),
            ..field("SCALE", FieldType::Real, 12)
        };
        assert_eq!(
            write(vec![ue.into()], &single("SCALE", "12.5", FieldType::Real))?,
            b"1.250000E+01"
        );

        let nodes = || vec![field("RATIO", FieldType::Real, 6).into()];
        assert_eq!(write(nodes(), &single("RATIO", "NaN", FieldType::Real))?, b"NaN   ");
        assert_eq!(write(nodes(), &single("RATIO", "", FieldType::Real))?, b"      ");
        assert_eq!(write(nodes(), &single("RATIO", "1.0E+3", FieldType::Real))?, b"1.0E+3");

        Ok(())
    }

    #[test]
    fn unsigned_is_left_padded() -> Result<()> {
        let nodes = || vec![field("COUNT", FieldType::UnsignedBigEndian, 8).into()];

        assert_eq!(
            write(nodes(), &single("COUNT", [0x4e], FieldType::UnsignedBigEndian))?,
            [0, 0, 0, 0, 0, 0, 0, 0x4e]
        );
        assert_eq!(
            write(nodes(), &single("COUNT", "78", FieldType::Integer))?,
            [0, 0, 0, 0, 0, 0, 0, 0x4e]
        );

        let mut group = Group::new();
        group.add(SimpleEntry::from_value(
            "COUNT",
            FieldValue::unsigned(&(BigUint::from(1u8) << 64u32)),
        ));
        assert!(matches!(
            write(nodes(), &group),
            Err(Error::Field(FieldError::TooLong {
                length: 9,
                capacity: 8,
                ..
            }))
        ));

        Ok(())
    }

    #[test]
    fn binary_real_keeps_its_width() -> Result<()> {
        let nodes = || vec![field("GAIN", FieldType::Ieee754, 4).into()];
        let gain = 1.5f32.to_be_bytes();

        assert_eq!(write(nodes(), &single("GAIN", gain, FieldType::Ieee754))?, gain);
        assert!(matches!(
            write(nodes(), &single("GAIN", [0u8; 8], FieldType::Ieee754)),
            Err(Error::Field(FieldError::LengthMismatch {
                expected: 4,
                actual: 8,
                ..
            }))
        ));

        Ok(())
    }

    #[test]
    fn length_from_field() -> Result<()> {
        let nodes = || {
            vec![
                field("LEN", FieldType::Integer, 2).into(),
                FieldSchema::builder()
                    .name("NOTE")
                    .length(FieldLength::Field("LEN".into()))
                    .build()
                    .into(),
            ]
        };

        let mut entries = single("LEN", "5", FieldType::Integer);
        entries.add(SimpleEntry::new("NOTE", "ABCDE", FieldType::String));
        assert_eq!(write(nodes(), &entries)?, b"05ABCDE");

        let mut entries = single("LEN", "05", FieldType::Integer);
        entries.add(SimpleEntry::new("NOTE", "ABC", FieldType::String));
        assert!(matches!(
            write(nodes(), &entries),
            Err(Error::Field(FieldError::LengthMismatch {
                expected: 5,
                actual: 3,
                ..
            }))
        ));

        Ok(())
    }

    #[test]
    fn filler_longer_than_any_body() {
        let nodes = vec![
            field("LEN", FieldType::Integer, 18).into(),
            FieldSchema::builder()
                .length(FieldLength::Field("LEN".into()))
                .build()
                .into(),
        ];

        let entries = single("LEN", "900000000000000000", FieldType::Integer);
        assert!(matches!(
            write(nodes, &entries),
            Err(Error::LengthTooLarge { name, .. }) if name == "LEN"
        ));
    }

    #[test]
    fn filler_fields() -> Result<()> {
        let filler = |value: &str| -> SchemaNode {
            FieldSchema::builder()
                .length(FieldLength::Fixed(4))
                .fixed_value(value)
                .build()
                .into()
        };

        assert_eq!(write(vec![filler("AB")], &Group::new())?, b"AB  ");
        assert!(matches!(
            write(vec![filler("ABCDE")], &Group::new()),
            Err(Error::FillerTooLong { length: 4, .. })
        ));

        let blank = FieldSchema::builder().length(FieldLength::Fixed(3)).build();
        assert_eq!(write(vec![blank.into()], &Group::new())?, b"   ");

        Ok(())
    }

    #[test]
    fn long_name_fields_are_written() -> Result<()> {
        let mode = FieldSchema::builder()
            .long_name("Sensor Mode")
            .length(FieldLength::Fixed(4))
            .build();

        assert_eq!(
            write(vec![mode.into()], &single("Sensor Mode", "ON", FieldType::String))?,
            b"ON  "
        );

        Ok(())
    }

    #[test]
    fn loops_must_match_their_count() -> Result<()> {
        let nodes = || {
            vec![
                field("NUMB", FieldType::Integer, 1).into(),
                SchemaNode::repeat(
                    "ITEMS",
                    RepeatCount::Field("NUMB".into()),
                    vec![field("ID", FieldType::String, 2).into()],
                ),
            ]
        };

        let mut items = GroupListEntry::new("ITEMS");
        items.add_group(single("ID", "A", FieldType::String));
        items.add_group(single("ID", "B", FieldType::String));

        let mut entries = single("NUMB", "2", FieldType::Integer);
        entries.add(items.clone());
        assert_eq!(write(nodes(), &entries)?, b"2A B ");

        let mut entries = single("NUMB", "3", FieldType::Integer);
        entries.add(items);
        assert!(matches!(
            write(nodes(), &entries),
            Err(Error::Field(FieldError::CountMismatch {
                expected: 3,
                actual: 2,
                ..
            }))
        ));

        Ok(())
    }

    #[test]
    fn missing_entry() {
        assert!(matches!(
            write(vec![field("NUMB", FieldType::Integer, 2).into()], &Group::new()),
            Err(Error::Field(FieldError::MissingEntry(name))) if name == "NUMB"
        ));
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "TESTAA",
            Schema::new(vec![
                field("FLAG", FieldType::String, 1).into(),
                SchemaNode::when("FLAG=Y", vec![field("NUMB", FieldType::Integer, 2).into()]),
                field("TEXT", FieldType::String, 20).into(),
            ]),
        );
        registry.register(
            "FILEAA",
            Schema::new(vec![field("NAME", FieldType::String, 4).into()])
                .with_location(Location::File),
        );
        registry
    }

    #[traced_test]
    #[test]
    fn parsed_tre_round_trips() -> Result<()> {
        let registry = registry();

        for body in [&b"Y03HELLO WORLD         "[..], &b"NHELLO WORLD         "[..]] {
            let tre = TreParser::new(&registry).parse_one_tre(
                &mut Cursor::new(body),
                "TESTAA",
                body.len(),
                TreSource::ImageExtendedSubheaderData,
            )?;

            assert!(!tre.is_raw());
            assert_eq!(TreSerializer::new(&registry).tre_body(&tre)?, body);
        }

        Ok(())
    }

    #[test]
    fn built_tre_gets_an_envelope() -> Result<()> {
        let registry = registry();

        let mut tre = Tre::new("TESTAA", TreSource::UserDefinedImageData);
        tre.add(SimpleEntry::new("FLAG", "Y", FieldType::String))?;
        tre.add(SimpleEntry::new("NUMB", "3", FieldType::Integer))?;
        tre.add(SimpleEntry::new("TEXT", "HELLO", FieldType::String))?;

        assert_eq!(
            TreSerializer::new(&registry).tre_bytes(&tre)?,
            b"TESTAA00023Y03HELLO               "
        );

        Ok(())
    }

    #[test]
    fn unknown_parsed_tre() -> Result<()> {
        let registry = registry();

        let mut tre = Tre::new("UNKNWN", TreSource::UserDefinedImageData);
        tre.add(SimpleEntry::new("FLAG", "Y", FieldType::String))?;

        assert!(matches!(
            TreSerializer::new(&registry).tre_body(&tre),
            Err(Error::UnknownSchema(_))
        ));

        Ok(())
    }

    #[test]
    fn placement_is_enforced() -> Result<()> {
        let registry = registry();
        let serializer = TreSerializer::new(&registry);

        let mut tre = Tre::new("FILEAA", TreSource::ImageExtendedSubheaderData);
        tre.add(SimpleEntry::new("NAME", "ABCD", FieldType::String))?;
        assert!(matches!(
            serializer.tre_body(&tre),
            Err(Error::LocationMismatch {
                location: Location::File,
                origin: TreSource::ImageExtendedSubheaderData,
                ..
            })
        ));

        tre.set_source(TreSource::ExtendedHeaderData);
        assert_eq!(serializer.tre_body(&tre)?, b"ABCD");

        tre.set_source(TreSource::TreOverflowDes);
        assert_eq!(serializer.tre_body(&tre)?, b"ABCD");

        Ok(())
    }

    #[test]
    fn collection_size_is_limited() -> Result<()> {
        let registry = registry();
        let serializer = TreSerializer::new(&registry);

        let mut collection = TreCollection::new();
        collection.add(Tre::raw("SMALL", TreSource::SymbolExtendedSubheaderData, b"abc".to_vec()));
        collection.add(Tre::raw("OTHER", TreSource::ExtendedHeaderData, b"xyz".to_vec()));

        assert_eq!(
            serializer.collection_bytes(&collection, TreSource::SymbolExtendedSubheaderData)?,
            b"SMALL 00003abc"
        );
        assert_eq!(serializer.source_size(&collection, TreSource::ExtendedHeaderData)?, 14);
        assert_eq!(serializer.source_size(&collection, TreSource::TreOverflowDes)?, 0);

        collection.add(Tre::raw(
            "LARGE",
            TreSource::SymbolExtendedSubheaderData,
            vec![b'x'; 9_000],
        ));
        assert_eq!(
            serializer.source_size(&collection, TreSource::SymbolExtendedSubheaderData)?,
            9_025
        );
        assert!(matches!(
            serializer.collection_bytes(&collection, TreSource::SymbolExtendedSubheaderData),
            Err(Error::SizeExceeded {
                size: 9_025,
                max: 8_830,
                ..
            })
        ));

        Ok(())
    }
}

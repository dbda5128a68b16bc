//! Types for parsing TREs
//!

use binrw::BinRead;
use std::io::{Cursor, Read, Seek};
use tracing::{debug, instrument, trace, warn};

use crate::{
    collection::TreCollection,
    condition::Condition,
    error::{Error, Result},
    parameters::ParameterTable,
    schema::{FieldSchema, Schema, SchemaNode, SchemaRepository},
    tre::{Tre, TreSource},
    tree::{Group, GroupListEntry, SimpleEntry},
    types::{validate_tag, TreEnvelope, ENVELOPE_LENGTH},
    value::FieldValue,
};

/// TRE parser driven by a [`SchemaRepository`]
///
/// Unknown tags and bodies that do not match their schema are kept as raw TREs, so a file with
/// unusual extensions can still be read and written back unchanged.
///
/// ```
/// # fn doit() -> nitf_tre::error::Result<()>
/// # {
/// use nitf_tre::schema::{FieldLength, FieldSchema, Schema, SchemaRegistry};
/// use nitf_tre::tre::TreSource;
/// use nitf_tre::TreParser;
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(
///     "PIAIMB",
///     Schema::new(vec![FieldSchema::builder()
///         .name("CLOUD")
///         .length(FieldLength::Fixed(3))
///         .build()
///         .into()]),
/// );
///
/// let parser = TreParser::new(&registry);
/// let tres = parser.parse_bytes(b"PIAIMB00003050", TreSource::ImageExtendedSubheaderData)?;
///
/// assert_eq!(tres.len(), 1);
/// assert_eq!(tres[0].field_value("CLOUD")?, "050");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug)]
pub struct TreParser<'a, S: ?Sized> {
    schemas: &'a S,
}

impl<'a, S: SchemaRepository + ?Sized> TreParser<'a, S> {
    /// Create a parser looking up layouts in `schemas`
    pub fn new(schemas: &'a S) -> Self {
        TreParser { schemas }
    }

    /// Read one TRE body of `length` bytes whose envelope has already been consumed
    ///
    /// Only failures of `reader`, including one holding fewer than `length` bytes, are returned
    /// as errors. A body that cannot be parsed with its schema is logged and kept raw.
    #[instrument(skip(self, reader), err)]
    pub fn parse_one_tre<R: Read>(
        &self,
        reader: &mut R,
        tag: &str,
        length: usize,
        source: TreSource,
    ) -> Result<Tre> {
        let mut data = Vec::new();
        reader.by_ref().take(length as u64).read_to_end(&mut data)?;
        if data.len() < length {
            return Err(Error::TruncatedArea {
                tag: tag.to_owned(),
                length,
                remaining: data.len(),
            });
        }

        let Some(schema) = self.schemas.lookup(tag) else {
            debug!("no schema registered for {tag}, keeping raw data");
            return Ok(Tre::raw(tag, source, data));
        };

        let tre = match parse_body(schema, &data) {
            Ok(entries) => Tre::parsed(tag, source, entries),
            Err(error) => {
                warn!("unable to parse {tag}, keeping raw data: {error}");
                Tre::raw(tag, source, data)
            }
        };

        Ok(tre.with_prefix(schema.prefix.clone()))
    }

    /// Read every TRE of a header area holding `length` bytes of envelopes and bodies
    #[instrument(skip(self, reader), err)]
    pub fn parse_area<R: Read + Seek>(
        &self,
        reader: &mut R,
        length: usize,
        source: TreSource,
    ) -> Result<TreCollection> {
        let mut collection = TreCollection::new();
        let mut remaining = length;

        while remaining > 0 {
            if remaining < ENVELOPE_LENGTH {
                return Err(Error::TrailingData { remaining });
            }

            let envelope = TreEnvelope::read(reader)?;
            validate_tag(&envelope.tag)?;
            remaining -= ENVELOPE_LENGTH;

            let body = envelope.length as usize;
            if body > remaining {
                return Err(Error::TruncatedArea {
                    tag: envelope.tag,
                    length: body,
                    remaining,
                });
            }

            collection.add(self.parse_one_tre(reader, &envelope.tag, body, source)?);
            remaining -= body;
        }

        Ok(collection)
    }

    /// Read every TRE of an in memory header area
    pub fn parse_bytes(&self, data: &[u8], source: TreSource) -> Result<TreCollection> {
        self.parse_area(&mut Cursor::new(data), data.len(), source)
    }
}

fn parse_body(schema: &Schema, data: &[u8]) -> Result<Group> {
    let mut reader = Cursor::new(data);
    let mut params = ParameterTable::new();
    let entries = parse_schema(&schema.nodes, &mut reader, &mut params)?;

    let remaining = data.len() - reader.position() as usize;
    if remaining > 0 {
        return Err(Error::TrailingData { remaining });
    }

    Ok(entries)
}

/// Walk `nodes` over `reader`, recording named values in `params` as they are read
///
/// Conditional blocks are spliced into the returned group. Each loop iteration gets a group of
/// its own while sharing `params` with the rest of the TRE.
pub fn parse_schema<R: Read>(
    nodes: &[SchemaNode],
    reader: &mut R,
    params: &mut ParameterTable,
) -> Result<Group> {
    let mut group = Group::new();

    for node in nodes {
        match node {
            SchemaNode::Field(field) => {
                if let Some(entry) = parse_field(field, reader, params)? {
                    group.add(entry);
                }
            }
            SchemaNode::Loop(repeat) => {
                let count = repeat.count.resolve(params)?;
                trace!(name = %repeat.name, count, "parsing loop");

                let mut list = GroupListEntry::new(&repeat.name);
                for _ in 0..count {
                    list.add_group(parse_schema(&repeat.children, reader, params)?);
                }
                group.add(list);
            }
            SchemaNode::Conditional(conditional) => {
                if Condition::check(&conditional.condition, params)? {
                    group.append(parse_schema(&conditional.children, reader, params)?);
                }
            }
        }
    }

    Ok(group)
}

fn parse_field<R: Read>(
    field: &FieldSchema,
    reader: &mut R,
    params: &mut ParameterTable,
) -> Result<Option<SimpleEntry>> {
    let length = field.length.resolve(params)?;
    let mut bytes = Vec::new();
    reader.by_ref().take(length as u64).read_to_end(&mut bytes)?;
    if bytes.len() < length {
        return Err(Error::TruncatedField {
            field: field.entry_name().unwrap_or("filler").to_owned(),
            length,
            available: bytes.len(),
        });
    }

    let Some(name) = field.entry_name() else {
        trace!(length, "skipped filler");
        return Ok(None);
    };

    trace!(name, length, "parsed field");
    let value = FieldValue::new(bytes, field.field_type);
    if let Some(parameter) = field.parameter_name() {
        params.insert(parameter, value.clone());
    }

    Ok(Some(SimpleEntry::from_value(name, value)))
}

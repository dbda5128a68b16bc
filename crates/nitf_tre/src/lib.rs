//! This library parses and serializes the **Tagged Record Extensions** (TREs) embedded in the headers of
//! *NITF* imagery files.
//!
//! # TRE Format Documentation
//!
//! A TRE is a tagged, length prefixed block of fixed width fields. NITF file headers and segment
//! subheaders carry any number of them back to back in their user defined and extended data areas. The
//! layout of each body is not self describing: it is given by a schema registered for the tag, which this
//! crate uses to turn the body into a tree of named values and back into bytes.
//!
//! ## Envelope
//!
//! Every TRE starts with an 11 byte envelope followed by its body.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Tag                    | 6 bytes: ASCII tag, right padded with spaces               |
//! | 0x0006         | Length                 | 5 bytes: ASCII decimal length of the body, zero padded     |
//! | 0x000B         | Body                   | `Length` bytes laid out by the tag's schema                |
//!
//! ## Header Areas
//!
//! The area a TRE lives in is its *source*. Each area has a maximum size, envelopes included, and schemas
//! may restrict a tag to file or image headers. TRE overflow segments accept any tag.
//!
//! | Source                           | Maximum bytes | Placement  |
//! |----------------------------------|---------------|------------|
//! | User defined header data         | 99996         | file       |
//! | Extended header data             | 99996         | file       |
//! | User defined image data          | 99996         | image      |
//! | Image extended subheader data    | 99996         | image      |
//! | Symbol extended subheader data   | 8830          |            |
//! | Label extended subheader data    | 9744          |            |
//! | Graphic extended subheader data  | 9738          |            |
//! | Text extended subheader data     | 9714          |            |
//! | TRE overflow segment             | 999999998     | any        |
//!
//! ## Field Types
//!
//! - **string**: ASCII text, right padded with spaces.
//! - **integer**: ASCII decimal, zero padded on the left. Values may be range checked.
//! - **real**: ASCII decimal in fixed point, or `d.dddE+XX` for the `UE` format. Values may be range
//!   checked.
//! - **UINT**: Unsigned big endian binary integer of any width, zero padded on the left.
//! - **IEEE754**: Big endian IEEE-754 float of 4 or 8 bytes.
//!
//! Blank integer and real fields are legal and are kept as spaces.
//!
//! ## Schemas
//!
//! A schema is a tree of nodes:
//!
//! - **field**: a value of fixed width, or whose width is the value of an earlier field. Fields without a
//!   name are filler.
//! - **loop**: children repeated a fixed number of times, the value of an earlier field, or one of the
//!   formulas in [`formula::Formula`].
//! - **conditional**: children present only when a [`condition::Condition`] on earlier fields holds.
//!
//! ## Additional Information
//!
//! - Bodies that do not match their schema, and TREs of unknown tags, are kept as raw bytes so a file can
//!   always be written back unchanged.
//! - Parsed values keep their original bytes. Serializing an unmodified TRE reproduces its body exactly.
//!

pub mod collection;
pub mod condition;
pub mod error;
pub mod formula;
pub mod parameters;
pub mod read;
pub mod schema;
pub mod tre;
pub mod tree;
pub mod types;
pub mod value;
pub mod write;

pub use collection::TreCollection;
pub use read::TreParser;
pub use schema::{SchemaRegistry, SchemaRepository};
pub use tre::{Tre, TreSource};
pub use write::TreSerializer;

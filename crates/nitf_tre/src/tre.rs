//! A single tagged record extension and where it lives

use derive_more::derive::Display;

use crate::error::{Error, Result};
use crate::schema::Location;
use crate::tree::{Entry, Group};

/// The header area a TRE was read from or will be written to
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TreSource {
    /// File header user defined header data (UDHD)
    #[display("user defined header data")]
    UserDefinedHeaderData,

    /// File header extended header data (XHD)
    #[display("extended header data")]
    ExtendedHeaderData,

    /// Image subheader user defined image data (UDID)
    #[display("user defined image data")]
    UserDefinedImageData,

    /// Image subheader extended subheader data (IXSHD)
    #[display("image extended subheader data")]
    ImageExtendedSubheaderData,

    /// Symbol subheader extended subheader data (SXSHD)
    #[display("symbol extended subheader data")]
    SymbolExtendedSubheaderData,

    /// Label subheader extended subheader data (LXSHD)
    #[display("label extended subheader data")]
    LabelExtendedSubheaderData,

    /// Graphic subheader extended subheader data (SXSHD)
    #[display("graphic extended subheader data")]
    GraphicExtendedSubheaderData,

    /// Text subheader extended subheader data (TXSHD)
    #[display("text extended subheader data")]
    TextExtendedSubheaderData,

    /// A TRE overflow data extension segment
    #[display("tre overflow segment")]
    TreOverflowDes,
}

impl TreSource {
    /// Every structural origin
    pub const ALL: [TreSource; 9] = [
        TreSource::UserDefinedHeaderData,
        TreSource::ExtendedHeaderData,
        TreSource::UserDefinedImageData,
        TreSource::ImageExtendedSubheaderData,
        TreSource::SymbolExtendedSubheaderData,
        TreSource::LabelExtendedSubheaderData,
        TreSource::GraphicExtendedSubheaderData,
        TreSource::TextExtendedSubheaderData,
        TreSource::TreOverflowDes,
    ];

    /// Maximum number of bytes, envelopes included, all TREs of this origin may take
    pub const fn max_length(&self) -> usize {
        match self {
            TreSource::UserDefinedHeaderData
            | TreSource::ExtendedHeaderData
            | TreSource::UserDefinedImageData
            | TreSource::ImageExtendedSubheaderData => 99_996,
            TreSource::SymbolExtendedSubheaderData => 8_830,
            TreSource::LabelExtendedSubheaderData => 9_744,
            TreSource::GraphicExtendedSubheaderData => 9_738,
            TreSource::TextExtendedSubheaderData => 9_714,
            TreSource::TreOverflowDes => 999_999_998,
        }
    }

    /// Whether a TRE whose schema is restricted to `location` may be written here
    pub fn accepts(&self, location: Option<Location>) -> bool {
        match (location, self) {
            (None, _) | (_, TreSource::TreOverflowDes) => true,
            (Some(Location::File), source) => matches!(
                source,
                TreSource::UserDefinedHeaderData | TreSource::ExtendedHeaderData
            ),
            (Some(Location::Image), source) => matches!(
                source,
                TreSource::UserDefinedImageData | TreSource::ImageExtendedSubheaderData
            ),
        }
    }
}

/// Contents of a TRE: either a parsed value tree or the unparsed body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreBody {
    /// Parsed field values
    Entries(Group),
    /// Body bytes of an unknown tag or one that failed to parse
    Raw(Vec<u8>),
}

/// A tagged record extension
///
/// ```
/// use nitf_tre::schema::FieldType;
/// use nitf_tre::tree::SimpleEntry;
/// use nitf_tre::tre::{Tre, TreSource};
///
/// # fn doit() -> nitf_tre::error::Result<()> {
/// let mut tre = Tre::new("TESTAA", TreSource::ImageExtendedSubheaderData);
/// tre.add(SimpleEntry::new("FLAG", "Y", FieldType::String))?;
///
/// assert_eq!(tre.field_value("FLAG")?, "Y");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tre {
    name: String,
    source: TreSource,
    prefix: Option<String>,
    body: TreBody,
}

impl Tre {
    /// Create an empty TRE to be filled with entries
    pub fn new(name: impl Into<String>, source: TreSource) -> Self {
        Self::with_body(name, source, TreBody::Entries(Group::new()))
    }

    /// Create a TRE holding an unparsed body
    pub fn raw(name: impl Into<String>, source: TreSource, data: impl Into<Vec<u8>>) -> Self {
        Self::with_body(name, source, TreBody::Raw(data.into()))
    }

    /// Create a TRE from parsed entries
    pub fn parsed(name: impl Into<String>, source: TreSource, entries: Group) -> Self {
        Self::with_body(name, source, TreBody::Entries(entries))
    }

    fn with_body(name: impl Into<String>, source: TreSource, body: TreBody) -> Self {
        Tre {
            name: name.into(),
            source,
            prefix: None,
            body,
        }
    }

    /// Attach the metadata prefix of the TRE's schema
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// The tag
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the TRE was read from or will be written to
    pub fn source(&self) -> TreSource {
        self.source
    }

    /// Move the TRE to another header area
    pub fn set_source(&mut self, source: TreSource) {
        self.source = source;
    }

    /// The metadata prefix of the TRE's schema, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The parsed or raw contents
    pub fn body(&self) -> &TreBody {
        &self.body
    }

    /// Whether the TRE only holds raw bytes
    pub fn is_raw(&self) -> bool {
        matches!(self.body, TreBody::Raw(_))
    }

    /// The parsed entries, `None` for raw TREs
    pub fn entries(&self) -> Option<&Group> {
        match &self.body {
            TreBody::Entries(group) => Some(group),
            TreBody::Raw(_) => None,
        }
    }

    /// Mutable access to the parsed entries, `None` for raw TREs
    pub fn entries_mut(&mut self) -> Option<&mut Group> {
        match &mut self.body {
            TreBody::Entries(group) => Some(group),
            TreBody::Raw(_) => None,
        }
    }

    /// The unparsed body, `None` for parsed TREs
    pub fn raw_data(&self) -> Option<&[u8]> {
        match &self.body {
            TreBody::Entries(_) => None,
            TreBody::Raw(data) => Some(data),
        }
    }

    /// Append an entry to a parsed TRE
    pub fn add(&mut self, entry: impl Into<Entry>) -> Result<()> {
        let name = self.name.clone();
        self.entries_mut()
            .ok_or(Error::Unparsed(name))
            .map(|group| group.add(entry))
    }

    /// The stored text of the top level field `name`
    pub fn field_value(&self, name: &str) -> Result<String> {
        Ok(self.require_entries()?.field_value(name)?.into_owned())
    }

    /// The top level field `name` as a 32 bit integer
    pub fn int_value(&self, name: &str) -> Result<i32> {
        self.require_entries()?.int_value(name)
    }

    /// The top level field `name` as a double
    pub fn double_value(&self, name: &str) -> Result<f64> {
        self.require_entries()?.double_value(name)
    }

    fn require_entries(&self) -> Result<&Group> {
        self.entries().ok_or_else(|| Error::Unparsed(self.name.clone()))
    }
}

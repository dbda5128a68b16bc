pub mod check;
pub mod list;
pub mod show;

use clap::{Args, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use nitf_tre::{SchemaRegistry, TreCollection, TreParser, TreSource};
use std::{fs::File, path::Path, path::PathBuf};
use tracing::info;

#[derive(clap::Subcommand)]
pub enum TreCommands {
    /// List the TREs of a header area
    List(list::ListArgs),
    /// Print the parsed values of the TREs of a header area
    Show(show::ShowArgs),
    /// Check that header areas survive a parse and serialize round trip
    Check(check::CheckArgs),
}

impl TreCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TreCommands::List(list) => list.handle(),
            TreCommands::Show(show) => show.handle(),
            TreCommands::Check(check) => check.handle(),
        }
    }
}

/// Header area a file of TREs was extracted from
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// User defined header data
    Udhd,
    /// Extended header data
    Xhd,
    /// User defined image data
    Udid,
    /// Image extended subheader data
    #[default]
    Ixshd,
    /// Symbol extended subheader data
    Sxshd,
    /// Label extended subheader data
    Lxshd,
    /// Graphic extended subheader data
    Gxshd,
    /// Text extended subheader data
    Txshd,
    /// TRE overflow segment
    Overflow,
}

impl From<Source> for TreSource {
    fn from(value: Source) -> Self {
        match value {
            Source::Udhd => TreSource::UserDefinedHeaderData,
            Source::Xhd => TreSource::ExtendedHeaderData,
            Source::Udid => TreSource::UserDefinedImageData,
            Source::Ixshd => TreSource::ImageExtendedSubheaderData,
            Source::Sxshd => TreSource::SymbolExtendedSubheaderData,
            Source::Lxshd => TreSource::LabelExtendedSubheaderData,
            Source::Gxshd => TreSource::GraphicExtendedSubheaderData,
            Source::Txshd => TreSource::TextExtendedSubheaderData,
            Source::Overflow => TreSource::TreOverflowDes,
        }
    }
}

/// Options shared by every command reading header areas
#[derive(Args)]
pub struct AreaArgs {
    /// A JSON file mapping tags to schemas
    #[arg(short, long, value_name = "FILE")]
    schemas: PathBuf,

    /// Header area the input was extracted from
    #[arg(long, value_enum, default_value_t = Source::Ixshd)]
    source: Source,
}

impl AreaArgs {
    pub fn source(&self) -> TreSource {
        self.source.into()
    }

    pub fn registry(&self) -> Result<SchemaRegistry> {
        let file = File::open(&self.schemas)
            .into_diagnostic()
            .context(format!("path: {}", &self.schemas.display()))?;
        let registry = SchemaRegistry::from_json_reader(file)?;
        info!("loaded {} schemas", registry.len());
        Ok(registry)
    }

    pub fn parse(&self, registry: &SchemaRegistry, path: &Path) -> Result<TreCollection> {
        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        Ok(TreParser::new(registry).parse_bytes(&data, self.source())?)
    }
}

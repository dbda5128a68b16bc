use clap::Args;
use miette::Result;
use nitf_tre::TreSerializer;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::warn;

use super::AreaArgs;

#[derive(Args)]
pub struct ListArgs {
    /// A file holding the TREs of one header area
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    #[command(flatten)]
    area: AreaArgs,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.area.registry()?;
        let tres = self.area.parse(&registry, &self.file)?;
        let serializer = TreSerializer::new(&registry);

        for tre in &tres {
            let state = if tre.is_raw() {
                format!("{}", "raw".yellow())
            } else {
                format!("{}", "parsed".green())
            };

            let length = serializer
                .tre_body(tre)
                .map(|body| body.len().to_string())
                .unwrap_or_else(|error| {
                    warn!("{} cannot be serialized: {error}", tre.name());
                    "?".to_owned()
                });

            println!(
                "{:<6} {:>5} {:<6} {}",
                tre.name().bold(),
                length,
                state,
                tre.prefix().unwrap_or_default().dimmed()
            );
        }

        println!(
            "{} tres, {} distinct tags",
            tres.len(),
            tres.unique_names().len()
        );

        Ok(())
    }
}

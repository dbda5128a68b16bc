use clap::Args;
use itertools::Itertools;
use miette::Result;
use nitf_tre::tree::{Entry, Group};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::AreaArgs;

#[derive(Args)]
pub struct ShowArgs {
    /// A file holding the TREs of one header area
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only show TREs with this tag
    #[arg(short, long)]
    tag: Option<String>,

    #[command(flatten)]
    area: AreaArgs,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.area.registry()?;
        let tres = self.area.parse(&registry, &self.file)?;

        let selected = tres
            .iter()
            .filter(|tre| self.tag.as_deref().map_or(true, |tag| tre.name() == tag));

        for tre in selected {
            println!("{} ({})", tre.name().bold(), tre.source());
            match tre.entries() {
                Some(entries) => println!("{}", render(entries, 1)),
                None => println!(
                    "  {} {}",
                    "raw".yellow(),
                    String::from_utf8_lossy(tre.raw_data().unwrap_or_default())
                ),
            }
        }

        Ok(())
    }
}

fn render(group: &Group, depth: usize) -> String {
    let indent = "  ".repeat(depth);

    group
        .iter()
        .map(|entry| match entry {
            Entry::Simple(simple) => format!(
                "{indent}{} = {} {}",
                simple.name(),
                simple.value().green(),
                simple.field_type().dimmed()
            ),
            Entry::GroupList(list) => {
                let iterations = list
                    .groups()
                    .iter()
                    .enumerate()
                    .map(|(i, group)| {
                        format!("{indent}  [{i}]\n{}", render(group, depth + 2))
                    })
                    .join("\n");

                if list.is_empty() {
                    format!("{indent}{} (empty)", list.name().blue())
                } else {
                    format!("{indent}{}\n{iterations}", list.name().blue())
                }
            }
        })
        .join("\n")
}

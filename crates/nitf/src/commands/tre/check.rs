use clap::Args;
use miette::{miette, Result};
use nitf_tre::{SchemaRegistry, SchemaRepository, TreParser, TreSerializer};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use super::AreaArgs;

#[derive(Args)]
pub struct CheckArgs {
    /// A file holding the TREs of one header area, or a directory of such files
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Only check files with this extension when walking a directory
    #[arg(long, default_value = "tre")]
    extension: String,

    #[command(flatten)]
    area: AreaArgs,
}

impl CheckArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.area.registry()?;

        let files = WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .map(|e| e.into_path())
            .filter(|path| path == &self.file || self.has_extension(path))
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("no files to check in {}", self.file.display()));
        }

        let mut failures = 0;
        for file in &files {
            match self.check_file(&registry, file) {
                Ok(true) => println!("✅ {}", file.display()),
                Ok(false) => {
                    failures += 1;
                    println!("❌ {}", file.display().red());
                }
                Err(report) => {
                    failures += 1;
                    println!("❌ {}: {:?}", file.display().red(), report);
                }
            }
        }

        info!("checked {} files", files.len());
        match failures {
            0 => Ok(()),
            _ => Err(miette!("{} of {} files failed", failures, files.len())),
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    fn check_file(&self, registry: &SchemaRegistry, path: &Path) -> Result<bool> {
        let expected = std::fs::read(path).map_err(|e| miette!("{}: {e}", path.display()))?;
        let tres = TreParser::new(registry).parse_bytes(&expected, self.area.source())?;

        for tre in tres.iter().filter(|tre| tre.is_raw()) {
            if registry.lookup(tre.name()).is_some() {
                warn!("{} in {} did not match its schema", tre.name(), path.display());
            }
        }

        let actual = TreSerializer::new(registry).collection_bytes(&tres, self.area.source())?;
        if actual == expected {
            return Ok(true);
        }

        print_diff(&expected, &actual);
        Ok(false)
    }
}

fn print_diff(expected: &[u8], actual: &[u8]) {
    let old = String::from_utf8_lossy(expected);
    let new = String::from_utf8_lossy(actual);

    let diff = TextDiff::from_chars(old.as_ref(), new.as_ref());
    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let mut context = String::new();
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = match (emphasized, change.tag()) {
                    (false, _) => format!("{}", value.dimmed()),
                    (true, ChangeTag::Insert) => format!("{}", value.green().underline()),
                    (true, _) => format!("{}", value.red().underline()),
                };
                context.push_str(&text);
            }
            print!("{context}");
        }
    }
    println!();
}

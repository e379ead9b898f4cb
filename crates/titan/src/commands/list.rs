//! List command

use anyhow::Result;
use camino::Utf8Path;
use serde::Serialize;
use tabled::Tabled;
use titan_core::types::DiscoveredExtension;
use titan_extensions::list_discovered;

use crate::cli::ListArgs;
use crate::output::{self, Status};

/// Row for a discovered extension
#[derive(Tabled, Serialize)]
struct ExtensionRow {
    name: String,
    source: String,
    #[tabled(rename = "entry module")]
    entry_module: String,
    native: String,
    path: String,
}

impl From<&DiscoveredExtension> for ExtensionRow {
    fn from(ext: &DiscoveredExtension) -> Self {
        let native = match &ext.descriptor.native_binding {
            Some(spec) => format!("{} ({} fn)", spec.location, spec.functions.len()),
            None => "-".to_string(),
        };
        Self {
            name: ext.name().to_string(),
            source: source_label(ext).to_string(),
            entry_module: ext.descriptor.entry_module_or_default().to_string(),
            native,
            path: ext.path.display().to_string(),
        }
    }
}

pub(crate) fn source_label(ext: &DiscoveredExtension) -> &'static str {
    if ext.is_local {
        "local"
    } else {
        "dependency"
    }
}

pub fn run(args: ListArgs, root: &Utf8Path) -> Result<()> {
    let discovered = list_discovered(root.as_std_path());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&discovered)?);
        return Ok(());
    }

    if discovered.is_empty() {
        output::status(Status::Note, format!("No extensions found under {}", root));
        return Ok(());
    }

    let rows: Vec<ExtensionRow> = discovered.iter().map(ExtensionRow::from).collect();
    output::table(rows);

    output::status(Status::Note, format!("{} extension(s) discovered", discovered.len()));
    Ok(())
}

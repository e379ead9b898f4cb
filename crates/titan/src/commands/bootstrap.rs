//! Bootstrap command

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::sync::Arc;
use tabled::Tabled;
use titan_core::BootstrapConfig;
use titan_extensions::{Bootstrapper, CommandModuleLoader, Namespace, Slot};

use crate::cli::BootstrapArgs;
use crate::output::{self, Status};

/// Row for one namespace entry
#[derive(Tabled)]
struct EntryRow {
    entry: String,
    kind: String,
    members: String,
}

fn entry_rows(namespace: &Namespace) -> Vec<EntryRow> {
    namespace
        .names()
        .filter_map(|name| namespace.get(name).map(|slot| (name, slot)))
        .map(|(name, slot)| match slot {
            Slot::Function(_) => EntryRow {
                entry: name.to_string(),
                kind: "function".to_string(),
                members: "-".to_string(),
            },
            Slot::Bag(bag) => EntryRow {
                entry: name.to_string(),
                kind: "bag".to_string(),
                members: if bag.is_empty() {
                    "-".to_string()
                } else {
                    bag.iter()
                        .map(|(member, binding)| {
                            if binding.is_callable() {
                                format!("{}()", member)
                            } else {
                                member.clone()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            },
        })
        .collect()
}

pub async fn run(args: BootstrapArgs, root: &Utf8Path, verbose: u8) -> Result<()> {
    let config = BootstrapConfig::from_env().with_root_dir(root.as_std_path());
    let config = if verbose > 0 {
        config.with_verbose(true)
    } else {
        config
    };

    let loader = CommandModuleLoader::new(&args.interpreter).with_args(args.interpreter_args);
    output::status(Status::Note, format!(
        "Bootstrapping extensions in {} (entry modules via {})",
        root,
        loader.program()
    ));

    let namespace = Bootstrapper::new(config)
        .with_module_loader(Arc::new(loader))
        .bootstrap()
        .await
        .context("Failed to bootstrap extensions")?;

    let ns = namespace.read();
    output::table(entry_rows(&ns));

    output::section(
        "Namespace",
        &[
            ("entries", ns.len().to_string()),
            ("extensions", ns.extension_names().join(", ")),
        ],
    );
    output::status(Status::Done, format!(
        "Activated {} extension(s)",
        ns.extension_names().len()
    ));
    Ok(())
}

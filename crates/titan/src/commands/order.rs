//! Order command

use anyhow::Result;
use camino::Utf8Path;
use serde::Serialize;
use tabled::Tabled;
use titan_core::BootstrapConfig;
use titan_extensions::{Bootstrapper, BrokenEdge, DependencyGraph};

use super::list::source_label;
use crate::cli::OrderArgs;
use crate::output::{self, Status};

/// Row for one position in the activation order
#[derive(Tabled, Serialize)]
struct OrderRow {
    #[tabled(rename = "#")]
    position: usize,
    name: String,
    source: String,
    depends: String,
}

#[derive(Serialize)]
struct OrderReport {
    order: Vec<OrderRow>,
    cycles: Vec<BrokenEdge>,
}

pub fn run(args: OrderArgs, root: &Utf8Path) -> Result<()> {
    // Discovery warnings still go to the log; the table is the output
    let config = BootstrapConfig::from_env().with_root_dir(root.as_std_path());
    let outcome = Bootstrapper::new(config).plan();

    let graph = DependencyGraph::from_extensions(&outcome.order);
    let rows: Vec<OrderRow> = outcome
        .order
        .iter()
        .enumerate()
        .map(|(i, ext)| {
            let active: Vec<&str> = graph
                .dependencies_of(ext.name())
                .iter()
                .map(String::as_str)
                .filter(|dep| outcome.order.iter().any(|e| e.name() == *dep))
                .collect();
            OrderRow {
                position: i + 1,
                name: ext.name().to_string(),
                source: source_label(ext).to_string(),
                depends: if active.is_empty() {
                    "-".to_string()
                } else {
                    active.join(", ")
                },
            }
        })
        .collect();

    if args.json {
        let report = OrderReport {
            order: rows,
            cycles: outcome.cycles,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::status(Status::Note, format!("No extensions found under {}", root));
        return Ok(());
    }

    output::table(rows);

    for edge in &outcome.cycles {
        output::status(Status::Problem, format!(
            "Cycle broken: {} -> {} ignored",
            edge.from, edge.to
        ));
    }

    Ok(())
}

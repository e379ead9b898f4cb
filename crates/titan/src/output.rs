//! Terminal rendering for command results

use console::style;
use tabled::{settings::Style, Table, Tabled};

/// What a status line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    Note,
    Problem,
}

/// Print a one-line status; problems go to stderr
pub fn status(status: Status, msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    match status {
        Status::Done => println!("{} {}", style("✓").green().bold(), msg),
        Status::Note => println!("{} {}", style("·").blue().bold(), msg),
        Status::Problem => eprintln!("{} {}", style("!").yellow().bold(), msg),
    }
}

/// Print rows as a table
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
}

/// Print a titled block of fields with aligned keys
pub fn section(title: &str, fields: &[(&str, String)]) {
    println!("\n{}", style(title).bold().underlined());
    for line in field_lines(fields) {
        println!("{}", line);
    }
}

fn field_lines(fields: &[(&str, String)]) -> Vec<String> {
    let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(key, value)| {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            format!("  {:<width$}  {}", key, value, width = width)
        })
        .collect()
}

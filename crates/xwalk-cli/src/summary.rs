use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use xwalk_cli::pipeline::FlatRow;
use xwalk_core::CrosswalkOutput;
use xwalk_model::Section;
use xwalk_tables::VerifySummary;

/// Prints the run summary; to stderr when the document itself went to stdout.
pub fn print_run_summary(output: &CrosswalkOutput, destination: Option<&Path>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("List"),
        header_cell("Records"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    let rows = [
        (Section::Methodology, "aspects", output.record_count(Section::Methodology)),
        (Section::System, "facets", output.record_count(Section::System)),
        (Section::Dataset, "datagroup", output.document.dataset.datagroup.len()),
        (Section::Dataset, "datapoint", output.record_count(Section::Dataset)),
    ];
    let mut total = 0usize;
    for (section, list, count) in rows {
        total += count;
        table.add_row(vec![
            Cell::new(section).fg(Color::Cyan),
            Cell::new(list),
            count_cell(count, Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);

    let namespaces = output
        .namespaces
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut lines = Vec::new();
    if let Some(path) = destination {
        lines.push(format!("Output: {}", path.display()));
    }
    lines.push(format!("Namespaces: {namespaces}"));
    lines.push(table.to_string());
    if let Some(warnings) = warning_table(output) {
        lines.push("Warnings:".to_string());
        lines.push(warnings.to_string());
    }

    let text = lines.join("\n");
    if destination.is_some() {
        println!("{text}");
    } else {
        eprintln!("{text}");
    }
}

fn warning_table(output: &CrosswalkOutput) -> Option<Table> {
    if output.warnings.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Message")]);
    apply_table_style(&mut table);
    for warning in &output.warnings {
        let kind = serde_json::to_value(warning)
            .ok()
            .and_then(|value| value.get("kind").and_then(|kind| kind.as_str().map(str::to_string)))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(kind).fg(Color::Yellow),
            Cell::new(warning.to_string()),
        ]);
    }
    Some(table)
}

pub fn print_tables_summary(summary: &VerifySummary) {
    println!("Tables: {}", summary.tables_dir.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in [
        ("crosswalks", summary.crosswalk_count),
        ("ontterms", summary.ontterm_count),
        ("namespaces", summary.namespace_count),
        ("override rules", summary.override_count),
        ("link rules", summary.link_count),
        ("group rules", summary.group_count),
    ] {
        table.add_row(vec![Cell::new(name), count_cell(count, Color::Green)]);
    }
    println!("{table}");
    println!(
        "Files: {} ({} checksum verified)",
        summary.file_count, summary.verified_count
    );
}

pub fn print_flat_rows(rows: &[FlatRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Path"),
        header_cell("Key"),
        header_cell("Section"),
        header_cell("Group link"),
        header_cell("Before override"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        let original = if row.original_link == row.group_link {
            dim_cell("-")
        } else {
            Cell::new(&row.original_link)
        };
        table.add_row(vec![
            Cell::new(&row.path_key),
            Cell::new(&row.local_key),
            Cell::new(format!("{}/{}", row.section, row.subsection)),
            Cell::new(&row.group_link).fg(Color::Cyan),
            original,
        ]);
    }
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

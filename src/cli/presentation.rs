//! CLI presentation: text tables and JSON for command output.

use crate::content::SlotMapping;
use crate::error::FillError;
use crate::fetcher::PoolSummary;
use crate::project::CheckReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::collections::BTreeMap;

fn format_section_heading(title: &str) -> String {
    format!("{}\n{}", title, "-".repeat(title.len()))
}

pub fn format_check_report(report: &CheckReport, format: &str) -> Result<String, FillError> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Roster")));
    out.push_str(&format!("  Recipients: {}\n", report.recipients));
    if !report.additional_columns.is_empty() {
        out.push_str(&format!(
            "  Additional columns: {}\n",
            report.additional_columns.join(", ")
        ));
    }
    out.push('\n');

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Column", "A", "B", "C", "D"]);
    for (column, grades) in &report.grade_counts {
        let mut row = vec![column.clone()];
        for grade in ["A", "B", "C", "D"] {
            row.push(grades.get(grade).copied().unwrap_or(0).to_string());
        }
        table.add_row(row);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Phrase pools")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Pool", "Phrases"]);
    for (pool, count) in &report.pools {
        table.add_row(vec![pool.clone(), count.to_string()]);
    }
    for path in &report.missing_pools {
        table.add_row(vec![path.display().to_string(), "missing".to_string()]);
    }
    out.push_str(&format!("{}\n", table));

    if report.is_ok() {
        out.push_str("\nOK");
    } else {
        out.push_str(&format!(
            "\n{} pool file(s) missing or empty",
            report.missing_pools.len()
        ));
    }
    Ok(out)
}

pub fn format_pool_inventory(pools: &[PoolSummary], format: &str) -> Result<String, FillError> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(pools)?);
    }
    if pools.is_empty() {
        return Ok("No phrase pools found.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Category", "Class", "Phrases"]);
    for pool in pools {
        table.add_row(vec![
            pool.category.clone(),
            pool.class_label.clone(),
            pool.phrases.to_string(),
        ]);
    }
    Ok(table.to_string())
}

/// One JSON object per row mapping slot name to its rendered text.
pub fn format_bindings_json(rows: &[SlotMapping]) -> Result<String, FillError> {
    let rendered: Vec<BTreeMap<&str, String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(name, node)| (name.as_str(), node.render()))
                .collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rendered)?)
}

pub fn format_names(words: &[String]) -> String {
    words.join("\n")
}

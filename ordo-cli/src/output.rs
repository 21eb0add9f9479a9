/// Output formatting: terminal table and JSON.
use ordo_core::{AnchorSample, CurveKind, ValueRow};
use serde::Serialize;

use crate::items::Item;

#[derive(Serialize)]
struct JsonValueRow<'a> {
    preference: usize,
    title: &'a str,
    price: f64,
    value: f64,
    price_minus_value: f64,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    curve: CurveKind,
    anchors: &'a [AnchorSample],
    comparisons: usize,
    items: Vec<JsonValueRow<'a>>,
}

/// Render the summary as a terminal table. Rows are already filtered.
pub fn render_table(rows: &[ValueRow], items: &[Item], precision: usize) -> String {
    let name_width = rows
        .iter()
        .map(|r| items[r.item].title.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    let mut out = String::new();
    out.push_str(&format!(
        "  # | {:<name_width$} | Listed price | Your estimate | Price - estimate\n",
        "Item"
    ));
    out.push_str(&format!(
        "----|-{}-|--------------|---------------|-----------------\n",
        "-".repeat(name_width)
    ));

    for r in rows {
        out.push_str(&format!(
            "{:>3} | {:<name_width$} | {:>12.precision$} | {:>13.precision$} | {:>16.precision$}\n",
            r.preference,
            items[r.item].title,
            r.price,
            r.value,
            r.overpay(),
        ));
    }
    out
}

/// Print results as a formatted terminal table.
pub fn print_table(rows: &[ValueRow], items: &[Item], precision: usize, total_rows: usize, comparisons: usize) {
    print!("{}", render_table(rows, items, precision));
    println!(
        "\n{} of {} items shown (preference 0 is your favorite), {} comparisons answered",
        rows.len(),
        total_rows,
        comparisons,
    );
}

pub fn render_json(
    rows: &[ValueRow],
    items: &[Item],
    curve: CurveKind,
    anchors: &[AnchorSample],
    comparisons: usize,
) -> serde_json::Result<String> {
    let output = JsonOutput {
        curve,
        anchors,
        comparisons,
        items: rows
            .iter()
            .map(|r| JsonValueRow {
                preference: r.preference,
                title: &items[r.item].title,
                price: r.price,
                value: r.value,
                price_minus_value: r.overpay(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

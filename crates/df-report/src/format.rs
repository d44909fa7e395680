//! Plain-text rendering of a path report.

use std::fmt::Write;

use crate::types::{ElementReportRow, PathReport};

const HEADER: [&str; 10] = [
    "№",
    "Наименование",
    "L, м",
    "Размер",
    "F, м²",
    "L, м³/ч",
    "v, м/с",
    "КМС",
    "ΔP, Па",
    "ΣΔP, Па",
];

fn cells(row: &ElementReportRow) -> [String; 10] {
    [
        row.section.to_string(),
        row.name.clone(),
        row.length_m.map_or_else(|| "-".to_string(), |l| format!("{l:.2}")),
        row.size.clone(),
        format!("{:.4}", row.area_m2),
        row.flow_m3h.to_string(),
        format!("{:.2}", row.velocity_mps),
        row.coefficient.map_or_else(|| "-".to_string(), |c| format!("{c}")),
        format!("{:.2}", row.pressure_drop_pa),
        format!("{:.2}", row.cumulative_pa),
    ]
}

/// Render the report as an aligned text table.
pub fn render_table(report: &PathReport) -> String {
    let body: Vec<[String; 10]> = report.rows.iter().map(cells).collect();
    let mut widths = HEADER.map(|h| h.chars().count());
    for line in &body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", report.system);
    push_line(&mut out, &HEADER.map(str::to_string), &widths);
    for line in &body {
        push_line(&mut out, line, &widths);
    }
    let _ = writeln!(out, "Σ {:.2} Па", report.total_pressure_drop_pa);
    out
}

fn push_line(out: &mut String, cells: &[String; 10], widths: &[usize; 10]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

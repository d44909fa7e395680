//! Presentation grouping: renumber rows by flow and collapse duct runs.

use crate::types::ElementReportRow;

/// Renumber rows into groups of roughly equal flow and merge consecutive
/// duct rows of the same size inside a group.
///
/// A new group starts when a row's flow differs from the flow of the group's
/// first row by more than `tolerance_m3h`. A merged row sums lengths and
/// pressure drops and keeps the running total of its last part.
pub fn group_rows(rows: Vec<ElementReportRow>, tolerance_m3h: f64) -> Vec<ElementReportRow> {
    let mut out: Vec<ElementReportRow> = Vec::with_capacity(rows.len());
    let mut ordinal = 0u32;
    let mut anchor: Option<i64> = None;

    for mut row in rows {
        let starts_group = anchor
            .is_none_or(|flow| (row.flow_m3h - flow).abs() as f64 > tolerance_m3h);
        if starts_group {
            ordinal += 1;
            anchor = Some(row.flow_m3h);
        }
        row.section = ordinal;

        match out.last_mut() {
            Some(prev) if mergeable(prev, &row) => merge_into(prev, row),
            _ => out.push(row),
        }
    }
    out
}

fn mergeable(prev: &ElementReportRow, row: &ElementReportRow) -> bool {
    prev.section == row.section
        && prev.kind == row.kind
        && row.kind.is_duct()
        && prev.size == row.size
}

fn merge_into(prev: &mut ElementReportRow, row: ElementReportRow) {
    prev.length_m = match (prev.length_m, row.length_m) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    };
    prev.pressure_drop_pa += row.pressure_drop_pa;
    prev.cumulative_pa = prev.cumulative_pa.max(row.cumulative_pa);
    prev.element_ids.extend(row.element_ids);
}

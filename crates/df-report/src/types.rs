//! Report data types.

use std::collections::BTreeMap;

use df_core::ElementId;
use serde::Serialize;

/// What a report row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Terminal,
    FlexDuct,
    Duct,
    Fitting,
    Accessory,
    Equipment,
    Other,
}

impl RowKind {
    pub fn is_duct(self) -> bool {
        matches!(self, RowKind::Duct | RowKind::FlexDuct)
    }
}

/// One line of the path report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReportRow {
    /// Section ordinal along the path, starting at 1.
    pub section: u32,
    pub name: String,
    /// `None` for elements without a length.
    pub length_m: Option<f64>,
    /// Size label of the cross-section (`ø200`, `400x200`), `-` if unknown.
    pub size: String,
    pub area_m2: f64,
    pub flow_m3h: i64,
    pub velocity_mps: f64,
    /// Rounded to two decimals; `None` where no coefficient applies.
    pub coefficient: Option<f64>,
    pub pressure_drop_pa: f64,
    pub cumulative_pa: f64,
    /// Host elements the row stands for (several after merging duct runs).
    pub element_ids: Vec<ElementId>,
    pub kind: RowKind,
}

/// Result of one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    pub system: String,
    pub rows: Vec<ElementReportRow>,
    /// Coefficient of every classified fitting that may be written back.
    pub coefficients: BTreeMap<ElementId, f64>,
    /// Elements held by someone else: analysed, but not written back.
    pub unavailable: Vec<ElementId>,
    pub total_pressure_drop_pa: f64,
}

impl PathReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

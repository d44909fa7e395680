//! Calculation settings.

use crate::error::{DfError, DfResult};
use crate::units::constants::AIR_DENSITY_KG_M3;

/// Tunable parameters of one calculation run.
///
/// Every field has a default, so a partial `settings:` block in a project
/// file only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalcSettings {
    /// Air density used for dynamic pressure ρ·v²/2, kg/m³.
    pub air_density_kg_m3: f64,
    /// Rows whose flows differ by no more than this share a section ordinal, m³/h.
    pub flow_group_tolerance_m3h: f64,
    /// Upper bound on section indices probed on the host.
    pub section_probe_limit: usize,
    /// Bend radius assumed for rectangular elbows without one, mm.
    pub default_bend_radius_mm: f64,
    /// Allowed deviation from 90° when testing a tap against its duct, degrees.
    pub right_angle_tolerance_deg: f64,
    /// Connector pairs opening wider than this are one straight run, degrees.
    pub straight_angle_threshold_deg: f64,
}

impl Default for CalcSettings {
    fn default() -> Self {
        Self {
            air_density_kg_m3: AIR_DENSITY_KG_M3,
            flow_group_tolerance_m3h: 5.0,
            section_probe_limit: 500,
            default_bend_radius_mm: 150.0,
            right_angle_tolerance_deg: 10.0,
            straight_angle_threshold_deg: 100.0,
        }
    }
}

impl CalcSettings {
    /// Reject settings no calculation can run with.
    pub fn validate(&self) -> DfResult<()> {
        positive("air_density_kg_m3", self.air_density_kg_m3)?;
        positive("default_bend_radius_mm", self.default_bend_radius_mm)?;
        if !(self.flow_group_tolerance_m3h >= 0.0) {
            return Err(DfError::InvalidSetting {
                name: "flow_group_tolerance_m3h",
                value: self.flow_group_tolerance_m3h,
                reason: "must be non-negative",
            });
        }
        if self.section_probe_limit == 0 {
            return Err(DfError::InvalidSetting {
                name: "section_probe_limit",
                value: 0.0,
                reason: "must allow at least one section",
            });
        }
        if !(0.0..=90.0).contains(&self.right_angle_tolerance_deg) {
            return Err(DfError::InvalidSetting {
                name: "right_angle_tolerance_deg",
                value: self.right_angle_tolerance_deg,
                reason: "must be within 0..=90",
            });
        }
        if !(90.0..180.0).contains(&self.straight_angle_threshold_deg) {
            return Err(DfError::InvalidSetting {
                name: "straight_angle_threshold_deg",
                value: self.straight_angle_threshold_deg,
                reason: "must be within 90..180",
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> DfResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DfError::InvalidSetting {
            name,
            value,
            reason: "must be positive",
        })
    }
}

//! Project schema definitions.
//!
//! Everything in the file is metric: millimeters, m³/h, degrees, pascals.

use std::collections::BTreeMap;

use df_core::CalcSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub settings: CalcSettings,
    #[serde(default)]
    pub systems: Vec<SystemDef>,
}

impl Project {
    pub fn system(&self, id: &str) -> Option<&SystemDef> {
        self.systems.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemDef {
    pub id: String,
    pub name: String,
    pub kind: SystemKindDef,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub sections: Vec<SectionDef>,
    /// Section numbers from the terminal towards the source.
    #[serde(default)]
    pub critical_path: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SystemKindDef {
    Supply,
    Return,
    Exhaust,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDef {
    Terminal,
    FlexDuct,
    Duct,
    Fitting,
    Accessory,
    Equipment,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartTypeDef {
    #[default]
    Undefined,
    Elbow,
    Transition,
    Tee,
    Cross,
    Tap,
    Union,
    Cap,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub id: u64,
    pub name: String,
    pub category: CategoryDef,
    #[serde(default)]
    pub part_type: PartTypeDef,
    /// Insertion point, mm.
    #[serde(default)]
    pub location_mm: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_radius_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unavailable: bool,
    #[serde(default)]
    pub connectors: Vec<ConnectorDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShapeDef {
    Round,
    Rectangular,
    Oval,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectionDef {
    In,
    Out,
    Bidirectional,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorDef {
    pub shape: ShapeDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,
    /// Fitting angle, degrees.
    #[serde(default)]
    pub angle_deg: f64,
    pub flow_m3h: f64,
    pub direction: DirectionDef,
    pub origin_mm: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionDef {
    pub number: u32,
    pub flow_m3h: f64,
    pub elements: Vec<u64>,
    /// Host-computed pressure drop per member element, Pa.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pressure_drops_pa: BTreeMap<u64, f64>,
}

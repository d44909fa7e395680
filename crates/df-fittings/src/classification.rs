//! The result of classifying one fitting.
//!
//! A classification is a pure computation artifact: created per fitting per
//! run, consumed by the coefficient engine and the report, never stored.

use df_core::ElementId;
use df_network::{ConnectorDescriptor, SystemKind};

use crate::common::angle_bucket;

/// Normalized junction ratios against the common (combined-flow) leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowRatios {
    /// Lo / Lc
    pub lo: f64,
    /// Lp / Lc
    pub lp: f64,
    /// fo / fc
    pub fo: f64,
    /// fp / fc
    pub fp: f64,
}

impl FlowRatios {
    /// Branch velocity over common velocity.
    pub fn branch_velocity_ratio(&self) -> f64 {
        self.lo / self.fo
    }

    /// Passage velocity over common velocity.
    pub fn pass_velocity_ratio(&self) -> f64 {
        self.lp / self.fp
    }
}

/// Which empirical formula a tee or cross uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionFamily {
    SupplyPass,
    SupplyBranchRound,
    SupplyBranchRect,
    SupplySeparation,
    ExhaustPassRound,
    ExhaustPassRect,
    ExhaustBranchRound,
    ExhaustBranchRect,
    ExhaustMerger,
}

impl JunctionFamily {
    /// Family part of the display name.
    pub fn label(self) -> &'static str {
        match self {
            JunctionFamily::SupplyPass => "нагнетание проход",
            JunctionFamily::SupplyBranchRound => "нагнетание ответвление круглый",
            JunctionFamily::SupplyBranchRect => "нагнетание ответвление прямоугольный",
            JunctionFamily::SupplySeparation => "нагнетание разделение",
            JunctionFamily::ExhaustPassRound => "всасывание проход круглый",
            JunctionFamily::ExhaustPassRect => "всасывание проход прямоугольный",
            JunctionFamily::ExhaustBranchRound => "всасывание ответвление круглый",
            JunctionFamily::ExhaustBranchRect => "всасывание ответвление прямоугольный",
            JunctionFamily::ExhaustMerger => "всасывание слияние",
        }
    }

    pub fn is_supply(self) -> bool {
        matches!(
            self,
            JunctionFamily::SupplyPass
                | JunctionFamily::SupplyBranchRound
                | JunctionFamily::SupplyBranchRect
                | JunctionFamily::SupplySeparation
        )
    }
}

/// Which leg of a junction the critical path leaves (supply) or enters
/// (exhaust) through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLeg {
    Branch,
    Pass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Elbow {
    pub element: ElementId,
    pub input: ConnectorDescriptor,
    pub output: ConnectorDescriptor,
    pub angle_deg: f64,
    pub bend_radius_m: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub element: ElementId,
    pub input: ConnectorDescriptor,
    pub output: ConnectorDescriptor,
    /// Distance between the two connector origins, meters.
    pub length_m: f64,
    /// Full cone angle, degrees.
    pub angle_deg: f64,
    pub name: String,
}

impl Transition {
    /// Area shrinks along the flow.
    pub fn is_confuser(&self) -> bool {
        self.input.area_m2() > self.output.area_m2()
    }
}

/// A tee or a cross.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub element: ElementId,
    pub family: JunctionFamily,
    /// Leg carrying the combined flow.
    pub common: ConnectorDescriptor,
    /// Side leg (for a cross in pass mode: the larger side leg).
    pub branch: ConnectorDescriptor,
    /// Leg continuing the common leg's run.
    pub pass: ConnectorDescriptor,
    pub path_leg: PathLeg,
    pub ratios: FlowRatios,
    /// Deflection of the branch from the common leg, degrees.
    pub angle_deg: f64,
    pub name: String,
}

impl Junction {
    /// Connector the critical path follows besides the common leg.
    pub fn path_connector(&self) -> &ConnectorDescriptor {
        match self.path_leg {
            PathLeg::Branch => &self.branch,
            PathLeg::Pass => &self.pass,
        }
    }
}

/// A branch inserted into a straight duct run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tap {
    pub element: ElementId,
    /// Tap connector on the branch side.
    pub branch: ConnectorDescriptor,
    /// Tap connector on the penetrated duct.
    pub main: ConnectorDescriptor,
    /// Cross-section of the penetrated duct, m².
    pub main_area_m2: f64,
    /// Flow leaves through the branch (diverging).
    pub on_output_side: bool,
    /// The penetrated duct carries no flow past the tap.
    pub dead_end: bool,
    pub bend_radius_m: f64,
    pub name: String,
}

impl Tap {
    /// f / F
    pub fn area_ratio(&self) -> f64 {
        self.branch.area_m2() / self.main_area_m2
    }
}

/// Structural role of a fitting, decided once during classification.
#[derive(Debug, Clone, PartialEq)]
pub enum FittingClassification {
    Elbow(Elbow),
    Transition(Transition),
    Tee(Junction),
    Cross(Junction),
    Tap(Tap),
}

impl FittingClassification {
    pub fn element(&self) -> ElementId {
        match self {
            FittingClassification::Elbow(f) => f.element,
            FittingClassification::Transition(f) => f.element,
            FittingClassification::Tee(f) | FittingClassification::Cross(f) => f.element,
            FittingClassification::Tap(f) => f.element,
        }
    }

    /// Display name for the report.
    pub fn name(&self) -> &str {
        match self {
            FittingClassification::Elbow(f) => &f.name,
            FittingClassification::Transition(f) => &f.name,
            FittingClassification::Tee(f) | FittingClassification::Cross(f) => &f.name,
            FittingClassification::Tap(f) => &f.name,
        }
    }

    /// Connector whose velocity the coefficient refers to; its area and flow
    /// are what the report shows for the fitting.
    pub fn reference_connector(&self) -> &ConnectorDescriptor {
        match self {
            FittingClassification::Elbow(f) => &f.input,
            FittingClassification::Transition(f) => {
                if f.input.area_m2() <= f.output.area_m2() {
                    &f.input
                } else {
                    &f.output
                }
            }
            FittingClassification::Tee(f) | FittingClassification::Cross(f) => f.path_connector(),
            FittingClassification::Tap(f) => &f.branch,
        }
    }
}

fn shape_word(c: &ConnectorDescriptor) -> &'static str {
    if c.is_round() {
        "круглый"
    } else {
        "прямоугольный"
    }
}

pub(crate) fn elbow_name(input: &ConnectorDescriptor, angle_deg: f64) -> String {
    format!(
        "Отвод {} {} {}°",
        shape_word(input),
        input.size_label(),
        angle_bucket(angle_deg)
    )
}

pub(crate) fn transition_name(
    input: &ConnectorDescriptor,
    output: &ConnectorDescriptor,
    angle_deg: f64,
) -> String {
    let kind = if input.area_m2() > output.area_m2() {
        "конфузор"
    } else {
        "диффузор"
    };
    format!(
        "Переход {} {}-{} {}°",
        kind,
        input.size_label(),
        output.size_label(),
        angle_bucket(angle_deg)
    )
}

pub(crate) fn junction_name(
    cross: bool,
    family: JunctionFamily,
    reference: &ConnectorDescriptor,
    angle_deg: f64,
) -> String {
    let kind = if cross { "Крестовина" } else { "Тройник" };
    format!(
        "{} {} {} {}°",
        kind,
        family.label(),
        reference.size_label(),
        angle_bucket(angle_deg)
    )
}

pub(crate) fn tap_name(kind: SystemKind, branch: &ConnectorDescriptor, angle_deg: f64) -> String {
    let mode = if kind.is_supply() {
        "нагнетание"
    } else {
        "всасывание"
    };
    format!(
        "Врезка {} {} {}°",
        mode,
        branch.size_label(),
        angle_bucket(angle_deg)
    )
}

//! Coefficient engine: empirical local resistance formulas.
//!
//! Junction formulas work on the ratios against the common leg
//! (`lo = Lo/Lc`, `lp = Lp/Lc`, `fo = fo/fc`, `fp = fp/fc`) and the velocity
//! ratios `vo = lo/fo`, `vp = lp/fp`. Each gives ζc referred to the common
//! velocity; the result is re-referred to the path leg as `ξ = ζc / v²`.
//!
//! | family                      | ζc                                  | v  |
//! |-----------------------------|-------------------------------------|----|
//! | supply pass                 | 0.4·lo²                             | vp |
//! | supply branch, round        | A·(1 + vo²)                         | vo |
//! | supply branch, rectangular  | A·(0.34 + vo²)                      | vo |
//! | supply separation           | 1 + 0.3·vo²                         | vo |
//! | exhaust pass, round         | 1.55·lo − lo²                       | vp |
//! | exhaust pass, rectangular   | 1 − (1 − lo)² − (1.4 − lo)·lo²      | vp |
//! | exhaust branch, round       | A·(1 + vo² − 2(1 − lo)²)            | vo |
//! | exhaust branch, rectangular | A·(1 + vo² − 2(1 − lo)²/fp)         | vo |
//! | exhaust merger              | 1 + vo² − 3(1 − lo)²                | vo |

use df_core::numeric::{nearly_equal, Tolerances};
use df_core::ElementId;
use df_network::{ConnectorDescriptor, Profile};
use tracing::trace;

use crate::classification::{
    Elbow, FittingClassification, FlowRatios, Junction, JunctionFamily, Tap, Transition,
};
use crate::common::check_finite;
use crate::error::{FittingError, FittingResult};
use crate::tables::{
    angle_band, area_ratio_band, length_band, CONFUSER_RECT, CONFUSER_ROUND, DIFFUSER_RECT,
    DIFFUSER_ROUND,
};
use crate::traits::ResistanceModel;

/// Round elbow turning more than this counts as a right-angle bend, degrees.
const ROUND_ELBOW_RIGHT_ANGLE_DEG: f64 = 85.0;
const ROUND_ELBOW_RIGHT: f64 = 0.33;
const ROUND_ELBOW_SHARP: f64 = 0.18;
/// Rectangular elbows up to this angle get the reduced-angle factor, degrees.
const RECT_ELBOW_REDUCED_ANGLE_DEG: f64 = 60.0;
const RECT_ELBOW_REDUCED_FACTOR: f64 = 0.708;

/// The built-in empirical model.
#[derive(Debug, Clone, Default)]
pub struct CoefficientEngine;

impl CoefficientEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ResistanceModel for CoefficientEngine {
    fn name(&self) -> &str {
        "empirical"
    }

    fn coefficient(&self, fitting: &FittingClassification) -> FittingResult<f64> {
        let xi = match fitting {
            FittingClassification::Elbow(e) => elbow(e),
            FittingClassification::Transition(t) => transition(t),
            FittingClassification::Tee(j) | FittingClassification::Cross(j) => junction(j),
            FittingClassification::Tap(t) => tap(t),
        }?;
        trace!(element = %fitting.element(), xi, "local coefficient");
        check_finite(xi, fitting.element(), "local resistance coefficient")
    }
}

fn elbow(e: &Elbow) -> FittingResult<f64> {
    match e.input.profile {
        Profile::Round { .. } => Ok(elbow_round(e.angle_deg)),
        Profile::Rectangular { width, height } => {
            elbow_rect(e.element, width.value, height.value, e.bend_radius_m, e.angle_deg)
        }
    }
}

/// Round elbow: fixed value by angle class.
pub fn elbow_round(angle_deg: f64) -> f64 {
    if angle_deg > ROUND_ELBOW_RIGHT_ANGLE_DEG {
        ROUND_ELBOW_RIGHT
    } else {
        ROUND_ELBOW_SHARP
    }
}

/// Rectangular elbow of width `b`, height `h` and inner bend radius `r`,
/// all in meters:
/// `0.25·(b/h)^0.25·(1.07·e^(2/(2(r + b/2)/b + 1)) − 1)²`,
/// reduced by 0.708 for angles up to 60°.
pub fn elbow_rect(
    element: ElementId,
    b: f64,
    h: f64,
    r: f64,
    angle_deg: f64,
) -> FittingResult<f64> {
    if b <= 0.0 || h <= 0.0 || r < 0.0 {
        return Err(FittingError::NonPhysical {
            element,
            what: "elbow dimensions",
        });
    }
    let relative_radius = 2.0 * (r + b / 2.0) / b;
    let shape = (b / h).powf(0.25);
    let bend = 1.07 * (2.0 / (relative_radius + 1.0)).exp() - 1.0;
    let mut xi = 0.25 * shape * bend * bend;
    if angle_deg <= RECT_ELBOW_REDUCED_ANGLE_DEG {
        xi *= RECT_ELBOW_REDUCED_FACTOR;
    }
    check_finite(xi, element, "rectangular elbow coefficient")
}

/// Standard right-angle elbow of a connector's profile.
fn right_elbow(
    element: ElementId,
    c: &ConnectorDescriptor,
    bend_radius_m: f64,
) -> FittingResult<f64> {
    match c.profile {
        Profile::Round { .. } => Ok(elbow_round(90.0)),
        Profile::Rectangular { width, height } => {
            elbow_rect(element, width.value, height.value, bend_radius_m, 90.0)
        }
    }
}

/// Tap into a duct run. A tap into a dead end, or one as large as the duct,
/// turns the whole flow and behaves as a right-angle elbow.
fn tap(t: &Tap) -> FittingResult<f64> {
    let ratio = t.area_ratio();
    if t.dead_end || nearly_equal(t.branch.area_m2(), t.main_area_m2, Tolerances::geometric()) {
        return right_elbow(t.element, &t.branch, t.bend_radius_m);
    }
    let r2 = ratio * ratio;
    Ok(if t.on_output_side {
        r2 + 0.7 * r2
    } else {
        0.4 + 0.7 * r2
    })
}

fn transition(t: &Transition) -> FittingResult<f64> {
    let a_in = t.input.area_m2();
    let a_out = t.output.area_m2();
    if nearly_equal(a_in, a_out, Tolerances::geometric()) {
        return Ok(0.0);
    }
    let round = t.input.is_round() && t.output.is_round();
    let col = angle_band(t.angle_deg);

    if t.is_confuser() {
        let d = t.input.equivalent_diameter_m();
        let relative_length = check_finite(t.length_m / d, t.element, "confuser l/D")?;
        let row = length_band(relative_length);
        let table = if round {
            &CONFUSER_ROUND
        } else {
            &CONFUSER_RECT
        };
        Ok(table[row][col])
    } else {
        let row = area_ratio_band(a_in / a_out);
        let table = if round {
            &DIFFUSER_ROUND
        } else {
            &DIFFUSER_RECT
        };
        Ok(table[row][col])
    }
}

fn junction(j: &Junction) -> FittingResult<f64> {
    let (zeta_c, v) = junction_common(j.family, &j.ratios);
    let zeta_c = check_finite(zeta_c, j.element, "junction coefficient")?;
    let v = check_finite(v, j.element, "junction velocity ratio")?;
    if v == 0.0 {
        return Err(FittingError::NonPhysical {
            element: j.element,
            what: "no flow through the path leg",
        });
    }
    check_finite(zeta_c / (v * v), j.element, "junction coefficient")
}

/// Branch factor A of supply junctions.
fn supply_branch_factor(vo: f64) -> f64 {
    if vo <= 0.8 { 1.0 } else { 0.9 }
}

/// Branch factor A of exhaust junctions.
fn exhaust_branch_factor(r: &FlowRatios) -> f64 {
    if r.fo <= 0.35 {
        1.0
    } else if r.lo <= 0.4 {
        0.9 * (1.0 - r.lo)
    } else {
        0.55
    }
}

/// ζc referred to the common velocity, and the velocity ratio of the leg the
/// result is re-referred to.
pub fn junction_common(family: JunctionFamily, r: &FlowRatios) -> (f64, f64) {
    let vo = r.branch_velocity_ratio();
    let vp = r.pass_velocity_ratio();
    let lo = r.lo;
    match family {
        JunctionFamily::SupplyPass => (0.4 * lo * lo, vp),
        JunctionFamily::SupplyBranchRound => (supply_branch_factor(vo) * (1.0 + vo * vo), vo),
        JunctionFamily::SupplyBranchRect => (supply_branch_factor(vo) * (0.34 + vo * vo), vo),
        JunctionFamily::SupplySeparation => (1.0 + 0.3 * vo * vo, vo),
        JunctionFamily::ExhaustPassRound => (1.55 * lo - lo * lo, vp),
        JunctionFamily::ExhaustPassRect => {
            let rest = 1.0 - lo;
            (1.0 - rest * rest - (1.4 - lo) * lo * lo, vp)
        }
        JunctionFamily::ExhaustBranchRound => {
            let rest = 1.0 - lo;
            (exhaust_branch_factor(r) * (1.0 + vo * vo - 2.0 * rest * rest), vo)
        }
        JunctionFamily::ExhaustBranchRect => {
            let rest = 1.0 - lo;
            (
                exhaust_branch_factor(r) * (1.0 + vo * vo - 2.0 * rest * rest / r.fp),
                vo,
            )
        }
        JunctionFamily::ExhaustMerger => {
            let rest = 1.0 - lo;
            (1.0 + vo * vo - 3.0 * rest * rest, vo)
        }
    }
}

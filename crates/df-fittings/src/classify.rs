//! Fitting classifier: structural role and orientation from connector
//! geometry, flow directions and critical path membership.

use df_core::geometry::{angle_at, angle_deg, deflection_at, is_right_angle};
use df_core::numeric::{nearly_equal, Tolerances};
use df_core::{CalcSettings, ElementId};
use df_network::{
    describe_connectors, ConnectorDescriptor, DuctHost, HostElement, NetworkError, TopologyIndex,
};
use tracing::{debug, warn};

use crate::classification::{
    elbow_name, junction_name, tap_name, transition_name, Elbow, FittingClassification, FlowRatios,
    Junction, JunctionFamily, PathLeg, Tap, Transition,
};
use crate::common::{check_finite, MASS_BALANCE_TOLERANCE, STRAIGHT_DEFLECTION_DEG};
use crate::error::{FittingError, FittingResult};
use crate::resolve::{fitting_flow_ends, FlowEnds};

/// Geometric arrangement of a junction's legs relative to the common leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrangement {
    /// Path leg continues the common leg's run.
    Pass,
    /// Path leg leaves the run sideways.
    Branch,
    /// Common leg is the stem; the flow splits (or joins) symmetrically.
    Split,
}

/// Classifies fittings of one system against its topology.
pub struct Classifier<'a> {
    host: &'a dyn DuctHost,
    topology: &'a TopologyIndex,
    settings: CalcSettings,
}

impl<'a> Classifier<'a> {
    pub fn new(
        host: &'a dyn DuctHost,
        topology: &'a TopologyIndex,
        settings: &CalcSettings,
    ) -> Self {
        Self {
            host,
            topology,
            settings: *settings,
        }
    }

    pub fn host(&self) -> &'a dyn DuctHost {
        self.host
    }

    pub fn topology(&self) -> &'a TopologyIndex {
        self.topology
    }

    pub fn settings(&self) -> &CalcSettings {
        &self.settings
    }

    /// Classify one fitting element.
    pub fn classify(&self, id: ElementId) -> FittingResult<FittingClassification> {
        let element = self
            .host
            .element(id)
            .ok_or(NetworkError::UnknownElement { element: id })?;
        let connectors = describe_connectors(self.host, id)?;

        let classification = match connectors.len() {
            2 => match self.tap_main_side(&connectors)? {
                Some(main) => self.classify_tap(&element, &connectors, main)?,
                None => self.classify_two_port(&element, &connectors)?,
            },
            3 => self.classify_tee(&element, &connectors)?,
            4 => self.classify_cross(&element, &connectors)?,
            n => {
                return Err(FittingError::UnknownFittingType {
                    element: id,
                    what: format!("{} connectors", n),
                });
            }
        };

        debug!(element = %id, name = classification.name(), "classified fitting");
        Ok(classification)
    }

    fn bend_radius_m(&self, element: &HostElement) -> f64 {
        element
            .bend_radius_m()
            .unwrap_or(self.settings.default_bend_radius_mm / 1000.0)
    }

    fn ends(&self, id: ElementId, connectors: &[ConnectorDescriptor]) -> FittingResult<FlowEnds> {
        fitting_flow_ends(id, self.topology, connectors)
    }

    /// Position of the connector joining a straight duct mid-run, if any.
    ///
    /// A duct with more than two connectors has something inserted into it.
    fn tap_main_side(&self, connectors: &[ConnectorDescriptor]) -> FittingResult<Option<usize>> {
        for c in connectors {
            let Some(neighbour) = c.connected else {
                continue;
            };
            let Some(el) = self.host.element(neighbour) else {
                continue;
            };
            if el.category.is_straight() && self.host.connectors(neighbour).len() > 2 {
                return Ok(Some(c.index));
            }
        }
        Ok(None)
    }

    fn classify_two_port(
        &self,
        element: &HostElement,
        connectors: &[ConnectorDescriptor],
    ) -> FittingResult<FittingClassification> {
        let ends = self.ends(element.id, connectors)?;
        let input = connectors[ends.input].clone();
        let output = connectors[ends.output].clone();
        let location = element.location_m();

        let equal_area = nearly_equal(input.area_m2(), output.area_m2(), Tolerances::geometric());
        let attr_angle = input.angle_deg.max(output.angle_deg);
        let deflection =
            deflection_at(&location, &input.origin, &output.origin).unwrap_or(0.0);

        if equal_area && (attr_angle > 0.0 || deflection >= STRAIGHT_DEFLECTION_DEG) {
            let angle_deg = if attr_angle > 0.0 {
                attr_angle
            } else {
                deflection
            };
            return Ok(FittingClassification::Elbow(Elbow {
                element: element.id,
                name: elbow_name(&input, angle_deg),
                input,
                output,
                angle_deg,
                bend_radius_m: self.bend_radius_m(element),
            }));
        }

        let length_m = (output.origin - input.origin).norm();
        let dd = (input.equivalent_diameter_m() - output.equivalent_diameter_m()).abs();
        let angle_deg = if length_m > 0.0 {
            2.0 * (dd / (2.0 * length_m)).atan().to_degrees()
        } else {
            90.0
        };
        Ok(FittingClassification::Transition(Transition {
            element: element.id,
            name: transition_name(&input, &output, angle_deg),
            input,
            output,
            length_m,
            angle_deg,
        }))
    }

    fn classify_tap(
        &self,
        element: &HostElement,
        connectors: &[ConnectorDescriptor],
        main_pos: usize,
    ) -> FittingResult<FittingClassification> {
        let main = connectors[main_pos].clone();
        let branch = connectors
            .iter()
            .find(|c| c.index != main_pos)
            .cloned()
            .ok_or(FittingError::UnresolvedFlowDirection { element: element.id })?;
        let duct = main
            .connected
            .ok_or(FittingError::UnresolvedFlowDirection { element: element.id })?;

        // Ends of the penetrated duct: every connector not joined to this tap.
        let duct_ends: Vec<ConnectorDescriptor> = describe_connectors(self.host, duct)?
            .into_iter()
            .filter(|c| c.connected != Some(element.id))
            .collect();
        let main_area_m2 = duct_ends
            .iter()
            .map(|c| c.area_m2())
            .reduce(f64::max)
            .ok_or(NetworkError::MissingSectionData { element: duct })?;

        let duct_flows = self.topology.flows_for(duct);
        if duct_flows.is_empty() {
            return Err(NetworkError::MissingSectionData { element: duct }.into());
        }
        let dead_end = duct_flows.iter().any(|&q| q <= 0.0);

        let ends = self.ends(element.id, connectors)?;
        let on_output_side = ends.output == branch.index;

        let tap_dir = branch.origin - main.origin;
        let endpoint_angles: Vec<Option<f64>> = duct_ends
            .iter()
            .map(|end| angle_deg(&tap_dir, &(end.origin - main.origin)))
            .collect();
        let perpendicular = if endpoint_angles.len() < 2 {
            debug!(
                element = %element.id,
                "penetrated duct has no two ends, assuming a right angle"
            );
            true
        } else {
            endpoint_angles.iter().all(|a| {
                a.is_some_and(|a| is_right_angle(a, self.settings.right_angle_tolerance_deg))
            })
        };

        if !perpendicular && !dead_end {
            // Angled tap: behaves as an elbow turning by its angle to the duct axis.
            let axis_angle = endpoint_angles
                .iter()
                .flatten()
                .map(|a| a.min(180.0 - *a))
                .reduce(f64::min)
                .ok_or(FittingError::NonPhysical {
                    element: element.id,
                    what: "tap direction",
                })?;
            debug!(element = %element.id, angle = axis_angle, "angled tap classified as elbow");
            let input = connectors[ends.input].clone();
            let output = connectors[ends.output].clone();
            return Ok(FittingClassification::Elbow(Elbow {
                element: element.id,
                name: elbow_name(&branch, axis_angle),
                input,
                output,
                angle_deg: axis_angle,
                bend_radius_m: self.bend_radius_m(element),
            }));
        }

        Ok(FittingClassification::Tap(Tap {
            element: element.id,
            name: tap_name(self.topology.system_kind(), &branch, 90.0),
            branch,
            main,
            main_area_m2,
            on_output_side,
            dead_end,
            bend_radius_m: self.bend_radius_m(element),
        }))
    }

    fn classify_tee(
        &self,
        element: &HostElement,
        connectors: &[ConnectorDescriptor],
    ) -> FittingResult<FittingClassification> {
        let id = element.id;
        let location = element.location_m();
        let supply = self.topology.system_kind().is_supply();
        let ends = self.ends(id, connectors)?;
        let (common, leg) = if supply {
            (ends.input, ends.output)
        } else {
            (ends.output, ends.input)
        };
        let other = (0..connectors.len())
            .find(|&i| i != common && i != leg)
            .ok_or(FittingError::UnresolvedFlowDirection { element: id })?;

        let c = &connectors[common];
        let l = &connectors[leg];
        let o = &connectors[other];
        let angle = |a: &ConnectorDescriptor, b: &ConnectorDescriptor| {
            angle_at(&location, &a.origin, &b.origin).ok_or(FittingError::NonPhysical {
                element: id,
                what: "coincident connector origins",
            })
        };
        let common_leg = angle(c, l)?;
        let common_other = angle(c, o)?;
        let leg_other = angle(l, o)?;

        let threshold = self.settings.straight_angle_threshold_deg;
        let widest = common_leg.max(common_other).max(leg_other);
        let arrangement = if widest >= threshold {
            if widest == common_leg {
                Arrangement::Pass
            } else if widest == common_other {
                Arrangement::Branch
            } else {
                Arrangement::Split
            }
        } else if self.neighbour_on_path(o) {
            // No straight run (Y-shape): the path passes unless the other leg is on it too.
            Arrangement::Branch
        } else {
            Arrangement::Pass
        };

        let (branch, pass, path_leg) = match arrangement {
            Arrangement::Pass => (o, l, PathLeg::Pass),
            Arrangement::Branch | Arrangement::Split => (l, o, PathLeg::Branch),
        };
        let family = junction_family(supply, arrangement, branch, pass);
        let ratios = junction_ratios(id, c, branch.flow_m3h, branch, pass)?;
        let angle_deg = deflection_at(&location, &c.origin, &branch.origin).unwrap_or(90.0);
        let reference = if path_leg == PathLeg::Branch {
            branch
        } else {
            pass
        };

        Ok(FittingClassification::Tee(Junction {
            element: id,
            family,
            name: junction_name(false, family, reference, angle_deg),
            common: c.clone(),
            branch: branch.clone(),
            pass: pass.clone(),
            path_leg,
            ratios,
            angle_deg,
        }))
    }

    fn classify_cross(
        &self,
        element: &HostElement,
        connectors: &[ConnectorDescriptor],
    ) -> FittingResult<FittingClassification> {
        let id = element.id;
        let location = element.location_m();
        let supply = self.topology.system_kind().is_supply();
        let ends = self.ends(id, connectors)?;
        let (common, leg) = if supply {
            (ends.input, ends.output)
        } else {
            (ends.output, ends.input)
        };
        let c = &connectors[common];

        // The straight continuation of the common leg is the one opening widest.
        let mut opposite: Option<(usize, f64)> = None;
        for cand in connectors.iter().filter(|x| x.index != common) {
            let a = angle_at(&location, &c.origin, &cand.origin).ok_or(
                FittingError::NonPhysical {
                    element: id,
                    what: "coincident connector origins",
                },
            )?;
            if opposite.is_none_or(|(_, best)| a > best) {
                opposite = Some((cand.index, a));
            }
        }
        let (pass_pos, _) =
            opposite.ok_or(FittingError::UnresolvedFlowDirection { element: id })?;
        let pass = &connectors[pass_pos];
        let sides: Vec<&ConnectorDescriptor> = connectors
            .iter()
            .filter(|x| x.index != common && x.index != pass_pos)
            .collect();

        let (arrangement, branch, branch_flow) = if leg == pass_pos {
            let larger = sides
                .iter()
                .copied()
                .max_by(|a, b| a.flow_m3h.total_cmp(&b.flow_m3h))
                .ok_or(FittingError::UnresolvedFlowDirection { element: id })?;
            let total: f64 = sides.iter().map(|s| s.flow_m3h).sum();
            (Arrangement::Pass, larger, total)
        } else {
            let l = &connectors[leg];
            (Arrangement::Branch, l, l.flow_m3h)
        };

        let path_leg = if arrangement == Arrangement::Pass {
            PathLeg::Pass
        } else {
            PathLeg::Branch
        };
        let family = junction_family(supply, arrangement, branch, pass);
        let ratios = junction_ratios(id, c, branch_flow, branch, pass)?;
        let angle_deg = deflection_at(&location, &c.origin, &branch.origin).unwrap_or(90.0);
        let reference = if path_leg == PathLeg::Branch {
            branch
        } else {
            pass
        };

        Ok(FittingClassification::Cross(Junction {
            element: id,
            family,
            name: junction_name(true, family, reference, angle_deg),
            common: c.clone(),
            branch: branch.clone(),
            pass: pass.clone(),
            path_leg,
            ratios,
            angle_deg,
        }))
    }

    fn neighbour_on_path(&self, c: &ConnectorDescriptor) -> bool {
        c.connected
            .is_some_and(|n| self.topology.is_on_critical_path(n))
    }
}

fn junction_family(
    supply: bool,
    arrangement: Arrangement,
    branch: &ConnectorDescriptor,
    pass: &ConnectorDescriptor,
) -> JunctionFamily {
    match (supply, arrangement) {
        (true, Arrangement::Pass) => JunctionFamily::SupplyPass,
        (true, Arrangement::Branch) if branch.is_round() => JunctionFamily::SupplyBranchRound,
        (true, Arrangement::Branch) => JunctionFamily::SupplyBranchRect,
        (true, Arrangement::Split) => JunctionFamily::SupplySeparation,
        (false, Arrangement::Pass) if pass.is_round() => JunctionFamily::ExhaustPassRound,
        (false, Arrangement::Pass) => JunctionFamily::ExhaustPassRect,
        (false, Arrangement::Branch) if branch.is_round() => JunctionFamily::ExhaustBranchRound,
        (false, Arrangement::Branch) => JunctionFamily::ExhaustBranchRect,
        (false, Arrangement::Split) => JunctionFamily::ExhaustMerger,
    }
}

fn junction_ratios(
    element: ElementId,
    common: &ConnectorDescriptor,
    branch_flow: f64,
    branch: &ConnectorDescriptor,
    pass: &ConnectorDescriptor,
) -> FittingResult<FlowRatios> {
    let lc = common.flow_m3h;
    if lc <= 0.0 {
        return Err(FittingError::NonPhysical {
            element,
            what: "zero flow through the common leg",
        });
    }
    let fc = common.area_m2();
    let ratios = FlowRatios {
        lo: check_finite(branch_flow / lc, element, "Lo/Lc")?,
        lp: check_finite(pass.flow_m3h / lc, element, "Lp/Lc")?,
        fo: check_finite(branch.area_m2() / fc, element, "fo/fc")?,
        fp: check_finite(pass.area_m2() / fc, element, "fp/fc")?,
    };

    let imbalance = (ratios.lo + ratios.lp - 1.0).abs();
    if imbalance > MASS_BALANCE_TOLERANCE {
        warn!(
            element = %element,
            lo = ratios.lo,
            lp = ratios.lp,
            "junction flows do not add up to the common flow"
        );
    }
    Ok(ratios)
}

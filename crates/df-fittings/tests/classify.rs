//! Classification and coefficient tests against in-memory networks.

use std::f64::consts::PI;

use df_core::{deg, m, m3h, mm, CalcSettings, ElementId, Length, Point};
use df_fittings::{
    Classifier, CoefficientEngine, FittingClassification, FittingError, JunctionFamily, PathLeg,
    ResistanceModel,
};
use df_network::{
    ConnectorRaw, ConnectorShape, ElementCategory, FlowDirection, HostElement, MemoryHost,
    MemoryHostBuilder, NetworkError, SystemKind, TopologyIndex,
};

fn id(raw: u64) -> ElementId {
    ElementId::new(raw).unwrap()
}

/// Round diameter with the given cross-section area.
fn dia(area_m2: f64) -> Length {
    m((4.0 * area_m2 / PI).sqrt())
}

fn round(owner: ElementId, d: Length, flow: f64, dir: FlowDirection, at: Point) -> ConnectorRaw {
    ConnectorRaw::round(owner, d, m3h(flow), dir, at)
}

fn rect(
    owner: ElementId,
    w_mm: f64,
    h_mm: f64,
    flow: f64,
    dir: FlowDirection,
    at: Point,
) -> ConnectorRaw {
    ConnectorRaw::rectangular(owner, mm(w_mm), mm(h_mm), m3h(flow), dir, at)
}

fn duct(b: &mut MemoryHostBuilder, raw: u64) -> ElementId {
    b.add_element(HostElement::new(id(raw), "Duct", ElementCategory::Duct).with_length(m(1.0)))
}

fn fitting(b: &mut MemoryHostBuilder, raw: u64, at: Point) -> ElementId {
    b.add_element(HostElement::new(id(raw), "Fitting", ElementCategory::Fitting).at(at))
}

fn classify(host: &MemoryHost, element: ElementId) -> Result<FittingClassification, FittingError> {
    let topology = TopologyIndex::build(host, 500).unwrap();
    let settings = CalcSettings::default();
    Classifier::new(host, &topology, &settings).classify(element)
}

fn xi(host: &MemoryHost, element: ElementId) -> f64 {
    let fitting = classify(host, element).unwrap();
    CoefficientEngine::new().coefficient(&fitting).unwrap()
}

/// Round tee at the origin: common from -x, pass to +x, branch to +y.
///
/// `via_branch` puts the branch on the critical path, otherwise the pass.
fn tee(kind: SystemKind, via_branch: bool, flows: [f64; 3]) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("T", kind);
    let common = duct(&mut b, 1);
    let pass = duct(&mut b, 2);
    let branch = duct(&mut b, 3);
    let t = fitting(&mut b, 10, Point::origin());

    let (inward, outward) = if kind.is_supply() {
        (FlowDirection::In, FlowDirection::Out)
    } else {
        (FlowDirection::Out, FlowDirection::In)
    };
    b.add_connector(round(t, dia(0.02), flows[0], inward, Point::new(-0.1, 0.0, 0.0)));
    b.add_connector(round(t, dia(0.02), flows[1], outward, Point::new(0.1, 0.0, 0.0)));
    b.add_connector(round(t, dia(0.01), flows[2], outward, Point::new(0.0, 0.1, 0.0)));
    for (pos, el) in [common, pass, branch].into_iter().enumerate() {
        let far = Point::new(-1.0, pos as f64, 0.0);
        b.add_connector(round(el, dia(0.02), flows[pos], inward, far));
        b.add_connector(round(el, dia(0.02), flows[pos], outward, Point::new(-0.1, 0.0, 0.0)));
        b.connect(el, 1, t, pos);
    }

    b.add_section(1, m3h(flows[0]), [common, t]);
    b.add_section(2, m3h(flows[1]), [t, pass]);
    b.add_section(3, m3h(flows[2]), [t, branch]);
    let leaf = if via_branch { 3 } else { 2 };
    // Host order is terminal -> source for both kinds.
    b.set_critical_path([leaf, 1]);
    b.build().unwrap()
}

#[test]
fn supply_branch_round_reference_case() {
    let host = tee(SystemKind::Supply, true, [1000.0, 700.0, 300.0]);
    let fitting = classify(&host, id(10)).unwrap();

    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee, got {fitting:?}");
    };
    assert_eq!(j.family, JunctionFamily::SupplyBranchRound);
    assert_eq!(j.path_leg, PathLeg::Branch);
    assert!((j.ratios.lo - 0.3).abs() < 1e-9);
    assert!((j.ratios.lp - 0.7).abs() < 1e-9);
    assert!((j.ratios.fo - 0.5).abs() < 1e-9);
    assert!((j.ratios.fp - 1.0).abs() < 1e-9);
    assert!((j.angle_deg - 90.0).abs() < 1e-9);
    assert_eq!(j.name, "Тройник нагнетание ответвление круглый ø113 90°");

    let xi = CoefficientEngine::new().coefficient(&fitting).unwrap();
    assert!((xi - 3.777_777_8).abs() < 1e-6);
    assert!((fitting.reference_connector().area_m2() - 0.01).abs() < 1e-9);
}

#[test]
fn supply_pass_when_path_runs_straight() {
    let host = tee(SystemKind::Supply, false, [1000.0, 700.0, 300.0]);
    let fitting = classify(&host, id(10)).unwrap();
    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee");
    };
    assert_eq!(j.family, JunctionFamily::SupplyPass);
    assert_eq!(j.path_leg, PathLeg::Pass);

    let expected = 0.4 * 0.3 * 0.3 / (0.7 * 0.7);
    assert!((xi(&host, id(10)) - expected).abs() < 1e-9);
}

/// Supply Y-tee at the origin with no straight run: common at +x, path leg
/// at +y, the other leg on the diagonal between them.
///
/// `other_on_path` lists the other leg's duct in the path leg's section.
fn y_tee(other_on_path: bool) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("Y", SystemKind::Supply);
    let common = duct(&mut b, 1);
    let leg = duct(&mut b, 2);
    let other = duct(&mut b, 3);
    let t = fitting(&mut b, 10, Point::origin());

    let points = [
        Point::new(0.1, 0.0, 0.0),
        Point::new(0.0, 0.1, 0.0),
        Point::new(0.07, 0.07, 0.0),
    ];
    let flows = [1000.0, 700.0, 300.0];
    let areas = [0.02, 0.02, 0.01];
    for (pos, el) in [common, leg, other].into_iter().enumerate() {
        let dir = if pos == 0 {
            FlowDirection::In
        } else {
            FlowDirection::Out
        };
        let far = Point::new(5.0, pos as f64, 0.0);
        b.add_connector(round(t, dia(areas[pos]), flows[pos], dir, points[pos]));
        b.add_connector(round(el, dia(areas[pos]), flows[pos], dir, far));
        b.add_connector(round(el, dia(areas[pos]), flows[pos], dir, points[pos]));
        b.connect(el, 1, t, pos);
    }

    b.add_section(1, m3h(1000.0), [common, t]);
    if other_on_path {
        b.add_section(2, m3h(700.0), [t, leg, other]);
    } else {
        b.add_section(2, m3h(700.0), [t, leg]);
        b.add_section(3, m3h(300.0), [t, other]);
    }
    b.set_critical_path([2, 1]);
    b.build().unwrap()
}

#[test]
fn y_tee_with_other_leg_off_path_is_a_pass() {
    let host = y_tee(false);
    let fitting = classify(&host, id(10)).unwrap();
    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee, got {fitting:?}");
    };
    assert_eq!(j.family, JunctionFamily::SupplyPass);
    assert_eq!(j.path_leg, PathLeg::Pass);
    assert!((j.branch.flow_m3h - 300.0).abs() < 1e-6);
    assert!((j.ratios.lo - 0.3).abs() < 1e-9);
    assert!((j.ratios.lp - 0.7).abs() < 1e-9);
}

#[test]
fn y_tee_with_other_leg_on_path_is_a_branch() {
    let host = y_tee(true);
    let fitting = classify(&host, id(10)).unwrap();
    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee, got {fitting:?}");
    };
    assert_eq!(j.family, JunctionFamily::SupplyBranchRound);
    assert_eq!(j.path_leg, PathLeg::Branch);
    assert!((j.branch.flow_m3h - 700.0).abs() < 1e-6);
}

#[test]
fn exhaust_branch_round() {
    let host = tee(SystemKind::Exhaust, true, [1000.0, 700.0, 300.0]);
    let fitting = classify(&host, id(10)).unwrap();
    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee");
    };
    assert_eq!(j.family, JunctionFamily::ExhaustBranchRound);

    // A = 0.9·(1 − 0.3), ζc = A·(1 + 0.36 − 2·0.49)
    let expected = 0.63 * 0.38 / 0.36;
    assert!((xi(&host, id(10)) - expected).abs() < 1e-9);
}

#[test]
fn unbalanced_junction_is_not_rejected() {
    let host = tee(SystemKind::Supply, true, [1000.0, 700.0, 400.0]);
    let fitting = classify(&host, id(10)).unwrap();
    let FittingClassification::Tee(j) = &fitting else {
        panic!("expected a tee");
    };
    assert!((j.ratios.lo + j.ratios.lp - 1.1).abs() < 1e-9);
}

#[test]
fn zero_common_flow_is_non_physical() {
    let host = tee(SystemKind::Supply, true, [0.0, 0.0, 0.0]);
    let err = classify(&host, id(10)).unwrap_err();
    assert!(matches!(err, FittingError::NonPhysical { .. }));
}

#[test]
fn cross_in_pass_mode_sums_side_legs() {
    let mut b = MemoryHostBuilder::new("X", SystemKind::Supply);
    let up = duct(&mut b, 1);
    let down = duct(&mut b, 2);
    let left = duct(&mut b, 3);
    let right = duct(&mut b, 4);
    let x = fitting(&mut b, 10, Point::origin());

    let points = [
        Point::new(-0.1, 0.0, 0.0),
        Point::new(0.1, 0.0, 0.0),
        Point::new(0.0, 0.1, 0.0),
        Point::new(0.0, -0.1, 0.0),
    ];
    let flows = [1000.0, 400.0, 350.0, 250.0];
    for (pos, el) in [up, down, left, right].into_iter().enumerate() {
        let dir = if pos == 0 {
            FlowDirection::In
        } else {
            FlowDirection::Out
        };
        b.add_connector(round(x, mm(250.0), flows[pos], dir, points[pos]));
        b.add_connector(round(el, mm(250.0), flows[pos], dir, Point::new(5.0, pos as f64, 0.0)));
        b.add_connector(round(el, mm(250.0), flows[pos], dir, points[pos]));
        b.connect(el, 1, x, pos);
    }
    b.add_section(1, m3h(1000.0), [up, x]);
    b.add_section(2, m3h(400.0), [x, down]);
    b.add_section(3, m3h(350.0), [x, left]);
    b.add_section(4, m3h(250.0), [x, right]);
    b.set_critical_path([2, 1]);
    let host = b.build().unwrap();

    let fitting = classify(&host, x).unwrap();
    let FittingClassification::Cross(j) = &fitting else {
        panic!("expected a cross, got {fitting:?}");
    };
    assert_eq!(j.family, JunctionFamily::SupplyPass);
    assert!((j.ratios.lo - 0.6).abs() < 1e-9);
    assert!((j.ratios.lp - 0.4).abs() < 1e-9);
    assert!((j.branch.flow_m3h - 350.0).abs() < 1e-6);
    assert!(j.name.starts_with("Крестовина"));
}

/// Two-port fitting between two ducts on a supply critical path.
fn two_port(at: Point, first: ConnectorRaw, second: ConnectorRaw) -> MemoryHost {
    let element = HostElement::new(id(10), "Fitting", ElementCategory::Fitting).at(at);
    two_port_element(element, first, second)
}

fn two_port_element(element: HostElement, first: ConnectorRaw, second: ConnectorRaw) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("F", SystemKind::Supply);
    let a = duct(&mut b, 1);
    let c = duct(&mut b, 2);
    let f = b.add_element(element);
    b.add_connector(first);
    b.add_connector(second);
    b.add_connector(round(a, mm(200.0), 500.0, FlowDirection::In, Point::new(-5.0, 0.0, 0.0)));
    b.add_connector(round(a, mm(200.0), 500.0, FlowDirection::Out, Point::origin()));
    b.add_connector(round(c, mm(200.0), 500.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(c, mm(200.0), 500.0, FlowDirection::Out, Point::new(5.0, 0.0, 0.0)));
    b.connect(a, 1, f, 0);
    b.connect(f, 1, c, 0);
    b.add_section(1, m3h(500.0), [a, f]);
    b.add_section(2, m3h(500.0), [f, c]);
    b.set_critical_path([2, 1]);
    b.build().unwrap()
}

#[test]
fn round_right_angle_elbow() {
    let f = id(10);
    let host = two_port(
        Point::new(0.1, 0.0, 0.0),
        round(f, mm(200.0), 500.0, FlowDirection::In, Point::origin()),
        round(f, mm(200.0), 500.0, FlowDirection::Out, Point::new(0.1, 0.1, 0.0)),
    );
    let fitting = classify(&host, f).unwrap();
    let FittingClassification::Elbow(e) = &fitting else {
        panic!("expected an elbow, got {fitting:?}");
    };
    assert!((e.angle_deg - 90.0).abs() < 1e-9);
    assert!((e.bend_radius_m - 0.15).abs() < 1e-12);
    assert_eq!(e.name, "Отвод круглый ø200 90°");
    assert_eq!(xi(&host, f), 0.33);
}

#[test]
fn angle_attribute_wins_over_geometry() {
    let f = id(10);
    let host = two_port(
        Point::new(0.1, 0.0, 0.0),
        round(f, mm(200.0), 500.0, FlowDirection::In, Point::origin())
            .with_angle(deg(45.0)),
        round(f, mm(200.0), 500.0, FlowDirection::Out, Point::new(0.1, 0.1, 0.0)),
    );
    assert_eq!(xi(&host, f), 0.18);
}

#[test]
fn rectangular_elbow_uses_width_height_and_radius() {
    let f = id(10);
    let host = two_port(
        Point::new(0.1, 0.0, 0.0),
        rect(f, 400.0, 200.0, 500.0, FlowDirection::In, Point::origin()),
        rect(f, 400.0, 200.0, 500.0, FlowDirection::Out, Point::new(0.1, 0.1, 0.0)),
    );
    assert!((xi(&host, f) - 0.4385).abs() < 1e-3);
}

#[test]
fn round_confuser_from_table() {
    let f = id(10);
    let host = two_port(
        Point::new(0.05, 0.0, 0.0),
        round(f, mm(250.0), 500.0, FlowDirection::In, Point::origin()),
        round(f, mm(200.0), 500.0, FlowDirection::Out, Point::new(0.1, 0.0, 0.0)),
    );
    let fitting = classify(&host, f).unwrap();
    let FittingClassification::Transition(t) = &fitting else {
        panic!("expected a transition, got {fitting:?}");
    };
    assert!(t.is_confuser());
    assert!((t.length_m - 0.1).abs() < 1e-9);
    // 2·atan(0.025/0.1) ≈ 28°, l/D = 0.4
    assert!((t.angle_deg - 28.072).abs() < 1e-2);
    assert_eq!(t.name, "Переход конфузор ø250-ø200 30°");
    assert_eq!(xi(&host, f), 0.10);
    // The report refers the coefficient to the smaller section.
    assert!((fitting.reference_connector().equivalent_diameter_m() - 0.2).abs() < 1e-9);
}

#[test]
fn rectangular_diffuser_from_table() {
    let f = id(10);
    let host = two_port(
        Point::new(0.15, 0.0, 0.0),
        rect(f, 200.0, 200.0, 500.0, FlowDirection::In, Point::origin()),
        rect(f, 400.0, 200.0, 500.0, FlowDirection::Out, Point::new(0.3, 0.0, 0.0)),
    );
    // Fin/Fout = 0.5, D 0.2 → 0.2667, angle 2·atan(0.0667/0.6) ≈ 12.7°
    assert_eq!(xi(&host, f), 0.13);
}

#[test]
fn oval_connector_fails_the_fitting() {
    let f = id(10);
    let host = two_port(
        Point::new(0.1, 0.0, 0.0),
        round(f, mm(200.0), 500.0, FlowDirection::In, Point::origin()),
        rect(f, 300.0, 150.0, 500.0, FlowDirection::Out, Point::new(0.1, 0.1, 0.0))
            .with_shape(ConnectorShape::Oval),
    );
    let err = classify(&host, f).unwrap_err();
    assert!(matches!(
        err,
        FittingError::Network(NetworkError::UnsupportedGeometry { element, .. }) if element == f
    ));
}

#[test]
fn single_connector_matches_no_type() {
    let mut b = MemoryHostBuilder::new("U", SystemKind::Supply);
    let a = duct(&mut b, 1);
    let f = fitting(&mut b, 10, Point::origin());
    b.add_connector(round(f, mm(200.0), 100.0, FlowDirection::In, Point::origin()));
    b.add_section(1, m3h(100.0), [a, f]);
    b.set_critical_path([1]);
    let host = b.build().unwrap();

    let err = classify(&host, f).unwrap_err();
    assert!(matches!(err, FittingError::UnknownFittingType { element, .. } if element == f));
}

#[test]
fn unresolvable_direction_is_reported() {
    let mut b = MemoryHostBuilder::new("U", SystemKind::Supply);
    let a = duct(&mut b, 1);
    let f = fitting(&mut b, 10, Point::new(0.1, 0.0, 0.0));
    b.add_connector(round(f, mm(200.0), 100.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(f, mm(200.0), 100.0, FlowDirection::In, Point::new(0.1, 0.1, 0.0)));
    b.add_section(1, m3h(100.0), [a]);
    b.set_critical_path([1]);
    let host = b.build().unwrap();

    assert_eq!(
        classify(&host, f).unwrap_err(),
        FittingError::UnresolvedFlowDirection { element: f }
    );
}

/// Round main duct along x with a tap at x = 2; the tap's branch leaves
/// towards `branch_end`.
fn tapped_duct(branch_end: Point, dead_end: bool) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("TAP", SystemKind::Supply);
    let main = duct(&mut b, 1);
    let branch = duct(&mut b, 30);
    let tap = fitting(&mut b, 20, Point::new(2.0, 0.05, 0.0));

    b.add_connector(round(main, mm(315.0), 1000.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(main, mm(315.0), 800.0, FlowDirection::Out, Point::new(4.0, 0.0, 0.0)));
    b.add_connector(round(main, mm(160.0), 200.0, FlowDirection::Out, Point::new(2.0, 0.0, 0.0)));
    b.add_connector(round(tap, mm(160.0), 200.0, FlowDirection::In, Point::new(2.0, 0.0, 0.0)));
    b.add_connector(round(tap, mm(160.0), 200.0, FlowDirection::Out, branch_end));
    b.add_connector(round(branch, mm(160.0), 200.0, FlowDirection::In, branch_end));
    b.add_connector(round(branch, mm(160.0), 200.0, FlowDirection::Out, Point::new(2.0, 3.0, 0.0)));
    b.connect(main, 2, tap, 0);
    b.connect(tap, 1, branch, 0);

    b.add_section(1, m3h(1000.0), [main, tap]);
    b.add_section(2, m3h(200.0), [tap, branch]);
    if dead_end {
        b.add_section(3, m3h(0.0), [main]);
    }
    b.set_critical_path([2, 1]);
    b.build().unwrap()
}

#[test]
fn right_angle_tap_on_output_side() {
    let host = tapped_duct(Point::new(2.0, 0.1, 0.0), false);
    let fitting = classify(&host, id(20)).unwrap();
    let FittingClassification::Tap(t) = &fitting else {
        panic!("expected a tap, got {fitting:?}");
    };
    assert!(t.on_output_side);
    assert!(!t.dead_end);
    assert_eq!(t.name, "Врезка нагнетание ø160 90°");

    let ratio = (160.0_f64 / 315.0).powi(2);
    let expected = 1.7 * ratio * ratio;
    assert!((xi(&host, id(20)) - expected).abs() < 1e-9);
}

#[test]
fn dead_end_tap_is_a_right_elbow() {
    let host = tapped_duct(Point::new(2.0, 0.1, 0.0), true);
    let fitting = classify(&host, id(20)).unwrap();
    assert!(matches!(&fitting, FittingClassification::Tap(t) if t.dead_end));
    assert_eq!(xi(&host, id(20)), 0.33);
}

#[test]
fn angled_tap_becomes_an_elbow() {
    let host = tapped_duct(Point::new(2.1, 0.1, 0.0), false);
    let fitting = classify(&host, id(20)).unwrap();
    let FittingClassification::Elbow(e) = &fitting else {
        panic!("expected an elbow, got {fitting:?}");
    };
    assert!((e.angle_deg - 45.0).abs() < 1e-9);
    assert_eq!(xi(&host, id(20)), 0.18);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_elbow_ignores_size_and_bend_radius(
            d in 80.0_f64..1250.0,
            radius in 0.0_f64..2.0,
            right in any::<bool>(),
        ) {
            let f = id(10);
            // Deflection of 90° or 45° around the insertion point.
            let out = if right {
                Point::new(0.1, 0.1, 0.0)
            } else {
                Point::new(0.2, 0.1, 0.0)
            };
            let element = HostElement::new(f, "Отвод", ElementCategory::Fitting)
                .at(Point::new(0.1, 0.0, 0.0))
                .with_bend_radius(m(radius));
            let host = two_port_element(
                element,
                round(f, mm(d), 500.0, FlowDirection::In, Point::origin()),
                round(f, mm(d), 500.0, FlowDirection::Out, out),
            );

            let fitting = classify(&host, f).unwrap();
            prop_assert!(matches!(fitting, FittingClassification::Elbow(_)));
            let expected = if right { 0.33 } else { 0.18 };
            prop_assert_eq!(xi(&host, f), expected);
        }
    }
}

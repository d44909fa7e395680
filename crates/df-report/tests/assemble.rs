//! End-to-end report assembly over in-memory networks.

use std::f64::consts::PI;

use df_core::{m, m3h, mm, pa, CalcSettings, ElementId, Point};
use df_fittings::{Classifier, CoefficientEngine};
use df_network::{
    ConnectorRaw, ElementCategory, FlowDirection, HostElement, MemoryHost, MemoryHostBuilder,
    NetworkError, PartType, SystemKind, TopologyIndex,
};
use df_report::{assemble, render_table, PathReport, ReportError, ReportResult, RowKind};

fn id(raw: u64) -> ElementId {
    ElementId::new(raw).unwrap()
}

fn report(host: &MemoryHost) -> ReportResult<PathReport> {
    let settings = CalcSettings::default();
    let topology = TopologyIndex::build(host, settings.section_probe_limit)?;
    let classifier = Classifier::new(host, &topology, &settings);
    assemble(&topology, &classifier, &CoefficientEngine::new(), &settings)
}

fn round(owner: ElementId, d_mm: f64, flow: f64, dir: FlowDirection, at: Point) -> ConnectorRaw {
    ConnectorRaw::round(owner, mm(d_mm), m3h(flow), dir, at)
}

fn duct(raw: u64) -> HostElement {
    HostElement::new(id(raw), "Воздуховод", ElementCategory::Duct)
}

fn velocity(flow_m3h: f64, d_m: f64) -> f64 {
    flow_m3h / (3600.0 * PI * d_m * d_m / 4.0)
}

#[test]
fn straight_duct_gives_one_row_with_host_drop() {
    let mut b = MemoryHostBuilder::new("П1", SystemKind::Supply);
    let d = b.add_element(duct(1).with_length(m(4.0)));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::Out, Point::new(4.0, 0.0, 0.0)));
    b.add_section(1, m3h(500.0), [d]);
    b.set_pressure_drop(1, d, pa(3.2));
    b.set_critical_path([1]);
    let host = b.build().unwrap();

    let report = report(&host).unwrap();
    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.kind, RowKind::Duct);
    assert_eq!(row.coefficient, None);
    assert_eq!(row.flow_m3h, 500);
    assert_eq!(row.size, "ø200");
    assert!((row.length_m.unwrap() - 4.0).abs() < 1e-9);
    assert!((row.pressure_drop_pa - 3.2).abs() < 1e-9);
    assert!((row.velocity_mps - velocity(500.0, 0.2)).abs() < 1e-9);
    assert!(report.coefficients.is_empty());

    let text = render_table(&report);
    assert!(text.lines().nth(2).unwrap().contains("| - "));
}

#[test]
fn system_without_critical_path_has_no_report() {
    let mut b = MemoryHostBuilder::new("П2", SystemKind::Supply);
    let d = b.add_element(duct(1));
    b.add_section(1, m3h(500.0), [d]);
    let host = b.build().unwrap();

    assert_eq!(
        report(&host).unwrap_err(),
        ReportError::Network(NetworkError::EmptyCriticalPath {
            system: "П2".to_string()
        })
    );
}

/// Terminal(5) <- Duct(3) <- Elbow(2) <- Duct(1), supply, 600 m³/h.
fn elbow_run(elbow: HostElement, terminal: HostElement) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("П3", SystemKind::Supply);
    let d1 = b.add_element(duct(1).with_length(m(3.0)));
    let el = b.add_element(elbow);
    let d3 = b.add_element(duct(3).with_length(m(2.0)));
    let t = b.add_element(terminal);

    b.add_connector(round(d1, 200.0, 600.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(d1, 200.0, 600.0, FlowDirection::Out, Point::new(2.9, 0.0, 0.0)));
    b.add_connector(round(el, 200.0, 600.0, FlowDirection::In, Point::new(2.9, 0.0, 0.0)));
    b.add_connector(round(el, 200.0, 600.0, FlowDirection::Out, Point::new(3.0, 0.1, 0.0)));
    b.add_connector(round(d3, 200.0, 600.0, FlowDirection::In, Point::new(3.0, 0.1, 0.0)));
    b.add_connector(round(d3, 200.0, 600.0, FlowDirection::Out, Point::new(3.0, 2.1, 0.0)));
    b.add_connector(round(t, 200.0, 600.0, FlowDirection::In, Point::new(3.0, 2.1, 0.0)));
    b.connect(d1, 1, el, 0);
    b.connect(el, 1, d3, 0);
    b.connect(d3, 1, t, 0);

    b.add_section(1, m3h(600.0), [el, d1]);
    b.add_section(2, m3h(600.0), [t, el, d3]);
    b.set_pressure_drop(1, d1, pa(4.0));
    b.set_pressure_drop(2, d3, pa(2.5));
    b.set_pressure_drop(2, t, pa(10.0));
    b.set_critical_path([2, 1]);
    b.build().unwrap()
}

fn elbow() -> HostElement {
    HostElement::new(id(2), "Отвод", ElementCategory::Fitting)
        .with_part_type(PartType::Elbow)
        .at(Point::new(3.0, 0.0, 0.0))
}

fn terminal() -> HostElement {
    HostElement::new(id(5), "Диффузор", ElementCategory::Terminal)
}

#[test]
fn rows_follow_flow_with_running_total() {
    let host = elbow_run(elbow(), terminal());
    let report = report(&host).unwrap();

    let kinds: Vec<RowKind> = report.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RowKind::Duct, RowKind::Fitting, RowKind::Terminal, RowKind::Duct]
    );

    let elbow_row = &report.rows[1];
    assert_eq!(elbow_row.coefficient, Some(0.33));
    assert_eq!(elbow_row.name, "Отвод круглый ø200 90°");
    let v = velocity(600.0, 0.2);
    let elbow_drop = 0.33 * 1.2 * v * v / 2.0;
    assert!((elbow_row.pressure_drop_pa - elbow_drop).abs() < 1e-9);

    // Terminal without a coefficient uses the host's drop.
    assert_eq!(report.rows[2].coefficient, None);
    assert!((report.rows[2].pressure_drop_pa - 10.0).abs() < 1e-9);

    let total = 4.0 + elbow_drop + 10.0 + 2.5;
    assert!((report.total_pressure_drop_pa - total).abs() < 1e-9);
    assert!((report.rows.last().unwrap().cumulative_pa - total).abs() < 1e-9);
    assert!(report.rows.iter().all(|r| r.section == 1));
    assert_eq!(report.coefficients.get(&id(2)), Some(&0.33));
}

#[test]
fn assembling_twice_is_identical() {
    let host = elbow_run(elbow(), terminal());
    let first = report(&host).unwrap();
    let second = report(&host).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn terminal_coefficient_from_host() {
    let host = elbow_run(elbow(), terminal().with_local_coefficient(1.5));
    let report = report(&host).unwrap();
    let row = report.rows.iter().find(|r| r.kind == RowKind::Terminal).unwrap();
    let v = velocity(600.0, 0.2);
    assert_eq!(row.coefficient, Some(1.5));
    assert!((row.pressure_drop_pa - 1.5 * 1.2 * v * v / 2.0).abs() < 1e-9);
}

#[test]
fn unavailable_fitting_is_reported_but_not_written() {
    let host = elbow_run(elbow().unavailable(), terminal());
    let report = report(&host).unwrap();
    assert!(report.coefficients.is_empty());
    assert_eq!(report.unavailable, vec![id(2)]);
    assert!(report.rows.iter().any(|r| r.kind == RowKind::Fitting));
}

#[test]
fn caps_and_unions_are_left_out() {
    let union = elbow().with_part_type(PartType::Union);
    let host = elbow_run(union, terminal());
    let report = report(&host).unwrap();
    assert!(report.rows.iter().all(|r| r.kind != RowKind::Fitting));
    // The two ducts now meet in one group with equal size and flow, but the
    // terminal sits between them in report order.
    assert_eq!(report.rows.len(), 3);
}

#[test]
fn duct_without_host_drop_fails() {
    let mut b = MemoryHostBuilder::new("П4", SystemKind::Supply);
    let d = b.add_element(duct(1));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::Out, Point::new(1.0, 0.0, 0.0)));
    b.add_section(1, m3h(500.0), [d]);
    b.set_critical_path([1]);
    let host = b.build().unwrap();

    let err = report(&host).unwrap_err();
    assert_eq!(err.element(), Some(d));
    assert!(matches!(err, ReportError::Network(NetworkError::MissingSectionData { .. })));
}

/// Supply duct(1) feeding terminal(2); the terminal has no coefficient and
/// no host pressure drop.
fn terminal_without_drop(with_connector: bool) -> MemoryHost {
    let mut b = MemoryHostBuilder::new("П7", SystemKind::Supply);
    let d = b.add_element(duct(1));
    let t = b.add_element(HostElement::new(id(2), "Решетка", ElementCategory::Terminal));
    b.add_connector(round(d, 200.0, 400.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(d, 200.0, 400.0, FlowDirection::Out, Point::new(1.0, 0.0, 0.0)));
    if with_connector {
        b.add_connector(round(t, 200.0, 400.0, FlowDirection::In, Point::new(1.0, 0.0, 0.0)));
        b.connect(d, 1, t, 0);
    }
    b.add_section(1, m3h(400.0), [t, d]);
    b.set_pressure_drop(1, d, pa(3.0));
    b.set_critical_path([1]);
    b.build().unwrap()
}

#[test]
fn terminal_without_host_drop_fails() {
    let err = report(&terminal_without_drop(true)).unwrap_err();
    assert_eq!(err.element(), Some(id(2)));
    assert!(matches!(err, ReportError::Network(NetworkError::MissingSectionData { .. })));
}

#[test]
fn terminal_without_connectors_fails() {
    let err = report(&terminal_without_drop(false)).unwrap_err();
    assert_eq!(err.element(), Some(id(2)));
    assert!(matches!(err, ReportError::Network(NetworkError::MissingSectionData { .. })));
}

#[test]
fn zero_flow_duct_is_left_out() {
    let mut b = MemoryHostBuilder::new("П5", SystemKind::Supply);
    let d = b.add_element(duct(1));
    let idle = b.add_element(duct(2));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::In, Point::origin()));
    b.add_connector(round(d, 200.0, 500.0, FlowDirection::Out, Point::new(1.0, 0.0, 0.0)));
    b.add_section(1, m3h(500.0), [d]);
    b.add_section(2, m3h(0.0), [idle]);
    b.set_pressure_drop(1, d, pa(1.0));
    b.set_critical_path([2, 1]);
    let host = b.build().unwrap();

    let report = report(&host).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].element_ids, vec![d]);
}

#[test]
fn branch_tee_in_report() {
    let d = |area: f64| (4.0 * area / PI).sqrt() * 1000.0;
    let mut b = MemoryHostBuilder::new("П6", SystemKind::Supply);
    let main = b.add_element(duct(1));
    let pass = b.add_element(duct(2));
    let branch = b.add_element(duct(3));
    let tee = b.add_element(
        HostElement::new(id(10), "Тройник", ElementCategory::Fitting)
            .with_part_type(PartType::Tee),
    );

    let (inlet, straight, side) = (
        Point::new(-0.1, 0.0, 0.0),
        Point::new(0.1, 0.0, 0.0),
        Point::new(0.0, 0.1, 0.0),
    );
    b.add_connector(round(tee, d(0.02), 1000.0, FlowDirection::In, inlet));
    b.add_connector(round(tee, d(0.02), 700.0, FlowDirection::Out, straight));
    b.add_connector(round(tee, d(0.01), 300.0, FlowDirection::Out, side));
    let flows = [1000.0, 700.0, 300.0];
    let sizes = [0.02, 0.02, 0.01];
    for (pos, el) in [main, pass, branch].into_iter().enumerate() {
        let y = pos as f64;
        let (size, flow) = (d(sizes[pos]), flows[pos]);
        b.add_connector(round(el, size, flow, FlowDirection::In, Point::new(-3.0, y, 0.0)));
        b.add_connector(round(el, size, flow, FlowDirection::Out, Point::new(-0.1, y, 0.0)));
        b.connect(el, 1, tee, pos);
    }
    b.add_section(1, m3h(1000.0), [main, tee]);
    b.add_section(2, m3h(700.0), [tee, pass]);
    b.add_section(3, m3h(300.0), [tee, branch]);
    b.set_pressure_drop(1, main, pa(5.0));
    b.set_pressure_drop(3, branch, pa(3.0));
    b.set_critical_path([3, 1]);
    let host = b.build().unwrap();

    let report = report(&host).unwrap();
    assert_eq!(report.rows.len(), 3);
    let tee_row = &report.rows[1];
    assert_eq!(tee_row.coefficient, Some(3.78));
    assert_eq!(tee_row.flow_m3h, 300);
    assert_eq!(report.rows[0].section, 1);
    assert_eq!(report.rows[1].section, 2);
    assert_eq!(report.rows[2].section, 2);
}

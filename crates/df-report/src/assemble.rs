//! Critical path walk producing report rows.

use std::collections::{BTreeMap, HashSet};

use df_core::numeric::round_to;
use df_core::units::{host as host_units, velocity_mps};
use df_core::{CalcSettings, ElementId, SectionNumber};
use df_fittings::{duct_flow_ends, Classifier, ResistanceModel};
use df_network::{
    describe_connectors, DuctHost, ElementCategory, HostElement,
    NetworkError, TopologyIndex,
};
use tracing::{debug, info, warn};

use crate::group::group_rows;
use crate::types::{ElementReportRow, PathReport, RowKind};
use crate::ReportResult;

/// Decimal places of the reported coefficient.
const COEFFICIENT_DECIMALS: u32 = 2;

/// Assemble the path report of one system.
///
/// Sections are walked in flow order; inside a section, members are ordered
/// terminal, flex duct, duct, fitting, then the rest. Each element appears
/// once, at its first section. Caps, unions and zero-flow straight ducts are
/// left out.
pub fn assemble(
    topology: &TopologyIndex,
    classifier: &Classifier<'_>,
    engine: &dyn ResistanceModel,
    settings: &CalcSettings,
) -> ReportResult<PathReport> {
    let host = classifier.host();
    let mut builder = RowBuilder {
        host,
        topology,
        classifier,
        engine,
        density: settings.air_density_kg_m3,
        coefficients: BTreeMap::new(),
        unavailable: Vec::new(),
    };

    let mut seen: HashSet<ElementId> = HashSet::new();
    let mut rows = Vec::new();

    for (position, section) in topology.critical_sections().enumerate() {
        let mut members: Vec<HostElement> = section
            .elements
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|&id| {
                host.element(id)
                    .ok_or(NetworkError::UnknownElement { element: id })
            })
            .collect::<Result<_, _>>()?;
        members.sort_by_key(|e| e.category.report_priority());

        for element in &members {
            let ordinal = position as u32 + 1;
            if let Some(row) = builder.row(section.number, ordinal, element)? {
                rows.push(row);
            }
        }
    }

    let mut cumulative = 0.0;
    for row in &mut rows {
        cumulative += row.pressure_drop_pa;
        row.cumulative_pa = cumulative;
    }

    let rows = group_rows(rows, settings.flow_group_tolerance_m3h);
    if !builder.unavailable.is_empty() {
        warn!(
            count = builder.unavailable.len(),
            "elements are held by other users and will not be written"
        );
    }
    info!(
        system = topology.system_name(),
        rows = rows.len(),
        total_pa = cumulative,
        "path report assembled"
    );

    Ok(PathReport {
        system: topology.system_name().to_string(),
        rows,
        coefficients: builder.coefficients,
        unavailable: builder.unavailable,
        total_pressure_drop_pa: cumulative,
    })
}

struct RowBuilder<'r, 'a> {
    host: &'a dyn DuctHost,
    topology: &'r TopologyIndex,
    classifier: &'r Classifier<'a>,
    engine: &'r dyn ResistanceModel,
    density: f64,
    coefficients: BTreeMap<ElementId, f64>,
    unavailable: Vec<ElementId>,
}

impl RowBuilder<'_, '_> {
    fn row(
        &mut self,
        number: SectionNumber,
        ordinal: u32,
        element: &HostElement,
    ) -> ReportResult<Option<ElementReportRow>> {
        match element.category {
            ElementCategory::Duct | ElementCategory::FlexDuct => {
                self.duct_row(number, ordinal, element)
            }
            ElementCategory::Fitting => self.fitting_row(ordinal, element),
            _ => self.other_row(number, ordinal, element).map(Some),
        }
    }

    /// Dynamic pressure `ρ·v²/2`, Pa.
    fn dynamic_pressure(&self, velocity: f64) -> f64 {
        self.density * velocity * velocity / 2.0
    }

    fn host_drop(&self, number: SectionNumber, element: ElementId) -> Option<f64> {
        self.host
            .section_pressure_drop(number, element)
            .map(|p| host_units::pressure(p).value)
    }

    fn duct_row(
        &mut self,
        number: SectionNumber,
        ordinal: u32,
        element: &HostElement,
    ) -> ReportResult<Option<ElementReportRow>> {
        let flow = self.topology.max_flow_for(element.id)?;
        if flow <= 0.0 {
            debug!(element = %element.id, "zero-flow duct left out");
            return Ok(None);
        }
        let connectors = describe_connectors(self.host, element.id)?;
        let ends = duct_flow_ends(element.id, self.topology.system_kind(), &connectors)?;
        let inlet = &connectors[ends.input];
        let drop = self
            .host_drop(number, element.id)
            .ok_or(NetworkError::MissingSectionData {
                element: element.id,
            })?;

        Ok(Some(ElementReportRow {
            section: ordinal,
            name: element.name.clone(),
            length_m: element.length_m(),
            size: inlet.size_label(),
            area_m2: inlet.area_m2(),
            flow_m3h: flow.round() as i64,
            velocity_mps: velocity_mps(flow, inlet.area_m2()),
            coefficient: None,
            pressure_drop_pa: drop,
            cumulative_pa: 0.0,
            element_ids: vec![element.id],
            kind: row_kind(element.category),
        }))
    }

    fn fitting_row(
        &mut self,
        ordinal: u32,
        element: &HostElement,
    ) -> ReportResult<Option<ElementReportRow>> {
        if element.part_type.is_passive() {
            debug!(element = %element.id, "cap or union left out");
            return Ok(None);
        }
        let fitting = self.classifier.classify(element.id)?;
        let xi = self.engine.coefficient(&fitting)?;
        let reference = fitting.reference_connector();
        let velocity = velocity_mps(reference.flow_m3h, reference.area_m2());
        let coefficient = round_to(xi, COEFFICIENT_DECIMALS);

        if element.unavailable {
            debug!(element = %element.id, "element unavailable, coefficient not written");
            self.unavailable.push(element.id);
        } else {
            self.coefficients.insert(element.id, coefficient);
        }

        Ok(Some(ElementReportRow {
            section: ordinal,
            name: fitting.name().to_string(),
            length_m: None,
            size: reference.size_label(),
            area_m2: reference.area_m2(),
            flow_m3h: reference.flow_m3h.round() as i64,
            velocity_mps: velocity,
            coefficient: Some(coefficient),
            pressure_drop_pa: xi * self.dynamic_pressure(velocity),
            cumulative_pa: 0.0,
            element_ids: vec![element.id],
            kind: RowKind::Fitting,
        }))
    }

    /// Terminals, accessories and equipment: host-provided coefficient when
    /// there is one, otherwise the host's own pressure drop. Either one
    /// missing, or no connector to size the row by, stops the report.
    fn other_row(
        &mut self,
        number: SectionNumber,
        ordinal: u32,
        element: &HostElement,
    ) -> ReportResult<ElementReportRow> {
        let missing = NetworkError::MissingSectionData {
            element: element.id,
        };
        let connectors = describe_connectors(self.host, element.id)?;
        let inlet = connectors
            .iter()
            .max_by(|a, b| a.area_m2().total_cmp(&b.area_m2()))
            .ok_or_else(|| missing.clone())?;
        let flow = self
            .topology
            .max_flow_for(element.id)
            .unwrap_or(inlet.flow_m3h);
        let area = inlet.area_m2();
        let velocity = velocity_mps(flow, area);

        let drop = match element.local_coefficient {
            Some(xi) => xi * self.dynamic_pressure(velocity),
            None => self.host_drop(number, element.id).ok_or(missing)?,
        };

        Ok(ElementReportRow {
            section: ordinal,
            name: element.name.clone(),
            length_m: None,
            size: inlet.size_label(),
            area_m2: area,
            flow_m3h: flow.round() as i64,
            velocity_mps: velocity,
            coefficient: element
                .local_coefficient
                .map(|xi| round_to(xi, COEFFICIENT_DECIMALS)),
            pressure_drop_pa: drop,
            cumulative_pa: 0.0,
            element_ids: vec![element.id],
            kind: row_kind(element.category),
        })
    }
}

fn row_kind(category: ElementCategory) -> RowKind {
    match category {
        ElementCategory::Terminal => RowKind::Terminal,
        ElementCategory::FlexDuct => RowKind::FlexDuct,
        ElementCategory::Duct => RowKind::Duct,
        ElementCategory::Fitting => RowKind::Fitting,
        ElementCategory::Accessory => RowKind::Accessory,
        ElementCategory::Equipment => RowKind::Equipment,
        ElementCategory::Other => RowKind::Other,
    }
}


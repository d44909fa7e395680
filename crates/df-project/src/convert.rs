//! Conversion of a system definition into an in-memory host.
//!
//! The file is metric; the host keeps its own internal units, so every value
//! goes through the same conversion a live host adapter would apply.

use df_core::{deg, m3h, mm, pa, ElementId, Point};
use df_network::{
    ConnectorRaw, ConnectorShape, ElementCategory, FlowDirection, HostElement, MemoryHost,
    MemoryHostBuilder, PartType, SystemKind,
};

use crate::schema::{
    CategoryDef, ConnectorDef, DirectionDef, ElementDef, PartTypeDef, ShapeDef, SystemDef,
    SystemKindDef,
};
use crate::validate::ValidationError;
use crate::ProjectResult;

impl From<SystemKindDef> for SystemKind {
    fn from(kind: SystemKindDef) -> Self {
        match kind {
            SystemKindDef::Supply => SystemKind::Supply,
            SystemKindDef::Return => SystemKind::Return,
            SystemKindDef::Exhaust => SystemKind::Exhaust,
        }
    }
}

impl From<CategoryDef> for ElementCategory {
    fn from(category: CategoryDef) -> Self {
        match category {
            CategoryDef::Terminal => ElementCategory::Terminal,
            CategoryDef::FlexDuct => ElementCategory::FlexDuct,
            CategoryDef::Duct => ElementCategory::Duct,
            CategoryDef::Fitting => ElementCategory::Fitting,
            CategoryDef::Accessory => ElementCategory::Accessory,
            CategoryDef::Equipment => ElementCategory::Equipment,
            CategoryDef::Other => ElementCategory::Other,
        }
    }
}

impl From<PartTypeDef> for PartType {
    fn from(part: PartTypeDef) -> Self {
        match part {
            PartTypeDef::Undefined => PartType::Undefined,
            PartTypeDef::Elbow => PartType::Elbow,
            PartTypeDef::Transition => PartType::Transition,
            PartTypeDef::Tee => PartType::Tee,
            PartTypeDef::Cross => PartType::Cross,
            PartTypeDef::Tap => PartType::Tap,
            PartTypeDef::Union => PartType::Union,
            PartTypeDef::Cap => PartType::Cap,
            PartTypeDef::Other => PartType::Other,
        }
    }
}

impl From<DirectionDef> for FlowDirection {
    fn from(direction: DirectionDef) -> Self {
        match direction {
            DirectionDef::In => FlowDirection::In,
            DirectionDef::Out => FlowDirection::Out,
            DirectionDef::Bidirectional => FlowDirection::Bidirectional,
        }
    }
}

fn point_mm(p: [f64; 3]) -> Point {
    Point::new(p[0], p[1], p[2]) / 1000.0
}

fn element_id(raw: u64, context: &str) -> Result<ElementId, ValidationError> {
    ElementId::new(raw).ok_or_else(|| ValidationError::InvalidValue {
        field: context.to_string(),
        value: raw.to_string(),
        reason: "element ids start at 1".to_string(),
    })
}

fn host_element(def: &ElementDef) -> Result<HostElement, ValidationError> {
    let id = element_id(def.id, "element id")?;
    let mut element = HostElement::new(id, def.name.clone(), def.category.into())
        .with_part_type(def.part_type.into())
        .at(point_mm(def.location_mm));
    if let Some(length) = def.length_mm {
        element = element.with_length(mm(length));
    }
    if let Some(radius) = def.bend_radius_mm {
        element = element.with_bend_radius(mm(radius));
    }
    if let Some(xi) = def.local_coefficient {
        element = element.with_local_coefficient(xi);
    }
    if def.unavailable {
        element = element.unavailable();
    }
    Ok(element)
}

fn host_connector(owner: ElementId, def: &ConnectorDef) -> Result<ConnectorRaw, ValidationError> {
    let dimension = |value: Option<f64>, name: &str| {
        value.ok_or_else(|| ValidationError::InvalidValue {
            field: format!("element {owner} connector {name}"),
            value: "missing".to_string(),
            reason: "required for this shape".to_string(),
        })
    };
    let flow = m3h(def.flow_m3h);
    let direction = def.direction.into();
    let origin = point_mm(def.origin_mm);

    let mut raw = match def.shape {
        ShapeDef::Round => ConnectorRaw::round(
            owner,
            mm(dimension(def.diameter_mm, "diameter_mm")?),
            flow,
            direction,
            origin,
        ),
        ShapeDef::Rectangular | ShapeDef::Oval => {
            let raw = ConnectorRaw::rectangular(
                owner,
                mm(dimension(def.width_mm, "width_mm")?),
                mm(dimension(def.height_mm, "height_mm")?),
                flow,
                direction,
                origin,
            );
            if def.shape == ShapeDef::Oval {
                raw.with_shape(ConnectorShape::Oval)
            } else {
                raw
            }
        }
    };
    raw = raw.with_angle(deg(def.angle_deg));
    if let Some(target) = def.connected_to {
        raw = raw.connected_to(element_id(target, "connected_to")?);
    }
    Ok(raw)
}

/// Build the in-memory host of one system.
pub fn to_host(system: &SystemDef) -> ProjectResult<MemoryHost> {
    let mut builder = MemoryHostBuilder::new(system.name.clone(), system.kind.into());

    for def in &system.elements {
        let element = host_element(def)?;
        let owner = builder.add_element(element);
        for connector in &def.connectors {
            builder.add_connector(host_connector(owner, connector)?);
        }
    }

    for section in &system.sections {
        let members = section
            .elements
            .iter()
            .map(|&raw| element_id(raw, "section element"))
            .collect::<Result<Vec<_>, _>>()?;
        builder.add_section(section.number, m3h(section.flow_m3h), members);
        for (&raw, &drop) in &section.pressure_drops_pa {
            builder.set_pressure_drop(section.number, element_id(raw, "pressure drop")?, pa(drop));
        }
    }
    builder.set_critical_path(system.critical_path.iter().copied());

    Ok(builder.build()?)
}

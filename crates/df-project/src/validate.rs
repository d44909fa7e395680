//! Project validation logic.

use std::collections::{HashMap, HashSet};

use crate::schema::{ConnectorDef, ElementDef, Project, SectionDef, ShapeDef, SystemDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    project
        .settings
        .validate()
        .map_err(|e| ValidationError::InvalidValue {
            field: "settings".to_string(),
            value: String::new(),
            reason: e.to_string(),
        })?;

    let mut system_ids = HashSet::new();
    for system in &project.systems {
        if !system_ids.insert(&system.id) {
            return Err(ValidationError::DuplicateId {
                id: system.id.clone(),
                context: "systems".to_string(),
            });
        }
        validate_system(system)?;
    }

    Ok(())
}

fn validate_system(system: &SystemDef) -> Result<(), ValidationError> {
    let context = |what: &str| format!("system {} {}", system.id, what);

    let mut elements: HashMap<u64, &ElementDef> = HashMap::new();
    for element in &system.elements {
        if element.id == 0 {
            return Err(ValidationError::InvalidValue {
                field: context("element id"),
                value: "0".to_string(),
                reason: "element ids start at 1".to_string(),
            });
        }
        if elements.insert(element.id, element).is_some() {
            return Err(ValidationError::DuplicateId {
                id: element.id.to_string(),
                context: context("elements"),
            });
        }
        for value in [element.length_mm, element.bend_radius_mm].into_iter().flatten() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: context(&format!("element {} dimension", element.id)),
                    value: value.to_string(),
                    reason: "must be a non-negative number".to_string(),
                });
            }
        }
    }

    for element in &system.elements {
        for connector in &element.connectors {
            validate_connector(system, element, connector)?;
            if let Some(target) = connector.connected_to {
                if !elements.contains_key(&target) {
                    return Err(ValidationError::MissingReference {
                        id: target.to_string(),
                        context: context(&format!("element {} connector", element.id)),
                    });
                }
            }
        }
    }

    let mut numbers = HashSet::new();
    for section in &system.sections {
        if !numbers.insert(section.number) {
            return Err(ValidationError::DuplicateId {
                id: section.number.to_string(),
                context: context("sections"),
            });
        }
        validate_section(system, section, &elements)?;
    }

    for number in &system.critical_path {
        if !numbers.contains(number) {
            return Err(ValidationError::MissingReference {
                id: number.to_string(),
                context: context("critical_path"),
            });
        }
    }

    Ok(())
}

fn validate_connector(
    system: &SystemDef,
    element: &ElementDef,
    connector: &ConnectorDef,
) -> Result<(), ValidationError> {
    let field = |name: &str| {
        format!("system {} element {} connector {}", system.id, element.id, name)
    };
    let dimensions = match connector.shape {
        ShapeDef::Round => vec![("diameter_mm", connector.diameter_mm)],
        ShapeDef::Rectangular | ShapeDef::Oval => vec![
            ("width_mm", connector.width_mm),
            ("height_mm", connector.height_mm),
        ],
    };

    for (name, value) in dimensions {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => {}
            Some(v) => {
                return Err(ValidationError::InvalidValue {
                    field: field(name),
                    value: v.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            None => {
                return Err(ValidationError::InvalidValue {
                    field: field(name),
                    value: "missing".to_string(),
                    reason: "required for this shape".to_string(),
                });
            }
        }
    }

    if !(connector.flow_m3h.is_finite() && connector.flow_m3h >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field("flow_m3h"),
            value: connector.flow_m3h.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

fn validate_section(
    system: &SystemDef,
    section: &SectionDef,
    elements: &HashMap<u64, &ElementDef>,
) -> Result<(), ValidationError> {
    let context = format!("system {} section {}", system.id, section.number);

    if !(section.flow_m3h.is_finite() && section.flow_m3h >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} flow_m3h"),
            value: section.flow_m3h.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    for id in &section.elements {
        if !elements.contains_key(id) {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: context.clone(),
            });
        }
    }
    for id in section.pressure_drops_pa.keys() {
        if !section.elements.contains(id) {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: format!("{context} pressure_drops_pa"),
            });
        }
    }
    Ok(())
}

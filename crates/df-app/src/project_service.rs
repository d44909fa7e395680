//! Project loading, validation, and introspection.

use std::path::Path;

use df_project::schema::{Project, SystemDef, SystemKindDef};

use crate::error::{AppError, AppResult};

/// Summary of a system for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSummary {
    pub id: String,
    pub name: String,
    pub kind: SystemKindDef,
    pub element_count: usize,
    pub section_count: usize,
    pub critical_sections: usize,
}

/// Load a project file (YAML, or JSON by extension). Validation included.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(df_project::load(path)?)
}

/// Validate project structure.
pub fn validate_project(project: &Project) -> AppResult<()> {
    df_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))?;

    if project.systems.is_empty() {
        return Err(AppError::Validation(
            "Project must have at least one system".to_string(),
        ));
    }
    for system in &project.systems {
        if system.critical_path.is_empty() {
            return Err(AppError::Validation(format!(
                "System '{}' has no critical path",
                system.id
            )));
        }
    }
    Ok(())
}

/// List systems in a project.
pub fn list_systems(project: &Project) -> Vec<SystemSummary> {
    project
        .systems
        .iter()
        .map(|s| SystemSummary {
            id: s.id.clone(),
            name: s.name.clone(),
            kind: s.kind,
            element_count: s.elements.len(),
            section_count: s.sections.len(),
            critical_sections: s.critical_path.len(),
        })
        .collect()
}

/// Get a system by id, falling back to its display name.
pub fn get_system<'a>(project: &'a Project, system_id: &str) -> AppResult<&'a SystemDef> {
    project
        .system(system_id)
        .or_else(|| project.systems.iter().find(|s| s.name == system_id))
        .ok_or_else(|| AppError::SystemNotFound(system_id.to_string()))
}

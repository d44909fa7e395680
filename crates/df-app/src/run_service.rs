//! Calculation service: one report run for one system.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use df_core::{CalcSettings, ElementId};
use df_fittings::{Classifier, CoefficientEngine};
use df_network::TopologyIndex;
use df_project::schema::Project;
use df_report::{assemble, PathReport, ReportError};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Settings the caller overrides on top of the project's own.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverride {
    pub air_density_kg_m3: Option<f64>,
}

impl SettingsOverride {
    pub fn apply(&self, mut settings: CalcSettings) -> AppResult<CalcSettings> {
        if let Some(density) = self.air_density_kg_m3 {
            settings.air_density_kg_m3 = density;
        }
        settings
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        Ok(settings)
    }
}

/// Request to calculate one system of a project file.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub system_id: &'a str,
    pub overrides: SettingsOverride,
}

/// Outcome of one calculation.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub system_id: String,
    pub report: PathReport,
    /// Non-fatal notices, reported once at the end of the run.
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub elapsed_s: f64,
}

impl RunResponse {
    /// Coefficients to write back into the host.
    pub fn coefficients(&self) -> &BTreeMap<ElementId, f64> {
        &self.report.coefficients
    }
}

/// Load a project and calculate one of its systems.
pub fn run_from_file(request: &RunRequest<'_>) -> AppResult<RunResponse> {
    let project = project_service::load_project(request.project_path)?;
    let settings = request.overrides.apply(project.settings)?;
    run_system(&project, request.system_id, &settings)
}

/// Calculate one system of a loaded project.
pub fn run_system(
    project: &Project,
    system_id: &str,
    settings: &CalcSettings,
) -> AppResult<RunResponse> {
    let start = Instant::now();
    let system = project_service::get_system(project, system_id)?;
    info!(system = %system.id, "calculating critical path");

    let host = df_project::to_host(system)?;
    let calculation_error = |e: ReportError| AppError::Calculation {
        system: system.name.clone(),
        element: e.element(),
        message: e.to_string(),
    };

    let topology = TopologyIndex::build(&host, settings.section_probe_limit)
        .map_err(|e| calculation_error(e.into()))?;
    let classifier = Classifier::new(&host, &topology, settings);
    let engine = CoefficientEngine::new();
    let report =
        assemble(&topology, &classifier, &engine, settings).map_err(calculation_error)?;

    let warnings: Vec<String> = report
        .unavailable
        .iter()
        .map(|id| format!("Element {id} is held by another user; its coefficient was not written"))
        .collect();
    for w in &warnings {
        warn!("{w}");
    }

    let elapsed_s = start.elapsed().as_secs_f64();
    info!(
        system = %system.id,
        rows = report.rows.len(),
        total_pa = report.total_pressure_drop_pa,
        elapsed_s,
        "calculation finished"
    );

    Ok(RunResponse {
        system_id: system.id.clone(),
        report,
        warnings,
        elapsed_s,
    })
}

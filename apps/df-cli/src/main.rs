use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use df_app::{
    project_service, run_from_file, write_coefficients, AppResult, JsonFileSink, RunRequest,
    RunResponse, SettingsOverride,
};
use df_report::render_table;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ductflow")]
#[command(
    about = "ductflow CLI - critical path pressure loss report for duct systems",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List systems in a project
    Systems {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Calculate the critical path report of a system
    Report {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// System ID (or name) to calculate
        system_id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Write the coefficients to this parameter file
        #[arg(long)]
        write_back: Option<PathBuf>,
        /// Air density override, kg/m³
        #[arg(long)]
        density: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Systems { project_path } => cmd_systems(&project_path),
        Commands::Report {
            project_path,
            system_id,
            format,
            write_back,
            density,
        } => cmd_report(
            &project_path,
            &system_id,
            format,
            write_back.as_deref(),
            density,
        ),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_systems(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let systems = project_service::list_systems(&project);

    if systems.is_empty() {
        println!("No systems found in project");
    } else {
        println!("Systems in project:");
        for sys in systems {
            println!(
                "  {} - {} ({:?}, {} elements, {} sections, {} on critical path)",
                sys.id,
                sys.name,
                sys.kind,
                sys.element_count,
                sys.section_count,
                sys.critical_sections
            );
        }
    }
    Ok(())
}

/// JSON document printed by `report --format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    system: &'a str,
    rows: &'a [df_report::ElementReportRow],
    coefficients: &'a std::collections::BTreeMap<df_core::ElementId, f64>,
    warnings: &'a [String],
    total_pressure_drop_pa: f64,
}

fn cmd_report(
    project_path: &Path,
    system_id: &str,
    format: Format,
    write_back: Option<&Path>,
    density: Option<f64>,
) -> AppResult<()> {
    let request = RunRequest {
        project_path,
        system_id,
        overrides: SettingsOverride {
            air_density_kg_m3: density,
        },
    };
    let response = run_from_file(&request)?;

    match format {
        Format::Table => print!("{}", render_table(&response.report)),
        Format::Json => print_json(&response)?,
    }

    if let Some(path) = write_back {
        let mut sink = JsonFileSink::new(path);
        let written = write_coefficients(&mut sink, response.coefficients())?;
        eprintln!("✓ {} coefficients written to {}", written, path.display());
    }

    // Batched once per run.
    for warning in &response.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn print_json(response: &RunResponse) -> AppResult<()> {
    let report = &response.report;
    let doc = JsonReport {
        system: &report.system,
        rows: &report.rows,
        coefficients: &report.coefficients,
        warnings: &response.warnings,
        total_pressure_drop_pa: report.total_pressure_drop_pa,
    };
    let text = serde_json::to_string_pretty(&doc)
        .map_err(|e| df_app::AppError::InvalidInput(e.to_string()))?;
    println!("{text}");
    Ok(())
}

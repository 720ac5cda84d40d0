use crate::cli::Command;
use crate::config::AppConfig;
use crate::plotting;
use anyhow::{Context, Result};
use growforge_core::{
    analysis::{self, BestSchool, EnvironmentOverall, EnvironmentSummary, GrowthSummary, OverviewRow},
    export,
    logger::DiagnosticsLogger,
    Dataset, DatasetCache, GrowforgeError,
};
use growforge_schemas::{
    file_formats::{ENVIRONMENT_EXPORT_NAME, GROWTH_EXPORT_NAME},
    growth::GrowthMetric,
    school::School,
};
use serde::Serialize;
use std::{fs, path::Path, path::PathBuf, sync::Arc};
use tracing::info;

/// Everything the summary view shows, in one serializable bundle.
#[derive(Debug, Serialize)]
struct SummaryBundle {
    overview: Option<Vec<OverviewRow>>,
    environment_overall: EnvironmentOverall,
    environment: Vec<EnvironmentSummary>,
    growth: Option<Vec<GrowthSummary>>,
    best_fresh_weight: Option<BestSchool>,
    warnings: Vec<String>,
    unmatched_sheets: Vec<String>,
    growth_error: Option<String>,
}

impl SummaryBundle {
    fn from_dataset(dataset: &Dataset, school: Option<School>) -> Self {
        let keep = |s: School| school.map_or(true, |only| only == s);
        let growth = analysis::growth_summary(dataset);
        let best_fresh_weight = analysis::best_growth_school(&growth, GrowthMetric::FreshWeight);
        let diagnostics = dataset.diagnostics();

        Self {
            overview: dataset.has_growth().then(|| analysis::experiment_overview(dataset)),
            environment_overall: analysis::environment_overall(dataset),
            environment: analysis::environment_summary(dataset)
                .into_iter()
                .filter(|s| keep(s.school))
                .collect(),
            growth: dataset
                .has_growth()
                .then(|| growth.into_iter().filter(|s| keep(s.school)).collect()),
            best_fresh_weight,
            warnings: diagnostics.warnings.iter().map(|w| w.to_string()).collect(),
            unmatched_sheets: diagnostics.unmatched_sheets.clone(),
            growth_error: diagnostics.growth_error.clone(),
        }
    }
}

/// Runs one command against the cached dataset.
pub fn run(command: &Command, config: &AppConfig, school: Option<School>) -> Result<()> {
    let cache = DatasetCache::new(config.loader());

    match command {
        Command::Summary { json } => {
            let dataset = load(&cache)?;
            let bundle = SummaryBundle::from_dataset(&dataset, school);
            if *json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_summary_report(&bundle);
            }
        }
        Command::Export => {
            export_artifacts(&cache, &config.output_dir)?;
        }
        Command::Plot => {
            plot(&cache, &config.output_dir)?;
        }
        Command::Report => {
            let run_dir = config
                .output_dir
                .join(format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));
            let dataset = load(&cache)?;
            print_summary_report(&SummaryBundle::from_dataset(&dataset, school));
            export_artifacts(&cache, &run_dir)?;
            plot(&cache, &run_dir)?;

            let diagnostics_path = run_dir.join("diagnostics.csv");
            DiagnosticsLogger::new(&diagnostics_path)?.log_diagnostics(dataset.diagnostics())?;
            println!("\nReport complete. Results are in '{}'", run_dir.display());
        }
    }

    Ok(())
}

fn load(cache: &DatasetCache) -> Result<Arc<Dataset>> {
    cache.get().map_err(|e| {
        match &e {
            GrowforgeError::DataDirNotFound(_) | GrowforgeError::WorkbookNotFound(_) => {
                eprintln!("❌ {}", e);
                eprintln!("Expected layout: data/송도고_환경데이터.csv, data/4개교_생육결과데이터.xlsx");
            }
            _ => eprintln!("❌ {}", e),
        }
        anyhow::Error::new(e).context("Failed to load experiment data")
    })
}

fn create_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

fn export_artifacts(cache: &DatasetCache, output_dir: &Path) -> Result<()> {
    let dataset = load(cache)?;
    let dir = create_dir(output_dir)?;

    let env_path = dir.join(ENVIRONMENT_EXPORT_NAME);
    export::write_environment_csv(&dataset, &env_path)?;
    println!("Environment data written to '{}'", env_path.display());

    if dataset.has_growth() {
        let growth_path = dir.join(GROWTH_EXPORT_NAME);
        export::write_growth_workbook(&dataset, &growth_path)?;
        println!("Growth data written to '{}'", growth_path.display());
    } else {
        println!("⚠️  Growth workbook unavailable, {} not written", GROWTH_EXPORT_NAME);
    }
    Ok(())
}

fn plot(cache: &DatasetCache, output_dir: &Path) -> Result<()> {
    let dataset = load(cache)?;
    let dir = create_dir(output_dir)?;
    let written = plotting::generate_all_plots(&dir, &dataset)?;
    info!("Rendered {} charts", written.len());
    Ok(())
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

fn print_summary_report(bundle: &SummaryBundle) {
    println!("\n--- [Plant Growth EC Experiment] ---");
    println!("========================================");

    for warning in &bundle.warnings {
        println!("⚠️  {}", warning);
    }
    if !bundle.unmatched_sheets.is_empty() {
        println!("Skipped workbook sheets: {}", bundle.unmatched_sheets.join(", "));
    }

    println!("\nExperiment Overview:");
    match &bundle.overview {
        Some(overview) => {
            println!("  {:<8} | {:>9} | {:>9}", "School", "Target EC", "Specimens");
            for row in overview {
                println!("  {:<8} | {:>9.1} | {:>9}", row.school, row.ec_target, row.specimens);
            }
        }
        None => println!("  (unavailable without growth data)"),
    }

    let overall = &bundle.environment_overall;
    println!("\nKey Indicators (all schools):");
    println!("  - Mean temperature: {} °C", fmt_value(overall.temperature, 1));
    println!("  - Mean humidity:    {} %", fmt_value(overall.humidity, 1));
    println!("  - Mean pH:          {}", fmt_value(overall.ph, 2));
    if let Some(best) = &bundle.best_fresh_weight {
        println!(
            "  - Optimal EC:       {:.1} ({}), highest mean fresh weight {:.2} g",
            best.school.ec_target(),
            best.school,
            best.value
        );
    }

    println!("\nEnvironment by School:");
    println!(
        "  {:<8} | {:>8} | {:>8} | {:>6} | {:>11} | {:>9} | {:>5}",
        "School", "Temp", "Humidity", "pH", "Measured EC", "Target EC", "Rows"
    );
    for s in &bundle.environment {
        println!(
            "  {:<8} | {:>8} | {:>8} | {:>6} | {:>11} | {:>9.1} | {:>5}",
            s.school,
            fmt_value(s.temperature, 1),
            fmt_value(s.humidity, 1),
            fmt_value(s.ph, 2),
            fmt_value(s.ec_measured, 2),
            s.ec_target,
            s.rows
        );
    }

    println!("\nGrowth by School:");
    match &bundle.growth {
        Some(growth) => {
            println!(
                "  {:<8} | {:>9} | {:>16} | {:>10} | {:>17} | {:>5}",
                "School", "Target EC", "Fresh weight (g)", "Leaf count", "Shoot length (mm)", "Count"
            );
            for s in growth {
                println!(
                    "  {:<8} | {:>9.1} | {:>16} | {:>10} | {:>17} | {:>5}",
                    s.school,
                    s.ec_target,
                    fmt_value(s.fresh_weight_g, 2),
                    fmt_value(s.leaf_count, 1),
                    fmt_value(s.shoot_length_mm, 1),
                    s.count
                );
            }
        }
        None => println!(
            "  Growth section disabled: {}",
            bundle.growth_error.as_deref().unwrap_or("workbook unavailable")
        ),
    }

    println!("========================================");
}

mod commands;
mod logging;
mod progress;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ScanArgs};
use dotenv::dotenv;
use heatscan_core::analysis::{self, daily, hourly, work_hours, EventKind};
use heatscan_core::report::ReportWriter;
use heatscan_core::{AppConfig, ScanEngine, ScanResult};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match heatscan_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let Some(command) = args.command else {
        Cli::command().print_long_help()?;
        return Ok(());
    };

    if let Some(scan_args) = command.scan_args() {
        apply_overrides(&mut config, scan_args);
    }

    match command {
        Commands::PrintConfig => {
            println!("Configuration: {:#?}", config);
        }
        command => {
            if let Err(err) = run_command(&command, config) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ScanArgs) {
    if !args.roots.is_empty() {
        config.root_paths = args.roots.clone();
    }
    if let Some(ext) = &args.ext {
        config.extension = ext.clone();
    }
    if args.start_year.is_some() {
        config.start_year = args.start_year;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
}

fn run_command(command: &Commands, config: AppConfig) -> anyhow::Result<()> {
    let output_dir = PathBuf::from(&config.output_dir);
    let start_year = config.start_year;
    let extension = config.extension.clone();

    let engine = ScanEngine::new(config);
    let reporter = CliReporter::new();
    let result = engine.scan(&reporter).context("scan failed")?;

    print_summary(&result, &extension);

    if result.aggregate.is_empty() {
        println!("No '{}' files found in the given directories.", extension);
        return Ok(());
    }

    let written = match command {
        Commands::Summary(_) => write_summary(&result, &output_dir)?,
        Commands::Heatmap(_) => write_heatmaps(&result, &output_dir, start_year)?,
        Commands::Activity(_) => write_activity(&result, &output_dir)?,
        Commands::Loc(_) => write_loc(&result, &output_dir)?,
        Commands::Hours(_) => write_hours(&result, &output_dir)?,
        Commands::PrintConfig => Vec::new(),
    };

    if written.is_empty() {
        println!("No activity to report.");
    } else {
        for path in &written {
            println!("  {}", path.display().to_string().cyan());
        }
    }

    Ok(())
}

fn print_summary(result: &ScanResult, extension: &str) {
    println!();
    info!(
        "Scan: {}, Merge: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.merge_duration.as_secs_f64()).green(),
    );
    info!(
        "{} unique '{}' files, {} lines of code, {} skipped",
        format!("{}", result.unique_files()).yellow(),
        extension,
        format!("{}", result.total_lines()).yellow(),
        format!(
            "{}",
            result.stats.skipped_time_error + result.stats.skipped_hash_error
        )
        .red(),
    );
}

fn report_writer(
    result: &ScanResult,
    output_dir: &Path,
    prefix: &str,
) -> anyhow::Result<ReportWriter> {
    let writer = ReportWriter::new(output_dir, prefix, result.aggregate.roots())?;
    info!("Reports will be written to {}", writer.dir().display());
    Ok(writer)
}

fn write_summary(result: &ScanResult, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let writer = report_writer(result, output_dir, "summary")?;
    Ok(writer.write_summary(&result.aggregate)?.into_iter().collect())
}

fn write_heatmaps(
    result: &ScanResult,
    output_dir: &Path,
    start_year: Option<i32>,
) -> anyhow::Result<Vec<PathBuf>> {
    let start_year = analysis::resolve_start_year(start_year, result.aggregate.records());
    if let Some(year) = start_year {
        info!("Heatmaps start at {}", year);
    }

    let writer = report_writer(result, output_dir, "heatmap")?;
    let mut written = Vec::new();
    for kind in [EventKind::Created, EventKind::Modified] {
        let counts = hourly::hourly_counts(result.aggregate.records(), kind, start_year);
        info!(
            "Busiest hour ({}): {} files",
            kind.label(),
            format!("{}", counts.max()).yellow()
        );
        written.extend(writer.write_hourly(&counts)?);
    }
    Ok(written)
}

fn write_activity(result: &ScanResult, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let writer = report_writer(result, output_dir, "activity_charts")?;
    let series = daily::daily_activity(result.aggregate.records());
    Ok(writer.write_daily_activity(&series)?)
}

fn write_loc(result: &ScanResult, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let writer = report_writer(result, output_dir, "loc_charts")?;
    let series = daily::daily_loc(result.aggregate.records());
    Ok(writer.write_daily_loc(&series)?)
}

fn write_hours(result: &ScanResult, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let writer = report_writer(result, output_dir, "project_time")?;
    let series = work_hours::estimated_hours(result.aggregate.records());
    if let (Some(first), Some(last)) = (series.keys().next(), series.keys().next_back()) {
        info!("Activity detected from {} to {}", first, last);
    }
    Ok(writer.write_estimated_hours(&series)?)
}

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "heatscan")]
#[command(about = "Source activity heatmaps from file timestamps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Root directories to scan, in order. Overrides `root_paths` from Config.toml
    pub roots: Vec<String>,

    /// File-name suffix to match, e.g. ".py"
    #[arg(long)]
    pub ext: Option<String>,

    /// First year included in hourly heatmaps (defaults to the earliest found)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Folder that receives the CSV reports
    #[arg(long)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan and print unique file and line totals, with a per-file CSV
    Summary(ScanArgs),
    /// Hourly activity per day for created and modified times
    Heatmap(ScanArgs),
    /// Files created and modified per day
    Activity(ScanArgs),
    /// Lines of code created and modified per day
    Loc(ScanArgs),
    /// Estimated hours worked per day, from 30-minute activity slots
    Hours(ScanArgs),
    /// Print configuration values
    PrintConfig,
}

impl Commands {
    pub fn scan_args(&self) -> Option<&ScanArgs> {
        match self {
            Commands::Summary(args)
            | Commands::Heatmap(args)
            | Commands::Activity(args)
            | Commands::Loc(args)
            | Commands::Hours(args) => Some(args),
            Commands::PrintConfig => None,
        }
    }
}

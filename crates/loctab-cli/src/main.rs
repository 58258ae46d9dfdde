//! Localization table converter CLI
//!
//! Splits workbooks into `key=value` table files, or merges table files back
//! into a single workbook.

use clap::{Parser, Subcommand};
use loctab_core::{
    merge_directory, split_workbooks, BackupOutcome, MergeReport, Settings, SplitReport,
};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "loctab")]
#[command(about = "Convert between workbooks and localization table files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Working directory holding workbooks and table files
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Settings file (created with defaults when missing)
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Workbook to split instead of every *.xlsx in the directory
    #[arg(long, global = true)]
    workbook: Option<String>,

    /// Workbook written by `merge`
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Table file extension
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Separator between key and value
    #[arg(long, global = true)]
    separator: Option<String>,

    /// Sheets to process per workbook (0 = all)
    #[arg(long, global = true)]
    sheets: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Split workbook columns into table files (default)
    Split,

    /// Merge table files into one workbook
    Merge,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> loctab_core::Result<()> {
    let settings = load_settings(&cli)?;
    debug!("Using settings: {:?}", settings);

    match cli.command {
        None | Some(Commands::Split) => cmd_split(&settings, &cli.dir),
        Some(Commands::Merge) => cmd_merge(&settings, &cli.dir),
    }
}

fn load_settings(cli: &Cli) -> loctab_core::Result<Settings> {
    let config_path = if cli.config.is_absolute() {
        cli.config.clone()
    } else {
        cli.dir.join(&cli.config)
    };
    let mut settings = Settings::load_or_create(&config_path)?;

    if let Some(workbook) = &cli.workbook {
        settings.workbook_file = workbook.clone();
    }
    if let Some(output) = &cli.output {
        settings.export_book_file = output.clone();
    }
    if let Some(extension) = &cli.extension {
        settings.out_file_extension = extension.clone();
    }
    if let Some(separator) = &cli.separator {
        settings.out_file_separator = separator.clone();
    }
    if let Some(sheets) = cli.sheets {
        settings.processed_sheet_count = sheets;
    }

    Ok(settings)
}

fn cmd_split(settings: &Settings, dir: &Path) -> loctab_core::Result<()> {
    let report = split_workbooks(settings, dir)?;
    print_split_report(&report);
    Ok(())
}

fn print_split_report(report: &SplitReport) {
    println!("Excel files found: \t{}", report.workbooks_found);
    println!("Excel sheets processed: \t{}", report.sheets_processed);
    for path in &report.files_written {
        println!("  {}", path.display());
    }
}

fn cmd_merge(settings: &Settings, dir: &Path) -> loctab_core::Result<()> {
    let report = merge_directory(settings, dir)?;
    print_merge_report(&report);
    Ok(())
}

fn print_merge_report(report: &MergeReport) {
    println!("Table files found: \t{}", report.files_found);

    if !report.failures.is_empty() {
        println!("\nSkipped files ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.path.display(), failure.message);
        }
    }

    let Some(write) = &report.write else {
        println!("Nothing to merge.");
        return;
    };

    println!("Table files processed: \t{}", report.files_processed);
    if !report.missing.is_empty() {
        println!("Missing keys: \t{}", report.missing.len());
    }

    match &write.backup {
        BackupOutcome::Created(old) => println!("Backup: {}", old.display()),
        BackupOutcome::Failed(message) => println!("Error create backup file: {}", message),
        BackupOutcome::NotNeeded => {}
    }

    match &write.written {
        Ok(path) => println!("Written: {}", path.display()),
        Err(e) => println!("Error write to excel file: {}", e),
    }
}

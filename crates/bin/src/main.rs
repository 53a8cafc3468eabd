//! poprank CLI binary.
//!
//! Ranks the fastest-growing cities of a workbook table and writes the
//! result, with a chart, to a new worksheet.

mod integration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::config_locator::load_config;
use integration::workbook_io::{open_workbook, output_path};
use poprank::output::render_worksheet;
use poprank::rank::LatestPolicy;
use poprank::sheet::{MemoryHost, Session, SheetError, Workbook};
use poprank::{PipelineConfig, PipelineError, export_ranking, run_pipeline_with_progress};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poprank")]
#[command(about = "Rank cities by population growth inside a workbook", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the table and write the output sheet
    Run {
        /// Workbook JSON document or CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Where to save the workbook (defaults to the input workbook)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Source table name
        #[arg(long)]
        table: Option<String>,

        /// Number of cities to keep
        #[arg(long)]
        top: Option<usize>,

        /// Output worksheet name
        #[arg(long)]
        output_sheet: Option<String>,

        /// Drop rows whose latest figure is not a number
        #[arg(long)]
        skip_non_numeric_latest: bool,

        /// Also write the ranking to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Suppress progress and the ranking table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a worksheet as text
    Show {
        /// Workbook JSON document
        #[arg(short, long)]
        workbook: PathBuf,

        /// Worksheet name (defaults to the active sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// List worksheets, tables and charts
    Sheets {
        /// Workbook JSON document
        #[arg(short, long)]
        workbook: PathBuf,
    },
}

/// Options of the `run` subcommand.
struct RunArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    export: Option<PathBuf>,
    quiet: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            table,
            top,
            output_sheet,
            skip_non_numeric_latest,
            export,
            quiet,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(table) = table {
                config.source.table = table;
            }
            if let Some(top) = top {
                config.rank.top_n = top;
            }
            if let Some(sheet) = output_sheet {
                config.layout.sheet_name = sheet;
            }
            if skip_non_numeric_latest {
                config.rank.latest_policy = LatestPolicy::Skip;
            }
            let args = RunArgs {
                input,
                output,
                export,
                quiet,
            };
            run_ranking(&args, &config)?;
        }
        Commands::Show { workbook, sheet } => {
            show_worksheet(&workbook, sheet.as_deref())?;
        }
        Commands::Sheets { workbook } => {
            list_sheets(&workbook)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner(quiet: bool) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn run_ranking(args: &RunArgs, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let save_to = output_path(&args.input, args.output.clone())?;

    let pb = spinner(args.quiet)?;
    pb.set_message(format!("Opening {}", args.input.display()));
    let book = open_workbook(&args.input, &config.source.table)?;

    let mut session = Session::new(MemoryHost::new(book));
    let report = match run_pipeline_with_progress(&mut session, config, |stage| {
        pb.set_message(stage.label());
    }) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            log_failure(&e);
            return Err(e.into());
        }
    };

    pb.set_message(format!("Saving {}", save_to.display()));
    let book = session.into_host().into_workbook();
    book.save(&save_to)?;

    if let Some(path) = &args.export {
        export_ranking(&report, path)?;
    }
    pb.finish_and_clear();

    if !args.quiet {
        println!("{}", report.to_ascii_table());
        println!("Saved workbook to {}", save_to.display());
    }
    Ok(())
}

fn log_failure(err: &PipelineError) {
    match err.debug_info() {
        Some(debug_info) => {
            let detail = serde_json::to_string(debug_info).unwrap_or_default();
            error!(error = %err, debug_info = %detail, "document request failed");
        }
        None => error!(error = %err, "pipeline failed"),
    }
}

fn show_worksheet(path: &Path, sheet: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let book = Workbook::load(path)?;
    let ws = match sheet {
        Some(name) => book
            .worksheet(name)
            .ok_or_else(|| SheetError::WorksheetNotFound(name.to_string()))?,
        None => book
            .active_worksheet()
            .or_else(|| book.worksheets.first())
            .ok_or_else(|| format!("{} has no worksheets", path.display()))?,
    };
    print!("{}", render_worksheet(ws));
    Ok(())
}

fn list_sheets(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let book = Workbook::load(path)?;
    for ws in &book.worksheets {
        let marker = if book.active.as_deref() == Some(ws.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, ws.name);
        for table in &ws.tables {
            println!("    table {} {}", table.name, table.range);
        }
        for chart in &ws.charts {
            println!("    chart {} {}", chart.name, chart.source);
        }
    }
    Ok(())
}

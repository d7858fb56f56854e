//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides an interactive explorer that mirrors a guided console session,
//! a one-shot report for scripting, and a listing of supported cities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::calendar::{MONTH_NAMES, MONTHS, WEEKDAY_NAMES, WEEKDAYS};
use bikeshare_stats::output::{append_summary, render_json, render_page, render_text};
use bikeshare_stats::pipeline::{FilterPipeline, Session};
use bikeshare_stats::source::{City, CsvDirectory};
use bikeshare_stats::store::FilterSpec;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Confirm, Select};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick a city and filters, view statistics and raw rows
    Explore,
    /// Print statistics for one city and filter
    Report {
        /// chicago, new york city or washington
        #[arg(short, long)]
        city: City,

        /// Month name, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Weekday name, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a one-row session summary to
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Number of 5-row pages of raw trips to print after the report
        #[arg(short, long, default_value_t = 0)]
        raw_pages: usize,
    },
    /// List supported cities and the file each is read from
    ListCities,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // warn by default so the report on stdout stays readable
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let pipeline = FilterPipeline::new(CsvDirectory::new(&cli.data_dir));

    match cli.command {
        Commands::Explore => explore(&pipeline)?,
        Commands::Report {
            city,
            month,
            day,
            format,
            export,
            raw_pages,
        } => {
            let spec = FilterSpec::parse(city, &month, &day)?;
            let store = pipeline
                .load(&spec)
                .with_context(|| format!("could not load trips for {}", city.label()))?;
            let session = Session::open(&store, spec);
            let report = session.report();

            match format {
                Format::Text => print!("{}", render_text(&report)),
                Format::Json => println!("{}", render_json(&report)?),
            }

            if let Some(path) = export {
                append_summary(&path, &report)
                    .with_context(|| format!("could not export to {}", path.display()))?;
                info!(path = %path.display(), "Session summary exported");
            }

            let mut pager = session.pager();
            for _ in 0..raw_pages {
                let first_index = pager.cursor();
                let page = pager.next_page();
                if page.is_empty() {
                    break;
                }
                print!("{}", render_page(page, first_index));
            }
        }
        Commands::ListCities => {
            for city in City::ALL {
                let path = pipeline.source().path_for(city);
                println!("{:<14} {}", city.label(), path.display());
            }
        }
    }

    Ok(())
}

/// Runs filter sessions until the user declines to restart. Each restart
/// drops the previous store, result and pager.
fn explore(pipeline: &FilterPipeline<CsvDirectory>) -> Result<()> {
    println!("Hello! Let's explore some US bikeshare data!");

    loop {
        let spec = prompt_filters()?;
        println!("{}", "-".repeat(40));

        match pipeline.load(&spec) {
            Ok(store) => {
                let session = Session::open(&store, spec);
                print!("{}", render_text(&session.report()));
                browse_raw(&session)?;
            }
            Err(e) => {
                error!(city = %spec.city, error = %e, "Failed to load trip data");
                eprintln!("Could not load data for {}: {e}", spec.city.label());
            }
        }

        let restart = Confirm::new()
            .with_prompt("Would you like to restart?")
            .default(false)
            .interact()?;
        if !restart {
            break;
        }
    }

    Ok(())
}

fn prompt_filters() -> Result<FilterSpec> {
    let city_labels: Vec<&str> = City::ALL.iter().map(|c| c.label()).collect();
    let city = Select::new()
        .with_prompt("Which city are you interested in?")
        .items(&city_labels)
        .default(0)
        .interact()?;

    let month_labels: Vec<&str> = std::iter::once("all").chain(MONTH_NAMES).collect();
    let month = Select::new()
        .with_prompt("Which month? (\"all\" for no month filter)")
        .items(&month_labels)
        .default(0)
        .interact()?;

    let day_labels: Vec<&str> = std::iter::once("all").chain(WEEKDAY_NAMES).collect();
    let day = Select::new()
        .with_prompt("Which day of the week? (\"all\" for no day filter)")
        .items(&day_labels)
        .default(0)
        .interact()?;

    Ok(FilterSpec::new(
        City::ALL[city],
        month.checked_sub(1).map(|i| MONTHS[i]),
        day.checked_sub(1).map(|i| WEEKDAYS[i]),
    ))
}

fn browse_raw(session: &Session<'_>) -> Result<()> {
    let mut pager = session.pager();

    while pager.has_more() {
        let wants_more = Confirm::new()
            .with_prompt("Would you like to see 5 lines of raw data?")
            .default(false)
            .interact()?;
        if !wants_more {
            break;
        }

        let first_index = pager.cursor();
        print!("{}", render_page(pager.next_page(), first_index));
    }

    if !pager.has_more() {
        println!("No more raw data to display.");
    }

    Ok(())
}

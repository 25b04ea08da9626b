//! Course planner (edu-planner) - command-line entry point
//!
//! Runs one pipeline stage per subcommand over JSON files:
//! - `parse`: course request → parsed requirement (or design prompt)
//! - `schedule`: course request → time schedule
//! - `validate`: generated course + original request → quality report

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edu_common::config::{ConfigResolver, PlannerConfig};
use edu_planner::{render, QualityValidator, RequirementParser, TimeScheduler};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for edu-planner
#[derive(Parser, Debug)]
#[command(name = "edu-planner")]
#[command(about = "Parse, schedule and validate PBL course requests")]
#[command(version)]
struct Args {
    /// Config file (overrides EDU_PLANNER_CONFIG and the user config file)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level for this crate when RUST_LOG is unset (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a course request
    Parse {
        /// Request JSON file
        request: PathBuf,
        /// Print the course-design prompt instead of JSON
        #[arg(long)]
        prompt: bool,
    },
    /// Parse a course request and build its time schedule
    Schedule {
        /// Request JSON file
        request: PathBuf,
        /// Print a readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Validate a generated course against its request
    Validate {
        /// Generated course JSON file
        course: PathBuf,
        /// Original request JSON file
        #[arg(short, long)]
        request: PathBuf,
        /// Print a readable summary instead of JSON
        #[arg(long)]
        summary: bool,
        /// Skip request parsing; rules that need it fall back to flat scores
        #[arg(long)]
        no_parsed: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("edu_planner={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting edu-planner {}", env!("CARGO_PKG_VERSION"));

    run(args.command, &config)
}

fn run(command: Command, config: &PlannerConfig) -> Result<()> {
    match command {
        Command::Parse { request, prompt } => {
            let raw = read_json(&request)?;
            let parsed = RequirementParser::new().parse(&raw);
            if prompt {
                print!("{}", render::requirement_prompt(&parsed));
                Ok(())
            } else {
                print_json(&parsed)
            }
        }
        Command::Schedule { request, summary } => {
            let raw = read_json(&request)?;
            let parsed = RequirementParser::new().parse(&raw);
            let schedule = TimeScheduler::with_config(&config.scheduler).schedule_for(&parsed);
            if summary {
                print!("{}", render::schedule_summary(&schedule));
                Ok(())
            } else {
                print_json(&schedule)
            }
        }
        Command::Validate {
            course,
            request,
            summary,
            no_parsed,
        } => {
            let course = read_json(&course)?;
            let original = read_json(&request)?;
            let parsed = (!no_parsed).then(|| RequirementParser::new().parse(&original));
            let report = QualityValidator::with_config(&config.validator).validate_course(
                &course,
                &original,
                parsed.as_ref(),
            );
            if summary {
                print!("{}", render::quality_report_summary(&report));
                Ok(())
            } else {
                print_json(&report)
            }
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

//! # Load Combination CLI
//!
//! Command-line front end for `combo_core`.
//!
//! ```text
//! combo_cli calc roof.json
//! combo_cli calc roof-inputs.txt --snapshot --format markdown --output roof.md
//! combo_cli template roof-inputs.txt --standard "ASCE 7-16" --method asd
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use combo_core::file_io::{load_input, load_snapshot, save_snapshot, InputSnapshot};
use combo_core::loads::{DesignMethod, Standard};
use combo_core::{calculate, render, CalcError, CombinationInput, ReportFormat, Scenario, ScenarioLoads};

#[derive(Parser, Debug)]
#[command(name = "combo_cli")]
#[command(version, about = "ASCE 7-16 / 7-22 load combination calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an input file and print the report
    Calc {
        /// Structured JSON input, or a snapshot with --snapshot
        file: PathBuf,

        /// Read FILE as a flat `<name>-inputs.txt` snapshot
        #[arg(long)]
        snapshot: bool,

        /// Report format: text, json or markdown
        #[arg(short, long, default_value = "text", value_parser = parse_format)]
        format: ReportFormat,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a sample snapshot to edit
    Template {
        /// Destination path
        path: PathBuf,

        /// ASCE 7 edition
        #[arg(long, default_value = "ASCE 7-22", value_parser = parse_standard)]
        standard: Standard,

        /// Design method
        #[arg(long, default_value = "LRFD", value_parser = parse_method)]
        method: DesignMethod,
    },
}

fn parse_standard(s: &str) -> Result<Standard, String> {
    Standard::from_code(s).ok_or_else(|| format!("unknown standard '{}'; use ASCE 7-16 or ASCE 7-22", s))
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    ReportFormat::from_code(s).ok_or_else(|| format!("unknown format '{}'; use text, json or markdown", s))
}

fn parse_method(s: &str) -> Result<DesignMethod, String> {
    DesignMethod::from_code(s).ok_or_else(|| format!("unknown design method '{}'; use LRFD or ASD", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Calc { file, snapshot, format, output } => {
            calc(&file, snapshot, format, output.as_deref())
        }
        Command::Template { path, standard, method } => template(&path, standard, method),
    }
}

fn calc(file: &Path, snapshot: bool, format: ReportFormat, output: Option<&Path>) -> Result<()> {
    let (input, coercions) = if snapshot {
        let snap = load_snapshot(file).with_context(|| format!("loading snapshot {}", file.display()))?;
        snap.to_input()
            .with_context(|| format!("reading fields of {}", file.display()))?
    } else {
        let input = load_input(file).with_context(|| format!("loading input {}", file.display()))?;
        (input, Vec::new())
    };
    debug!(scenarios = input.scenarios.len(), "input loaded");

    let mut report = calculate(&input).context("evaluating load combinations")?;
    report.warnings.extend(coercions);

    let rendered = render(&report, format).context("rendering report")?;
    match output {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("writing report {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn template(path: &Path, standard: Standard, method: DesignMethod) -> Result<()> {
    let mut input = CombinationInput::new(standard, method, 15.0);
    input.label = "Sample roof".to_string();
    input.roof_live = 20.0;
    for scenario in Scenario::ALL {
        input.scenarios.insert(scenario, ScenarioLoads::default());
    }
    input
        .scenarios
        .insert(Scenario::WindwardRoof, ScenarioLoads::new(30.0, 8.0, -22.0));

    save_snapshot(&InputSnapshot::from_input(&input), path)
        .with_context(|| format!("writing template {}", path.display()))?;
    println!("Template written to {}", path.display());
    Ok(())
}

fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {}", err);
    match err.downcast_ref::<CalcError>() {
        Some(calc @ CalcError::ValidationFailed { .. }) => {
            for message in calc.messages() {
                eprintln!("  - {}", message);
            }
        }
        Some(calc) => {
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            if let Ok(json) = serde_json::to_string_pretty(calc) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
        None => {
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
        }
    }
}

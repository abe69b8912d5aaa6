//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use destructive_advisor::advisor::{Assessment, CompiledRule};
use destructive_advisor::core::config::Config;
use destructive_advisor::logger::jsonl::{JournalRecord, JsonlJournal};
use destructive_advisor::report::{assessment_json, human};
use destructive_advisor::scanner::{ScanOptions, TreeScanner};

/// Environment variable selecting `human`, `json`, or `auto` output.
const OUTPUT_FORMAT_ENV: &str = "ADVISOR_OUTPUT_FORMAT";
/// Environment variable carrying `tracing` filter directives.
const LOG_ENV: &str = "ADVISOR_LOG";

/// Advisor: warns before destructive commands and reports what they would destroy.
#[derive(Debug, Parser)]
#[command(
    name = "advisor",
    author,
    version,
    about = "Advisor - warns before destructive commands; never runs them",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Number of file-type buckets shown in removal reports.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    top: Option<u64>,
    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<CompletionShell>,
    /// The command you are about to run, e.g. `rm -rf ./build` or `reboot`.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "completions"
    )]
    command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

/// Install the stderr diagnostics subscriber. `ADVISOR_LOG` overrides the flag-derived level.
pub fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(!cli.no_color && io::stderr().is_terminal())
        .init();
}

/// Classify the command, analyze it, and print the advisory.
///
/// Analysis failures are reported inside the advisory and do not fail the run.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let binary_name = command.get_name().to_string();
        generate(shell, &mut command, binary_name, &mut io::stdout());
        return Ok(());
    }

    let config =
        Config::load(cli.config.as_deref()).map_err(|e| CliError::Runtime(e.to_string()))?;
    let rules =
        CompiledRule::compile_all(&config.rules).map_err(|e| CliError::Runtime(e.to_string()))?;
    let top = cli
        .top
        .map_or(config.report.top_extensions, |n| {
            usize::try_from(n).unwrap_or(usize::MAX)
        });

    let scanner = TreeScanner::new(
        ScanOptions::from_config(&config.scanner).with_cancel(interrupt_flag()),
    );
    let assessment = Assessment::evaluate(&cli.command, &rules, &scanner).map_err(|e| {
        if e.is_usage() {
            CliError::User(e.to_string())
        } else {
            CliError::Runtime(e.to_string())
        }
    })?;

    match output_mode(cli) {
        OutputMode::Human => {
            let mut stdout = io::stdout().lock();
            let mut stderr = io::stderr().lock();
            human::write_assessment(&assessment, top, &mut stdout, &mut stderr)?;
        }
        OutputMode::Json => {
            write_json_line(&assessment_json(&assessment, top))?;
        }
    }

    if config.journal.enabled {
        record_journal(&config, &assessment);
    }
    Ok(())
}

fn record_journal(config: &Config, assessment: &Assessment) {
    let Some(path) = config.journal_path() else {
        warn!("journal enabled but no location could be resolved; set journal.path");
        return;
    };
    let journal = JsonlJournal::new(path);
    let record = JournalRecord::from_assessment(assessment, chrono::Utc::now());
    if let Err(e) = journal.append(&record) {
        warn!(path = %journal.path().display(), error = %e, "journal append failed");
    }
}

/// Flag raised by the first SIGINT/SIGTERM/SIGQUIT so an in-flight scan stops
/// at the next entry. A second signal terminates the process.
#[cfg(feature = "signals")]
fn interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in signal_hook::consts::TERM_SIGNALS {
        // Order matters: the shutdown hook must see the flag before it is raised.
        let installed = signal_hook::flag::register_conditional_shutdown(
            *signal,
            1,
            Arc::clone(&flag),
        )
        .and_then(|_| signal_hook::flag::register(*signal, Arc::clone(&flag)));
        if let Err(e) = installed {
            warn!(signal, error = %e, "could not install interrupt handler");
        }
    }
    flag
}

#[cfg(not(feature = "signals"))]
fn interrupt_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var(OUTPUT_FORMAT_ENV).ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human" | "auto") | None => OutputMode::Human,
        Some(other) => {
            warn!(value = other, "unknown {OUTPUT_FORMAT_ENV}; using human output");
            OutputMode::Human
        }
    }
}

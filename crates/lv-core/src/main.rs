//! `lv` - TCS log report renderer.
//!
//! Turns the two TCS pipeline JSON dumps (batch summary and per-library
//! datasets) into a single-file interactive HTML report, and offers
//! headless inspection and validation of the same inputs.

use clap::{Args, Parser, Subcommand};
use lv_common::ReportData;
use lv_core::config::{load_config, ConfigError, ConfigOptions};
use lv_core::exit_codes::ExitCode;
use lv_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use lv_core::summary::{InspectSummary, ValidationSummary};
use lv_report::{ReportConfig, ReportGenerator};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// TCS log report renderer
#[derive(Parser)]
#[command(name = "lv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Report configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Omit timestamps from human log output
    #[arg(long, global = true)]
    no_timestamps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the single-file HTML report
    Render(RenderArgs),

    /// Build every page headlessly and print the page plan as JSON
    Inspect(InspectArgs),

    /// Decode and validate every library, print a JSON summary
    Validate(ValidateArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct DataArgs {
    /// Batch summary JSON (main_data.json)
    #[arg(long)]
    main_data: PathBuf,

    /// Per-library datasets JSON (lib_data.json)
    #[arg(long)]
    lib_data: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Output HTML file
    #[arg(long, short = 'o')]
    out: PathBuf,

    /// Report title (overrides config)
    #[arg(long)]
    title: Option<String>,

    /// Library page shown first (overrides config)
    #[arg(long)]
    default_library: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Only show this library's page
    #[arg(long)]
    library: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    data: DataArgs,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let _ = e.print();
                std::process::exit(ExitCode::ArgsError.as_i32());
            }
            // --help / --version
            e.exit();
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    )
    .with_timestamps(!cli.global.no_timestamps);
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::Inspect(args) => run_inspect(&cli.global, args),
        Commands::Validate(args) => run_validate(args),
        Commands::Version => print_version(),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> ExitCode {
    let mut config = match resolve_config(global) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(title) = &args.title {
        config = config.with_title(title.as_str());
    }
    if let Some(library) = &args.default_library {
        config = config.with_default_library(library.as_str());
    }

    let data = match load_data(&args.data) {
        Ok(data) => data,
        Err(code) => return code,
    };

    let generator = ReportGenerator::new(config);
    let plan = match generator.plan(&data) {
        Ok(plan) => plan,
        Err(e) => return report_failure("render", &e),
    };
    let html = match generator.render_plan(&plan) {
        Ok(html) => html,
        Err(e) => return report_failure("render", &e),
    };

    if let Err(e) = std::fs::write(&args.out, &html) {
        error!(path = %args.out.display(), error = %e, "Failed to write report");
        eprintln!("lv render: cannot write {}: {}", args.out.display(), e);
        return ExitCode::IoError;
    }

    let failed: Vec<&str> = plan.failed_pages().map(|p| p.label.as_str()).collect();
    let exit_code = if failed.is_empty() {
        ExitCode::Clean
    } else {
        warn!(pages = ?failed, "Report written with failed pages");
        ExitCode::DegradedPages
    };
    info!(path = %args.out.display(), bytes = html.len(), "Report written");

    let output = serde_json::json!({
        "command": "render",
        "output": args.out.display().to_string(),
        "bytes": html.len(),
        "pages": plan.pages.iter().filter(|p| p.nav).count(),
        "charts": plan.chart_count(),
        "failed_pages": failed,
        "status": exit_code.code_name(),
    });
    print_json(&output).unwrap_or(exit_code)
}

fn run_inspect(global: &GlobalOpts, args: &InspectArgs) -> ExitCode {
    let config = match resolve_config(global) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let data = match load_data(&args.data) {
        Ok(data) => data,
        Err(code) => return code,
    };

    let plan = match ReportGenerator::new(config).plan(&data) {
        Ok(plan) => plan,
        Err(e) => return report_failure("inspect", &e),
    };

    let Some(summary) = InspectSummary::from_plan(&plan, args.library.as_deref()) else {
        let library = args.library.as_deref().unwrap_or_default();
        eprintln!("lv inspect: library '{}' not found in report data", library);
        return ExitCode::ArgsError;
    };

    let exit_code = if summary.failed_pages.is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::DegradedPages
    };
    print_json(&summary).unwrap_or(exit_code)
}

fn run_validate(args: &ValidateArgs) -> ExitCode {
    let data = match load_data(&args.data) {
        Ok(data) => data,
        Err(code) => return code,
    };

    let summary = ValidationSummary::from_data(&data);
    for lib in summary.libraries.iter().filter(|l| !l.ok) {
        warn!(
            library = %lib.library,
            error = lib.error.as_deref().unwrap_or_default(),
            "Library failed validation"
        );
    }
    info!(
        libraries = summary.library_count,
        malformed = summary.malformed,
        "Validation complete"
    );

    let exit_code = if summary.is_clean() {
        ExitCode::Clean
    } else {
        ExitCode::DataError
    };
    print_json(&summary).unwrap_or(exit_code)
}

fn print_version() -> ExitCode {
    let version_info = serde_json::json!({
        "lv_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });
    print_json(&version_info).unwrap_or(ExitCode::Clean)
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_config(global: &GlobalOpts) -> Result<ReportConfig, ExitCode> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
        user_config_dir: None,
    };
    match load_config(&options) {
        Ok(resolved) => {
            info!(
                source = resolved.source.name(),
                path = ?resolved.source.path(),
                "Configuration resolved"
            );
            Ok(resolved.config)
        }
        Err(e) => {
            error!(error = %e, "Configuration error");
            eprintln!("lv: configuration error: {}", e);
            Err(match e {
                ConfigError::IoError { .. } => ExitCode::IoError,
                _ => ExitCode::ArgsError,
            })
        }
    }
}

fn load_data(args: &DataArgs) -> Result<ReportData, ExitCode> {
    match ReportData::from_files(&args.main_data, &args.lib_data) {
        Ok(data) => {
            info!(
                batch = %data.summary().batch_id,
                libraries = data.library_count(),
                "Report data loaded"
            );
            Ok(data)
        }
        Err(e) => {
            error!(error = %e, code = e.code(), "Failed to load report data");
            eprintln!("lv: cannot load report data: {}", e);
            Err(ExitCode::for_data_error(&e))
        }
    }
}

fn report_failure(command: &str, e: &lv_report::ReportError) -> ExitCode {
    let code = ExitCode::for_report_error(e);
    error!(command, kind = %e.kind(), error = %e, "Command failed");
    eprintln!("lv {}: {}", command, e);
    code
}

/// Print `value` as pretty JSON on stdout. `Some` carries the exit code to
/// use when serialization fails.
fn print_json<T: Serialize>(value: &T) -> Option<ExitCode> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            None
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize output");
            Some(ExitCode::InternalError)
        }
    }
}

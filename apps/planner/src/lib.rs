//! # barra-planner
//!
//! Command-line planner that prints the shopping list for one event.
//!
//! ## Run Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Planner Run                                     │
//! │                                                                         │
//! │  1. Args::parse          <input.json> [--config] [--format] [--strict] │
//! │  2. PlannerConfig::load  defaults → planner.toml → BARRA_* env         │
//! │  3. PlanInput::from_file event + recipes + ingredients + settings      │
//! │  4. resolve settings     event settings over config defaults           │
//! │  5. strict? validate     barra_core::validation                        │
//! │  6. generate_shopping_list                                             │
//! │  7. strict? warnings → error                                           │
//! │  8. render               JSON or table on stdout                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use barra_core::{generate_shopping_list, CoreError, ShoppingList};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod input;
pub mod render;

pub use config::{OutputFormat, PlannerConfig};
pub use error::{ErrorCode, ErrorReport, PlannerError, PlannerResult};
pub use input::{PlanInput, SettingsOverrides};

/// Help text printed for `--help`.
pub const USAGE: &str = "\
Barra shopping list planner

Usage: barra-planner <input.json> [OPTIONS]

Options:
  -c, --config <PATH>      Config file (default: platform config dir/planner.toml)
  -f, --format <FORMAT>    Output format: table | json
  -s, --strict             Validate input and fail on data-quality warnings
  -h, --help               Show this help message";

// =============================================================================
// Arguments
// =============================================================================

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    /// Input document path.
    pub input: PathBuf,

    /// Explicit config file.
    pub config: Option<PathBuf>,

    /// Output format; falls back to the config.
    pub format: Option<OutputFormat>,

    /// Strict mode; ORed with the config.
    pub strict: bool,

    /// `--help` was given.
    pub help: bool,
}

impl Args {
    /// Parses arguments, not including the program name.
    pub fn parse<I>(args: I) -> PlannerResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut input: Option<PathBuf> = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    parsed.config = Some(PathBuf::from(value));
                }
                "--format" | "-f" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    let format = value
                        .parse::<OutputFormat>()
                        .map_err(|e| PlannerError::InvalidArguments(e.to_string()))?;
                    parsed.format = Some(format);
                }
                "--strict" | "-s" => parsed.strict = true,
                "--help" | "-h" => {
                    parsed.help = true;
                    return Ok(parsed);
                }
                flag if flag.starts_with('-') => {
                    return Err(PlannerError::InvalidArguments(format!(
                        "unknown option '{}'",
                        flag
                    )));
                }
                path => {
                    if input.is_some() {
                        return Err(PlannerError::InvalidArguments(format!(
                            "unexpected argument '{}'",
                            path
                        )));
                    }
                    input = Some(PathBuf::from(path));
                }
            }
        }

        parsed.input = input.ok_or_else(|| {
            PlannerError::InvalidArguments("missing <input.json> argument".to_string())
        })?;
        Ok(parsed)
    }
}

fn missing_value(flag: &str) -> PlannerError {
    PlannerError::InvalidArguments(format!("{} requires a value", flag))
}

// =============================================================================
// Planning
// =============================================================================

/// Computes the shopping list for an already parsed input.
///
/// Strict mode validates the input first and turns any warning into
/// [`CoreError::DataQuality`].
pub fn plan_input(
    input: &PlanInput,
    config: &PlannerConfig,
    strict: bool,
) -> PlannerResult<ShoppingList> {
    let settings = input.settings.resolve(&config.calculation);

    if strict {
        input.validate(&settings)?;
    }

    let list = generate_shopping_list(
        &input.event,
        &input.recipes,
        &input.ingredients,
        &settings,
    );

    for warning in &list.warnings {
        warn!(%warning, "Data-quality warning");
    }

    if strict && !list.is_clean() {
        return Err(CoreError::DataQuality(list.warnings).into());
    }

    info!(
        items = list.items.len(),
        total_drinks = list.total_drinks,
        "Shopping list ready"
    );
    Ok(list)
}

/// Reads the input file, computes and renders the list.
pub fn plan(args: &Args, config: &PlannerConfig) -> PlannerResult<String> {
    let input = PlanInput::from_file(&args.input)?;
    debug!(path = ?args.input, cocktails = input.event.cocktails_selected.len(), "Input loaded");

    let strict = args.strict || config.output.strict;
    let list = plan_input(&input, config, strict)?;

    render::render(&list, output_format(args, config))
}

/// Format chosen on the command line, else the configured one.
pub fn output_format(args: &Args, config: &PlannerConfig) -> OutputFormat {
    args.format.unwrap_or(config.output.format)
}

/// Loads the config named on the command line, or the default one.
///
/// A missing or broken default config is logged and replaced by defaults;
/// an explicit `--config` must load.
pub fn load_config(args: &Args) -> PlannerResult<PlannerConfig> {
    match &args.config {
        Some(path) => PlannerConfig::load(Some(path.clone())),
        None => Ok(PlannerConfig::load_or_default(None)),
    }
}

// =============================================================================
// Tracing
// =============================================================================

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - ERROR: Unrecoverable failures
/// - WARN: Data-quality warnings, ignored overrides
/// - INFO: Config file used, result summary
/// - DEBUG: Allocation and aggregation detail
///
/// Logs go to stderr so stdout stays machine-readable.
/// Set `RUST_LOG=barra=trace` for more detail.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barra=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Unit Tests
// =============================================================================

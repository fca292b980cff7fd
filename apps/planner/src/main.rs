//! # barra-planner
//!
//! ## Usage
//! ```bash
//! # Table on stdout, defaults from the platform config dir
//! cargo run -p barra-planner -- event.json
//!
//! # JSON for the website, fail on catalog problems
//! cargo run -p barra-planner -- event.json --format json --strict
//!
//! # Explicit config file
//! cargo run -p barra-planner -- event.json --config ./planner.toml
//! ```

use std::env;
use std::process::ExitCode;

use barra_planner::{
    init_tracing, load_config, output_format, plan, Args, ErrorReport, OutputFormat,
    PlannerError, USAGE,
};
use tracing::error;

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", ErrorReport::from(&e), USAGE);
            return ExitCode::FAILURE;
        }
    };

    if args.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => return fail(&e, args.format.unwrap_or_default()),
    };

    match plan(&args, &config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e, output_format(&args, &config)),
    }
}

/// Prints the error on stderr in the chosen format.
fn fail(err: &PlannerError, format: OutputFormat) -> ExitCode {
    error!(code = %err.code(), "{}", err);

    let report = ErrorReport::from(err);
    match format {
        OutputFormat::Json => match serde_json::to_string(&report) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", report),
        },
        OutputFormat::Table => eprintln!("{}", report),
    }

    ExitCode::FAILURE
}

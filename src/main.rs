//! Swagger From Comments - Command-line tool for building a Swagger descriptor.
//!
//! This binary runs the same generation steps the middleware runs at startup and prints the
//! merged descriptor, so the documentation can be checked without a server.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-comments [OPTIONS] [APIS]...
//! ```
//!
//! # Examples
//!
//! Generate YAML from a config file:
//! ```bash
//! swagger-from-comments --config docs.yml -o swagger.yaml
//! ```
//!
//! Generate JSON from explicit sources:
//! ```bash
//! swagger-from-comments ./routes api.yml --base-path /api --swagger-ui ./public -f json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! swagger-from-comments --config docs.yml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_comments::cli;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger From Comments starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Descriptor generation completed successfully");

    Ok(())
}

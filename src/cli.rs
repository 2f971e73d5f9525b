use crate::config::Config;
use crate::generator::Generator;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger From Comments - Build a Swagger descriptor from `@swagger` doc comments
#[derive(Parser, Debug)]
#[command(name = "swagger-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// API source files or directories, merged in order (overrides `apis` in the config file)
    #[arg(value_name = "APIS")]
    pub apis: Vec<PathBuf>,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base path of the documented API, path or absolute URL
    #[arg(long = "base-path", value_name = "PATH")]
    pub base_path: Option<String>,

    /// Directory holding the documentation UI assets
    #[arg(long = "swagger-ui", value_name = "DIR")]
    pub swagger_ui: Option<PathBuf>,

    /// Default version for the info object
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Descriptor schema version
    #[arg(long = "swagger-version", value_name = "VERSION")]
    pub swagger_version: Option<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref config) = args.config {
        if !config.is_file() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
        info!("Config file: {}", config.display());
    }

    for api in &args.apis {
        if !api.exists() {
            anyhow::bail!("API source does not exist: {}", api.display());
        }
    }

    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Builds the effective configuration: the config file, if any, overlaid with flags
pub fn build_config(args: &CliArgs) -> Result<Config> {
    let file_config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::default(),
    };

    let overrides = Config {
        swagger_ui: args.swagger_ui.clone(),
        base_path: args.base_path.clone(),
        swagger_version: args.swagger_version.clone(),
        api_version: args.api_version.clone(),
        apis: args.apis.clone(),
        ..Config::default()
    };

    Ok(file_config.merge(overrides))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting descriptor generation...");

    // Step 1: Resolve configuration
    let config = build_config(&args)?;
    let source_count = config.apis.len();
    debug!("Effective configuration: {:?}", config);

    // Step 2: Scan sources and merge fragments
    let docs = Generator::new(config)
        .generate()
        .context("Failed to build the API descriptor")?;
    let descriptor = docs.descriptor();
    info!("Descriptor built successfully");

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&descriptor)?,
        OutputFormat::Json => serialize_json(&descriptor)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote descriptor to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - API entries: {}", source_count);
    info!("  - Paths: {}", descriptor.paths.len());
    info!("  - Descriptor URL: {}", docs.descriptor_url());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "swagger-from-comments",
            "routes",
            "api.yml",
            "--base-path",
            "/api",
            "--swagger-ui",
            "public",
            "-f",
            "json",
            "-o",
            "out/swagger.json",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.apis, vec![PathBuf::from("routes"), PathBuf::from("api.yml")]);
        assert_eq!(args.base_path.as_deref(), Some("/api"));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.output_path, Some(PathBuf::from("out/swagger.json")));
        assert!(args.verbose);
    }

    #[test]
    fn test_rejects_missing_api_source() {
        let args = CliArgs::try_parse_from(["swagger-from-comments", "/nonexistent/routes.js"])
            .unwrap();

        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docs.yml");
        fs::write(
            &config_path,
            "swaggerUI: ./public\nbasePath: /from-file\napiVersion: '1.2'\napis:\n  - a.js\n",
        )
        .unwrap();

        let args = CliArgs::try_parse_from([
            "swagger-from-comments",
            "--config",
            config_path.to_str().unwrap(),
            "--base-path",
            "/from-flag",
        ])
        .unwrap();
        let config = build_config(&args).unwrap();

        assert_eq!(config.base_path.as_deref(), Some("/from-flag"));
        assert_eq!(config.api_version.as_deref(), Some("1.2"));
        assert_eq!(config.apis, vec![PathBuf::from("a.js")]);
    }

    #[test]
    fn test_run_writes_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("users.js");
        fs::write(
            &source,
            "/**\n * @swagger\n * /users:\n *   get:\n *     summary: List users\n */\n",
        )
        .unwrap();
        let output = temp_dir.path().join("out").join("swagger.json");

        let args = CliArgs::try_parse_from([
            "swagger-from-comments",
            source.to_str().unwrap(),
            "--base-path",
            "/api",
            "--swagger-ui",
            "public",
            "-f",
            "json",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["basePath"], "/api");
        assert_eq!(written["paths"]["/users"]["get"]["summary"], "List users");
    }
}

//! CLI entry point for the documentation extractor.
//!
//! Provides commands for extracting document trees from JavaScript modules
//! and for managing the layered configuration.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use scopedoc::error::ErrorContext;
use scopedoc::io::ExitCode;
use scopedoc::parsing::default_registry;
use scopedoc::{DocExtractor, DocNode, ExtractError, ExtractOutput, ParseOptions, Settings};
use std::path::{Path, PathBuf};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Documentation extractor for JavaScript modules
#[derive(Parser)]
#[command(
    name = "scopedoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract documentation trees from JavaScript modules",
    long_about = "Attach /** */ comments to the declarations they describe and print the result as JSON.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every extraction stage to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Extract document trees
    #[command(
        about = "Extract the document tree of one or more files",
        after_help = "Examples:\n  scopedoc parse lib/widgets.js\n  scopedoc parse src/*.js --compact\n  scopedoc parse index.js --id widgets --output widgets.json"
    )]
    Parse {
        /// Files to extract
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Module id for the root (single file only, defaults to the file name)
        #[arg(long)]
        id: Option<String>,

        /// Print compact JSON regardless of configuration
        #[arg(long)]
        compact: bool,

        /// Write JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Initialize project
    #[command(about = "Set up .scopedoc directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_settings(config: Option<&Path>) -> Settings {
    match config {
        Some(config_path) => Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(ExitCode::ConfigError.into());
        }),
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        }),
    }
}

fn main() {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref());
    init_logging(cli.debug || settings.debug);

    match cli.command {
        Commands::Init { force } => match Settings::init_config_file(force) {
            Ok(path) => {
                println!("Created configuration file at: {}", path.display());
                println!("Edit this file to customize your settings.");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(ExitCode::ConfigError.into());
            }
        },

        Commands::Config => {
            match toml::to_string_pretty(&settings).context("Error displaying config") {
                Ok(toml_str) => println!("{toml_str}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(ExitCode::from_error(&e).into());
                }
            }
        }

        Commands::Parse {
            files,
            id,
            compact,
            output,
        } => {
            if id.is_some() && files.len() > 1 {
                eprintln!("Error: --id can only be used with a single file");
                std::process::exit(ExitCode::GeneralError.into());
            }

            let code = run_parse(&settings, &files, id, compact, output.as_deref());
            if !code.is_success() {
                std::process::exit(code.into());
            }
        }
    }
}

/// Extract every file, print the trees, and report failures.
///
/// One file prints one tree; several print an array of the trees that
/// succeeded. The exit code is the most severe failure.
fn run_parse(
    settings: &Settings,
    files: &[PathBuf],
    id: Option<String>,
    compact: bool,
    output: Option<&Path>,
) -> ExitCode {
    let mut options = ParseOptions::from_settings(settings);
    options.id = id;

    let results = match (files, options.id.is_some()) {
        ([path], true) => {
            let result = DocExtractor::new()
                .map_err(|source| ExtractError::Parse {
                    path: path.clone(),
                    source,
                })
                .and_then(|mut extractor| extractor.parse_file(path, &options));
            vec![(path.clone(), result)]
        }
        _ => scopedoc::parse_files(files, &options, default_registry()),
    };

    let mut trees = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(extracted) => trees.push(finish(&path, extracted, settings)),
            Err(e) => {
                eprintln!("Error [{}]: {e}", e.status_code());
                for suggestion in e.recovery_suggestions() {
                    eprintln!("  hint: {suggestion}");
                }
                failures.push(ExitCode::from_error(&e));
            }
        }
    }

    if !trees.is_empty() {
        let pretty = settings.output.pretty && !compact;
        if let Err(e) = emit(&trees, files.len() == 1, pretty, output) {
            eprintln!("Error [{}]: {e}", e.status_code());
            failures.push(ExitCode::from_error(&e));
        }
    }

    ExitCode::worst(failures)
}

fn finish(path: &Path, extracted: ExtractOutput, settings: &Settings) -> DocNode {
    for diagnostic in &extracted.diagnostics {
        tracing::warn!("{}:{diagnostic}", path.display());
    }
    let mut tree = extracted.tree;
    if !settings.output.include_errors {
        tree.strip_errors();
    }
    tree
}

fn emit(
    trees: &[DocNode],
    single: bool,
    pretty: bool,
    output: Option<&Path>,
) -> Result<(), ExtractError> {
    let json = match (single, pretty) {
        (true, true) => serde_json::to_string_pretty(&trees[0])?,
        (true, false) => serde_json::to_string(&trees[0])?,
        (false, true) => serde_json::to_string_pretty(trees)?,
        (false, false) => serde_json::to_string(trees)?,
    };

    match output {
        Some(path) => std::fs::write(path, json + "\n").map_err(|source| ExtractError::FileWrite {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

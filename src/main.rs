//! milkrate: name matching, leaderboards and photo compression for
//! plant-based milk taste tests.

#![allow(clippy::too_many_lines, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use milkrate::{
    cli,
    config::{AppConfig, ConfigPreset, Validatable},
    leaderboard::NullRatingPolicy,
    pipeline::exit_codes,
    reports::ReportFormat,
};
#[cfg(feature = "compression")]
use milkrate::compress::OutputFormat;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "milkrate")]
#[command(version)]
#[command(about = "Match brand names, rank taste tests and shrink photos", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  At least one name had no match (match)
    3  Error occurred

EXAMPLES:
    # Did the user mean an existing brand?
    milkrate match \"Oatley\" --candidates brands.json

    # Leaderboard, most-tested first
    milkrate leaderboard taste_tests.json --sort count

    # Shrink a phone photo to the 2 MiB upload budget
    milkrate compress IMG_0042.png")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "MILKRATE_CONFIG")]
    config: Option<PathBuf>,

    /// Start from a named preset (default, strict, permissive, ci)
    #[arg(long, global = true, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `match` subcommand
#[derive(Parser)]
struct MatchArgs {
    /// Names to look up
    #[arg(required = true)]
    inputs: Vec<String>,

    /// JSON array of known names or `{ "id", "name" }` objects
    #[arg(short, long)]
    candidates: PathBuf,

    /// Minimum similarity (0.0-1.0); overrides the configured preset
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Include up to N ranked suggestions per name
    #[arg(short, long, value_name = "N")]
    suggestions: Option<usize>,

    /// Output format (auto: table if interactive, JSON otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `leaderboard` subcommand
#[derive(Parser)]
struct LeaderboardArgs {
    /// JSON array of taste-test rows
    rows: PathBuf,

    /// Column to sort by (brand_name, product_name, avg_rating, count)
    #[arg(long)]
    sort: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    direction: Option<String>,

    /// Leave rows without a rating out of the averages
    #[arg(long)]
    exclude_null_ratings: bool,

    /// Output format (auto: table if interactive, JSON otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `compress` subcommand
#[cfg(feature = "compression")]
#[derive(Parser)]
struct CompressArgs {
    /// Image to compress
    image: PathBuf,

    /// Where to write the result (defaults to a sibling file)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Maximum width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// First-attempt quality (0.0-1.0)
    #[arg(long)]
    quality: Option<f32>,

    /// Byte budget
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,

    /// Output format (jpeg, png, webp)
    #[arg(long)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the closest known brand or product for each name
    Match(MatchArgs),

    /// Aggregate taste tests into a ranked leaderboard
    Leaderboard(LeaderboardArgs),

    /// Downscale and re-encode an image to fit a byte budget
    #[cfg(feature = "compression")]
    Compress(CompressArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .milkrate.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Dispatch to command handlers.
fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Match(args) => {
            let config = effective_config(&cli.config, cli.preset, |config| {
                if args.threshold.is_some() {
                    config.matching.threshold = args.threshold;
                }
                if args.suggestions.is_some() {
                    config.matching.max_suggestions = args.suggestions;
                }
                apply_output_flags(config, args.output, &args.output_file, cli.no_color);
            })?;
            cli::run_match(
                &args.inputs,
                &args.candidates,
                &config,
                args.suggestions.is_some(),
                cli.quiet,
            )
        }

        Commands::Leaderboard(args) => {
            let config = effective_config(&cli.config, cli.preset, |config| {
                if let Some(sort) = &args.sort {
                    config.leaderboard.sort_column.clone_from(sort);
                }
                if let Some(direction) = &args.direction {
                    config.leaderboard.direction.clone_from(direction);
                }
                if args.exclude_null_ratings {
                    config.leaderboard.null_rating = NullRatingPolicy::Exclude;
                }
                apply_output_flags(config, args.output, &args.output_file, cli.no_color);
            })?;
            cli::run_leaderboard(&args.rows, &config, cli.quiet)
        }

        #[cfg(feature = "compression")]
        Commands::Compress(args) => {
            let config = effective_config(&cli.config, cli.preset, |config| {
                let options = &mut config.compression;
                if let Some(width) = args.max_width {
                    options.max_width = width;
                }
                if let Some(height) = args.max_height {
                    options.max_height = height;
                }
                if let Some(quality) = args.quality {
                    options.quality = quality;
                }
                if let Some(max_size) = args.max_size {
                    options.max_size_bytes = max_size;
                }
                if let Some(format) = args.format {
                    options.format = format;
                }
            })?;
            cli::run_compress(&args.image, args.output_file, &config.compression, cli.quiet)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "milkrate", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = milkrate::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    milkrate::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let show = |dir: Option<PathBuf>| {
                    dir.map_or_else(|| "(unavailable)".to_string(), |d| d.display().to_string())
                };
                eprintln!("Config file search order:");
                eprintln!("  1. --config / MILKRATE_CONFIG");
                eprintln!("  2. {}", show(std::env::current_dir().ok()));
                eprintln!("  3. enclosing git checkout");
                eprintln!("  4. {}", show(dirs::config_dir().map(|d| d.join("milkrate"))));
                eprintln!("  5. {}", show(dirs::home_dir()));
                eprintln!();
                eprintln!("Recognized file names:");
                for name in milkrate::config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match milkrate::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".milkrate.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = milkrate::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

/// File config (or defaults) with the preset and then the command's flags
/// layered on top.
///
/// Fails when the merged result does not validate.
fn effective_config(
    config_path: &Option<PathBuf>,
    preset: Option<ConfigPreset>,
    apply_flags: impl FnOnce(&mut AppConfig),
) -> Result<AppConfig> {
    let base = preset.map_or_else(AppConfig::default, AppConfig::from_preset);
    let (config, loaded_from) =
        AppConfig::from_file_with_flags(config_path.as_deref(), &base, apply_flags);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", details.join("\n  "));
    }
    Ok(config)
}

/// Output flags only override when given.
fn apply_output_flags(
    config: &mut AppConfig,
    format: ReportFormat,
    file: &Option<PathBuf>,
    no_color: bool,
) {
    if format != ReportFormat::Auto {
        config.output.format = format;
    }
    if file.is_some() {
        config.output.file.clone_from(file);
    }
    if no_color {
        config.output.no_color = true;
    }
}

fn parse_preset(name: &str) -> std::result::Result<ConfigPreset, String> {
    ConfigPreset::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
    })
}

use clap::{Parser, Subcommand};
use squarefit::audit::AnalysisOutcome;
use squarefit::config::{self, NormalizerConfig};
use squarefit::imaging::{self, Quality, Rounding, RustBackend};
use squarefit::{audit, naming, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Overrides for the `[output]` config section.
#[derive(clap::Args)]
struct OutputArgs {
    /// Edge length of the square output in pixels
    #[arg(long)]
    size: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Rounding of the scaled long side
    #[arg(long, value_enum)]
    rounding: Option<Rounding>,
}

impl OutputArgs {
    fn apply(&self, config: &mut NormalizerConfig) {
        if let Some(size) = self.size {
            config.output.target_size = size;
        }
        if let Some(quality) = self.quality {
            config.output.quality = quality;
        }
        if let Some(rounding) = self.rounding {
            config.output.rounding = rounding;
        }
    }
}

#[derive(Parser)]
#[command(name = "squarefit")]
#[command(about = "Inspect images and normalize them into square JPEG portraits")]
#[command(long_about = "\
Inspect images and normalize them into square JPEG portraits

Normalizing scales the shorter side to the target edge (default 300px),
center-crops the longer side, converts to RGB and writes an optimized JPEG
(default quality 85). The source file is never modified, and the output only
appears once it has been fully written.

Examples:

  squarefit analyze images/profile.jpg images/IMG_1384cd.jpg
  squarefit normalize images/IMG_1384cd.jpg --size 300 --quality 85
  squarefit audit images/profile.jpg images/IMG_1384cd.jpg
  squarefit placeholder images/profile.jpg

Run 'squarefit gen-config' to generate a documented squarefit.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./squarefit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report dimensions, format, colour mode and size of each image
    Analyze {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Resize, center-crop and re-encode one image as a square JPEG
    Normalize {
        source: PathBuf,

        /// Destination (default: <stem>_optimized.jpg next to the source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: OutputArgs,
    },
    /// Analyze each image and normalize the ones outside the required range
    Audit {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        args: OutputArgs,
    },
    /// Write a generated placeholder portrait
    Placeholder {
        output: PathBuf,

        #[command(flatten)]
        args: OutputArgs,
    },
    /// Print a stock squarefit.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let backend = RustBackend::new();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Analyze { paths } => {
            let config = load_config(cli.config.as_deref())?;
            let entries = audit::analyze_paths(&backend, &paths, config.range());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (i, entry) in entries.iter().enumerate() {
                    match &entry.outcome {
                        AnalysisOutcome::Analyzed { metadata } => {
                            output::print_analysis(i + 1, metadata, &config);
                        }
                        AnalysisOutcome::Failed { error } => {
                            for line in output::format_analysis_error(i + 1, &entry.path, error) {
                                println!("{}", line);
                            }
                        }
                    }
                }
            }
            if entries.iter().any(|entry| entry.is_failed()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Normalize {
            source,
            output: destination,
            args,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;
            let destination = destination
                .unwrap_or_else(|| naming::optimized_path(&source, &config.output.suffix));
            let result = imaging::normalize(&backend, &config.request(&source, destination))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_normalization(&source, &result, &config);
            }
        }
        Command::Audit { paths, args } => {
            let mut config = load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;
            let report = audit::audit_with_backend(&backend, &paths, &config);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_audit(&report, &config);
            }
            if report.has_failures() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Placeholder {
            output: destination,
            args,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;
            let result = imaging::create_placeholder(
                &destination,
                config.output.target_size,
                Quality::new(config.output.quality),
            )?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_placeholder(&result);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `--config`, or `squarefit.toml` from the working directory.
fn load_config(
    explicit: Option<&Path>,
) -> Result<NormalizerConfig, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    Ok(config::discover_config(explicit, &cwd)?)
}

/// Route `tracing` events to stderr so stdout stays a clean report.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "squarefit=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

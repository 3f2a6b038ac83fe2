use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::error;

use advent_edge::maintenance::{self, Report};
use advent_edge::sidecar::BODY_TIMESTAMP;
use advent_edge::{AdventError, Config};

/// Maintenance passes over the photo asset tree.
#[derive(Debug, Parser)]
#[command(name = "advent-maint", version, about)]
struct Cli {
    /// Photo directory (defaults to PHOTOS_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Load environment from this file before reading configuration (e.g. .env.test)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add `body_timestamp` to sidecars that lack it
    AddTimestamps {
        /// Timestamp to write (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Remove a field from every sidecar
    StripField {
        #[arg(long, default_value = BODY_TIMESTAMP)]
        field: String,
    },
    /// Fold case-variant keys onto their canonical names
    DedupeKeys,
    /// Delete originals that already have a compressed counterpart
    RemoveOriginals {
        /// Report what would be removed without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Check sidecars against the expected schema
    Validate,
}

fn load_config(env_file: Option<&PathBuf>) -> Result<Config, AdventError> {
    match env_file {
        Some(path) => Config::from_env_file(path),
        None => {
            dotenvy::dotenv().ok();
            Config::load()
        }
    }
}

fn run(cli: Cli, cfg: &Config) -> Result<ExitCode, AdventError> {
    let dir = cli.dir.unwrap_or_else(|| cfg.photos_dir.clone());

    let report: Report = match cli.command {
        Commands::AddTimestamps { at } => {
            maintenance::add_timestamps(&dir, at.unwrap_or_else(Utc::now))?
        }
        Commands::StripField { field } => maintenance::strip_field(&dir, &field)?,
        Commands::DedupeKeys => maintenance::dedupe_keys(&dir)?,
        Commands::RemoveOriginals { dry_run } => maintenance::remove_originals(&dir, dry_run)?,
        Commands::Validate => {
            let report = maintenance::validate(&dir)?;
            println!(
                "valid: {}, invalid: {}, errors: {}",
                report.valid,
                report.invalid.len(),
                report.errors
            );
            for path in &report.invalid {
                println!("  {}", path.display());
            }
            return Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    };

    println!("{report}");
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match load_config(cli.env_file.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("advent-maint: {e}");
            return ExitCode::FAILURE;
        }
    };
    advent_edge::logging::init(&cfg.loglevel);

    match run(cli, &cfg) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "maintenance run failed");
            ExitCode::FAILURE
        }
    }
}

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cricket_stats::config::AppConfig;
use cricket_stats::pipeline::{run_analysis, run_photos, run_reconcile, RunOptions};

#[derive(Parser)]
#[command(name = "cricket-stats")]
#[command(about = "Cricket team statistics: leaderboards, spotlights and photo analysis")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Stats CSV file (overrides config)
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Photo directory (overrides config)
    #[arg(long)]
    images: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute leaderboards and spotlights and write all reports
    Analyze {
        /// Do not render PNG charts
        #[arg(long)]
        skip_charts: bool,

        /// Do not analyse photos even if an images directory is configured
        #[arg(long)]
        skip_photos: bool,
    },

    /// Catalogue and categorise photos only
    Photos,

    /// Show how player names map onto the roster without writing outputs
    Reconcile,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config {:?}", cli.config))?
    } else {
        AppConfig::default()
    };

    if let Some(stats) = &cli.stats {
        config.stats_csv = stats.clone();
    }
    if let Some(images) = &cli.images {
        config.images_dir = Some(images.clone());
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Log file for commands that write to the output directory. `reconcile`
/// only reads, so it logs to the console alone.
fn log_file(command: &Commands, config: &AppConfig) -> Option<PathBuf> {
    match command {
        Commands::Analyze { .. } | Commands::Photos => Some(config.log_file()),
        Commands::Reconcile => None,
    }
}

fn init_tracing(cli: &Cli, log_file: Option<PathBuf>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
            }
            let file =
                File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| fmt::layer().json()))
        .with((!cli.json_logs).then(|| fmt::layer()))
        .with(file_layer)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&cli, log_file(&cli.command, &config))?;

    tracing::info!("Starting cricket-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze {
            skip_charts,
            skip_photos,
        } => {
            let summary = run_analysis(
                &config,
                RunOptions {
                    skip_charts,
                    skip_photos,
                },
            )?;

            println!("\n=== Analysis Results ===");
            println!("Rows loaded:      {}", summary.rows_loaded);
            println!("Rows kept:        {}", summary.rows_kept);
            println!("Players:          {}", summary.players);
            println!("Leaderboards:     {}", summary.leaderboards);
            println!("Spotlights:       {}", summary.spotlights);
            if let Some(photos) = summary.photos {
                println!("Photos:           {}", photos);
            }
            println!("Diagnostics:      {}", summary.diagnostics.len());
            for (kind, count) in summary.diagnostics.counts_by_kind() {
                println!("  - {}: {}", kind, count);
            }
            println!("\nOutputs saved to: {:?}", config.output_dir);
        }

        Commands::Photos => {
            let Some(dir) = config.images_dir.clone() else {
                bail!("No images directory given; pass --images or set images_dir in the config");
            };
            let analysis = run_photos(&config, &dir)?;

            println!("\n=== Photo Analysis ===");
            println!("Photos analysed:  {}", analysis.photos.len());
            println!("Skipped:          {}", analysis.diagnostics.len());
            for (category, count) in analysis.category_counts() {
                println!("  - {}: {}", category.label(), count);
            }
            let top = analysis.most_photographed(5);
            if !top.is_empty() {
                println!("\nMost photographed:");
                for (player, count) in top {
                    println!("  - {}: {}", player, count);
                }
            }
        }

        Commands::Reconcile => {
            let report = run_reconcile(&config)?;

            println!("\n=== Name Reconciliation ===");
            println!("Rows loaded:      {}", report.rows_loaded);
            println!("Rows kept:        {}", report.rows_kept);
            let fuzzy: Vec<_> = report.reconciliation.fuzzy_matches().collect();
            println!(
                "Exact matches:    {}",
                report.reconciliation.mapping.len() - fuzzy.len()
            );
            if !fuzzy.is_empty() {
                println!("\nFuzzy matches:");
                for (name, m) in fuzzy {
                    println!("  {:<28} -> {:<24} ({:.1})", name, m.canonical, m.score);
                }
            }
            if !report.reconciliation.unmatched.is_empty() {
                println!("\nUnmatched names:");
                for u in &report.reconciliation.unmatched {
                    match &u.best_candidate {
                        Some(best) => {
                            println!("  {:<28} closest {} ({:.1})", u.name, best, u.best_score)
                        }
                        None => println!("  {}", u.name),
                    }
                }
            }
            if !report.diagnostics.is_empty() {
                println!("\nDiagnostics:");
                for d in &report.diagnostics {
                    println!("  - {}", d);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cricket-stats").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_reconcile_has_no_log_file() {
        let config = AppConfig::default();
        let cli = parse(&["--output-dir", "out", "reconcile"]);
        assert_eq!(log_file(&cli.command, &config), None);
    }

    #[test]
    fn test_writing_commands_log_to_output_dir() {
        let config = AppConfig::default();
        for args in [&["analyze", "--skip-charts"][..], &["photos"][..]] {
            let cli = parse(args);
            assert_eq!(log_file(&cli.command, &config), Some(config.log_file()));
        }
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::LazyLock,
    time::Instant,
};

use aurci::{
    config::Config, pkgbuild::RECIPE_FILE, HttpDownloader, MakepkgSrcinfo, Result,
    UpdateOutcome, Updater,
};
use aurci_meta::{metadata::lookup, MetadataResolver};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

static CHECK_MARK: LazyLock<colored::ColoredString> = LazyLock::new(|| "✔".bright_green().bold());
static CROSS_MARK: LazyLock<colored::ColoredString> = LazyLock::new(|| "〤".bright_red().bold());
static SKIP_MARK: LazyLock<colored::ColoredString> = LazyLock::new(|| "-".bright_yellow().bold());

#[derive(Parser)]
#[command(name = "aurci")]
#[command(about = "Keeps ROS PKGBUILD recipes in sync with rosdistro releases", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ROS distribution name
    #[arg(short, long)]
    distro: Option<String>,

    /// Override the distribution feed location
    #[arg(long)]
    feed_url: Option<String>,

    /// Directory holding one subdirectory per package
    #[arg(short, long)]
    packages_root: Option<PathBuf>,

    /// GitHub token for feed access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update package recipes to their released versions
    Update {
        /// Package names (e.g., ros-melodic-roscpp)
        #[arg(required_unless_present = "all")]
        packages: Vec<String>,

        /// Update every package directory under the packages root
        #[arg(short, long, conflicts_with = "packages")]
        all: bool,
    },
}

fn setup_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(distro) = &cli.distro {
        config.resolver.distro = distro.clone();
    }
    if let Some(feed_url) = &cli.feed_url {
        config.resolver.feed_url = Some(feed_url.clone());
    }
    if let Some(root) = &cli.packages_root {
        config.packages_root = root.clone();
    }
    if cli.github_token.is_some() {
        config.resolver.github_token = cli.github_token.clone();
    }
    Ok(config)
}

/// Package directories under `root` that contain a recipe
fn scan_packages(root: &Path) -> Result<Vec<String>> {
    let mut packages = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.join(RECIPE_FILE).is_file() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                packages.push(name.to_string());
            }
        }
    }
    packages.sort();
    Ok(packages)
}

#[derive(Default)]
struct Summary {
    updated: usize,
    current: usize,
    skipped: usize,
    failed: usize,
}

fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;
    let Commands::Update { packages, all } = cli.command;

    let resolver = MetadataResolver::new(config.resolver.clone())?;
    let index = resolver.resolve()?;

    let targets = if all {
        scan_packages(&config.packages_root)?
    } else {
        packages
    };

    let updater = Updater::new(
        &config.packages_root,
        HttpDownloader::new()?,
        MakepkgSrcinfo::new(),
    );

    let now = Instant::now();
    let mut summary = Summary::default();

    for package in &targets {
        if let Ok(metadata) = lookup(&index, package) {
            if config.is_skipped(metadata) {
                if all {
                    println!("[{}] {}: listed in skip list", &*SKIP_MARK, package);
                    summary.skipped += 1;
                    continue;
                }
                warn!("{} is listed in the skip list, updating anyway", package);
            }
        }

        match updater.update_package(&index, package) {
            Ok(outcome @ UpdateOutcome::Updated { .. }) => {
                println!("[{}] {}: {}", &*CHECK_MARK, package, outcome);
                summary.updated += 1;
            }
            Ok(UpdateOutcome::AlreadyCurrent) => {
                println!("[{}] {}: already current", &*CHECK_MARK, package);
                summary.current += 1;
            }
            Ok(UpdateOutcome::NoVersionAvailable) => {
                println!("[{}] {}: no release version, skipped", &*SKIP_MARK, package);
                summary.skipped += 1;
            }
            Err(e) => {
                eprintln!("[{}] {}: {}", &*CROSS_MARK, package, e);
                summary.failed += 1;
            }
        }
    }

    println!();
    println!(
        "[{}] {} updated, {} already current, {} skipped, {} failed",
        "+".bright_blue().bold(),
        summary.updated,
        summary.current,
        summary.skipped,
        summary.failed,
    );
    println!(
        "[{}] Processed {} package(s) in {:#?}",
        "+".bright_blue().bold(),
        targets.len(),
        now.elapsed()
    );

    Ok(summary.failed == 0)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("[{}] {}", &*CROSS_MARK, e);
            ExitCode::FAILURE
        }
    }
}

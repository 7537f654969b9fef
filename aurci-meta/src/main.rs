//! aurci-meta CLI
//!
//! Command-line interface for inspecting resolved package metadata.

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use aurci_meta::{
    config::ResolverConfig,
    metadata::{lookup, MetadataResolver, PackageMetadata},
    Result,
};

#[derive(Parser)]
#[command(name = "aurci-meta")]
#[command(about = "Package metadata resolver for rosdistro feeds", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// ROS distribution name
    #[arg(short, long, default_value = aurci_meta::config::DEFAULT_DISTRO)]
    distro: String,

    /// Override the distribution feed location
    #[arg(long)]
    feed_url: Option<String>,

    /// Override the package name prefix (default: ros-<distro>-)
    #[arg(long)]
    prefix: Option<String>,

    /// GitHub token for feed access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// List metadata for every package in the feed
    List {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show metadata for a single package
    Show {
        /// Normalized package name (e.g., ros-melodic-roscpp)
        package: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
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
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_text(metadata: &PackageMetadata) {
    println!("\n{}:\n", metadata.package_name);
    println!("  upstream: {}", metadata.upstream_name);
    println!("  repository: {}", metadata.repository);
    println!("  siblings: {}", metadata.siblings);
    println!("  source: {}", metadata.source_url);
    println!(
        "  version: {}",
        metadata.version.as_deref().unwrap_or("-")
    );
    println!(
        "  download: {}",
        metadata.download_url.as_deref().unwrap_or("-")
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = ResolverConfig {
        distro: cli.distro,
        feed_url: cli.feed_url,
        package_prefix: cli.prefix,
        github_token: cli.github_token,
    };
    let packages = MetadataResolver::new(config)?.resolve()?;

    match cli.command {
        Commands::List { format } => match format {
            OutputFormat::Text => packages.values().for_each(print_text),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&packages)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&packages)?),
        },

        Commands::Show { package, format } => {
            let metadata = lookup(&packages, &package)?;
            match format {
                OutputFormat::Text => print_text(metadata),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(metadata)?),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(metadata)?),
            }
        }
    }

    Ok(())
}

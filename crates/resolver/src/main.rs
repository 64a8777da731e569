//! MentionLink resolver CLI
//!
//! Reads a sentence-split document with mention offsets, resolves every
//! mention against the configured lookup store and prints the results as
//! JSON on stdout. Logs and the optional metrics snapshot go to stderr.

use anyhow::Context as _;
use clap::Parser;
use mentionlink_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics::{self, LOOKUP_BUCKETS},
    store::open_store,
    VERSION,
};
use mentionlink_resolver::{DocumentInput, MentionContextResolver};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "resolver", version, about = "Resolve entity mentions to context windows and candidates")]
struct Args {
    /// Document JSON to resolve ("-" reads stdin)
    #[arg(short, long)]
    document: PathBuf,

    /// Configuration file (defaults to config/ files and APP__ variables)
    #[arg(short, long)]
    config: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a Prometheus metrics snapshot to stderr when done
    #[arg(long)]
    metrics: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load configuration
    let config = match args.config.as_deref() {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&config.observability);

    info!("Starting MentionLink resolver v{}", VERSION);

    let metrics_handle = if args.metrics || config.observability.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    let raw = read_document(&args.document)?;
    let document = DocumentInput::from_json(&raw)
        .with_context(|| format!("Invalid document {}", args.document.display()))?;

    let store = open_store(&config.store)?;
    let mut resolver = MentionContextResolver::new(store, &config.resolver);

    let resolved = resolver.resolve_document(&document)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&resolved)?
    } else {
        serde_json::to_string(&resolved)?
    };
    println!("{}", output);

    info!(cache = ?resolver.cache_stats(), "Resolution complete");

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    Ok(())
}

/// Initialize tracing on stderr so stdout stays machine-readable
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Install the Prometheus recorder and describe our metrics
fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("store_lookup_duration_seconds".to_string()),
            LOOKUP_BUCKETS,
        )?
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    metrics::register_metrics();
    Ok(handle)
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    let mut raw = String::new();

    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read document from stdin")?;
    } else {
        raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?;
    }

    Ok(raw)
}

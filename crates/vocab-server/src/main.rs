use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use vocab_corpus::{Catalog, DataRoot, DialectSections, MergeReport, merge_all};
use vocab_normalize::Normalizer;
use vocab_scrape::{Fetcher, Scraper};
use vocab_types::Dialect;

use vocab_server::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CONFIG: &str = "vocab.toml";

#[derive(Parser)]
#[command(name = "arabic-vocab")]
#[command(about = "Build and serve per-dialect Arabic vocabulary corpora")]
struct Cli {
    /// Directory holding one sub-directory per dialect.
    #[arg(long, env = "VOCAB_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,
    /// Dialect and source catalog.
    #[arg(long, env = "VOCAB_CONFIG", default_value = DEFAULT_CONFIG, global = true)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve section files and merged corpora over HTTP.
    Serve {
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Omit Cache-Control headers.
        #[arg(long, default_value_t = false)]
        no_cache: bool,
    },
    /// Merge section files into `all.json` / `all.csv` per dialect.
    Merge {
        /// Restrict the merge to these dialects.
        #[arg(long = "dialect")]
        dialects: Vec<String>,
    },
    /// Fetch the configured sources and write section files.
    Scrape {
        /// Restrict scraping to these sources.
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Pause between two page requests.
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,
        /// Merge once scraping is done.
        #[arg(long, default_value_t = false)]
        merge: bool,
        /// Also write desert-sky sections to the flat `json/` and `csv/`
        /// directories served by `/vocab/{section}`.
        #[arg(long, default_value_t = false)]
        legacy: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let catalog = Catalog::load(&cli.config)
        .with_context(|| format!("loading catalog {}", cli.config.display()))?;
    let root = DataRoot::new(&cli.data_dir);
    info!("using data directory {}", root.path().display());

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cache,
        } => serve(root, catalog, &host, port, no_cache).await?,
        Commands::Merge { dialects } => {
            let report = merge(&root, &catalog, &dialects)?;
            println!("{report}");
        }
        Commands::Scrape {
            sources,
            delay_ms,
            merge: then_merge,
            legacy,
        } => {
            scrape(&root, &catalog, &cli.config, &sources, delay_ms, legacy).await?;
            if then_merge {
                let report = merge(&root, &catalog, &[])?;
                println!("{report}");
            }
        }
    }

    Ok(())
}

async fn serve(
    root: DataRoot,
    catalog: Catalog,
    host: &str,
    port: u16,
    disable_cache: bool,
) -> Result<()> {
    info!("binding to {host}:{port}");
    if disable_cache {
        info!("cache headers disabled");
    }
    if !root.path().is_dir() {
        warn!("data directory {} does not exist", root.path().display());
    }

    let state = AppState {
        root: Arc::new(root),
        catalog: Arc::new(catalog),
        disable_cache,
    };
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn merge(root: &DataRoot, catalog: &Catalog, only: &[String]) -> Result<MergeReport> {
    let start = Instant::now();
    let report = if only.is_empty() {
        merge_all(root, catalog)
    } else {
        merge_all(root, &restrict_dialects(catalog, only)?)
    };
    info!("merge finished in {} ms", start.elapsed().as_millis());
    Ok(report)
}

fn restrict_dialects(catalog: &Catalog, only: &[String]) -> Result<Catalog> {
    let mut dialects = Vec::with_capacity(only.len());
    for raw in only {
        let Some(dialect) = Dialect::from_slug(raw) else {
            bail!("unknown dialect `{raw}`");
        };
        if !catalog.contains(dialect) {
            bail!("dialect `{dialect}` is not in the catalog");
        }
        dialects.push(DialectSections {
            name: dialect,
            sections: catalog.sections_for(dialect).unwrap_or_default().to_vec(),
        });
    }
    Ok(Catalog {
        dialects,
        sources: Vec::new(),
    })
}

async fn scrape(
    root: &DataRoot,
    catalog: &Catalog,
    config: &Path,
    only: &[String],
    delay_ms: u64,
    legacy: bool,
) -> Result<()> {
    if catalog.sources.is_empty() {
        bail!("no [[source]] entries in {}", config.display());
    }
    let sources = if only.is_empty() {
        catalog.sources.clone()
    } else {
        only.iter()
            .map(|name| {
                catalog
                    .source(name)
                    .cloned()
                    .with_context(|| format!("unknown source `{name}`"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let fetcher = Fetcher::new(Duration::from_millis(delay_ms)).context("creating http client")?;
    let scraper =
        Scraper::new(fetcher, Normalizer::default(), root.clone()).with_legacy(legacy);
    let start = Instant::now();
    for report in scraper.scrape_all(&sources).await {
        println!("{report}");
    }
    info!("scraping finished in {} s", start.elapsed().as_secs());
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}

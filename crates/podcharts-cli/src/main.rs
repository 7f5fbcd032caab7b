use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use podcharts_backends::{backend_for_source, AppleBackend, AppleBackendConfig, ChartBackend};
use serde_json::to_string_pretty;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "podcharts-cli")]
#[command(about = "Query podcast directory charts")]
struct Cli {
    /// Directory backend to query.
    #[arg(long, global = true, default_value = "apple")]
    source: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a podcast title into its directory identity.
    Search {
        #[arg(long)]
        title: String,
        #[arg(long)]
        rss: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Resolve a category id into a chart id.
    ChartId {
        #[arg(long)]
        category: String,
        #[arg(long)]
        country: Option<String>,
    },
    /// Fetch ranked chart positions.
    Fetch {
        #[arg(long)]
        chart: String,
        #[arg(long)]
        country: String,
        #[arg(long = "filter")]
        filter: Vec<String>,
        /// Treat `--chart` as a category id instead of a chart id.
        #[arg(long)]
        category_id: bool,
    },
}

#[derive(Debug, Clone)]
struct CliConfig {
    user_agent: Option<String>,
    apple_search_url: Option<String>,
    apple_webview_url: Option<String>,
}

impl CliConfig {
    fn from_env() -> Self {
        Self {
            user_agent: std::env::var("PODCHARTS_USER_AGENT").ok(),
            apple_search_url: std::env::var("PODCHARTS_APPLE_SEARCH_URL").ok(),
            apple_webview_url: std::env::var("PODCHARTS_APPLE_WEBVIEW_URL").ok(),
        }
    }

    fn apple_backend(&self) -> AppleBackend {
        let defaults = AppleBackendConfig::default();
        AppleBackend::with_config(AppleBackendConfig {
            search_url: self.apple_search_url.clone().unwrap_or(defaults.search_url),
            webview_base_url: self
                .apple_webview_url
                .clone()
                .unwrap_or(defaults.webview_base_url),
            category_locale: defaults.category_locale,
            user_agent: self.user_agent.clone(),
        })
    }

    fn backend(&self, source: &str) -> Option<Box<dyn ChartBackend>> {
        match source {
            "apple" => Some(Box::new(self.apple_backend())),
            other => backend_for_source(other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    let backend = config
        .backend(&cli.source)
        .ok_or_else(|| anyhow!("unknown chart source: {}", cli.source))?;
    info!(source = backend.source_id(), base_url = backend.base_url(), "backend selected");

    let output = match cli.command {
        Commands::Search { title, rss, id } => {
            let data = backend
                .get_remote_podcast_data(&title, rss.as_deref(), id.as_deref())
                .await
                .with_context(|| format!("searching for {title:?}"))?;
            to_string_pretty(&data)?
        }
        Commands::ChartId { category, country } => {
            let chart = backend
                .get_chart_id_for_category(&category, country.as_deref())
                .await
                .with_context(|| format!("resolving chart for category {category}"))?;
            to_string_pretty(&chart)?
        }
        Commands::Fetch {
            chart,
            country,
            filter,
            category_id,
        } => {
            let positions = backend
                .fetch(&chart, &country, Some(filter.as_slice()), category_id)
                .await
                .with_context(|| format!("fetching chart {chart} for {country}"))?;
            to_string_pretty(&positions)?
        }
    };

    println!("{output}");
    Ok(())
}

//! stillbrook: run one search-match-highlight pass from the command line.
//!
//! Reads a JSON search request from a file or stdin, prints the response JSON
//! on stdout and logs to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use stillbrook::audit::TracingAuditSink;
use stillbrook::classifier::MatchClassifier;
use stillbrook::config::StillbrookConfigBuilder;
use stillbrook::orchestrator::{SearchOrchestrator, SearchRequest, UserIdentity};
use stillbrook::provider::SerpApiProvider;
use stillbrook::renderer::{ChromiumLauncher, PageRenderer, ReqwestFetcher};
use stillbrook::sentiment::LexiconScorer;

/// Fetch search results, classify negative/positive matches and highlight them.
#[derive(Parser)]
#[command(name = "stillbrook", version, about)]
struct Cli {
    /// JSON search request file; reads stdin when omitted
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// User id recorded in the audit entry
    #[arg(short, long, env = "STILLBROOK_USER", default_value = "cli")]
    user: String,

    /// User email recorded in the audit entry
    #[arg(long, env = "STILLBROOK_USER_EMAIL")]
    email: Option<String>,

    /// Pretty-print the response JSON
    #[arg(long)]
    pretty: bool,

    /// Skip the browser and fetch snapshots over plain HTTP
    #[arg(long)]
    no_browser: bool,
}

fn read_request(path: Option<&PathBuf>) -> Result<SearchRequest> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Request is not a valid search request")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("stillbrook=info,chromiumoxide::handler=off,chromiumoxide::conn=off")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let request = read_request(cli.request.as_ref())?;
    let mut builder = StillbrookConfigBuilder::from_env();
    if cli.no_browser {
        builder = builder.browser_enabled(false);
    }
    let config = builder.build().context("Invalid configuration")?;

    let provider = SerpApiProvider::from_config(&config).context("Search provider is not configured")?;
    let render_options = config.render_options();
    let fallback = ReqwestFetcher::from_options(&render_options)?;
    let renderer = if config.browser_enabled() {
        PageRenderer::new(ChromiumLauncher::from_config(&config), fallback)
    } else {
        PageRenderer::fallback_only(fallback)
    };
    let classifier =
        MatchClassifier::new(Arc::new(LexiconScorer::new()), config.sentiment_thresholds());

    let orchestrator = SearchOrchestrator::new(Arc::new(provider), Arc::new(renderer), classifier)
        .with_render_options(render_options)
        .with_audit_sink(Arc::new(TracingAuditSink));

    let mut user = UserIdentity::new(cli.user);
    if let Some(email) = cli.email {
        user = user.with_email(email);
    }

    let outcome = orchestrator.run_search(&user, request, started).await;
    orchestrator.flush_audits().await;

    let body = if cli.pretty {
        serde_json::to_string_pretty(&outcome.response)?
    } else {
        serde_json::to_string(&outcome.response)?
    };
    println!("{body}");

    if !outcome.is_success() {
        std::process::exit(match outcome.status_code {
            404 => 3,
            _ => 1,
        });
    }
    Ok(())
}

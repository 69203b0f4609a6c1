//! Papers digest CLI - one fetch-render-send cycle per invocation.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use papers_digest::{
    DigestConfig, EmailConfig, FeedFetcher, Notifier, Pipeline, RunResult, SmtpChannel,
};

/// Papers digest - email the latest entries from academic feeds.
#[derive(Parser)]
#[command(name = "papers-digest")]
#[command(about = "Fetch recent papers from RSS/Atom feeds and email an HTML digest")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Feed configuration file (defaults to the built-in feed set)
    #[arg(long, env = "DIGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Print the rendered digest instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("papers_digest=debug,info")
    } else {
        EnvFilter::new("papers_digest=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => DigestConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DigestConfig::builtin().context("Built-in config is invalid")?,
    };

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("papers-digest/{}", env!("CARGO_PKG_VERSION")));
    let fetcher = FeedFetcher::new(
        config.fetch_timeout_secs.map(Duration::from_secs),
        &user_agent,
    )
    .context("Failed to create HTTP client")?;

    let recipients = config.recipients.clone();
    let pipeline = Pipeline::new(config, fetcher);
    let now = chrono::Utc::now();

    if cli.dry_run {
        return run_dry(&pipeline, now).await;
    }

    let email_config = EmailConfig::from_env(recipients).context("Invalid SMTP settings")?;
    let notifier = Notifier::new(Box::new(SmtpChannel::new(email_config)));
    let result = pipeline.run(&notifier, now).await;
    log_summary(&result);

    Ok(())
}

async fn run_dry(pipeline: &Pipeline, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
    let mut result = RunResult::default();
    let window = pipeline.window(now);
    let digest = pipeline.collect(&window, &mut result).await;
    log_summary(&result);

    if digest.is_empty() {
        tracing::info!("No new articles found");
        return Ok(());
    }

    let rendered = pipeline.render(&digest, now);
    println!("{}", rendered.html);
    Ok(())
}

fn log_summary(result: &RunResult) {
    tracing::info!(
        fetched = result.feeds_fetched,
        failed = result.feeds_failed,
        articles = result.articles,
        sent = result.delivery.as_ref().is_some_and(|d| d.is_sent()),
        "Run complete"
    );
    for err in &result.errors {
        tracing::debug!(error = %err, "Feed failure");
    }
}

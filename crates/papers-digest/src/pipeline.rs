//! Digest pipeline - orchestrates the fetch-render-send flow.

use chrono::{DateTime, Local, Utc};

use crate::config::DigestConfig;
use crate::digest::{CategoryDigest, DigestRenderer};
use crate::feed::{FeedFetcher, RecencyWindow};
use crate::notify::{DeliveryOutcome, Notifier};

/// Result of a single run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Feeds fetched and parsed.
    pub feeds_fetched: usize,
    /// Feeds that failed and contributed nothing.
    pub feeds_failed: usize,
    /// Articles inside the recency window, across all categories.
    pub articles: usize,
    /// One line per failed feed.
    pub errors: Vec<String>,
    /// Delivery outcome, `None` when there was nothing to send.
    pub delivery: Option<DeliveryOutcome>,
}

/// Subject and body ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDigest {
    pub subject: String,
    pub html: String,
}

/// Digest pipeline orchestrator.
pub struct Pipeline {
    config: DigestConfig,
    fetcher: FeedFetcher,
    renderer: DigestRenderer,
}

impl Pipeline {
    /// Create a new pipeline.
    #[must_use]
    pub fn new(config: DigestConfig, fetcher: FeedFetcher) -> Self {
        let renderer =
            DigestRenderer::new(config.title.clone()).with_display_names(config.display_names());
        Self {
            config,
            fetcher,
            renderer,
        }
    }

    /// The window every feed in a run started at `now` is filtered with.
    #[must_use]
    pub fn window(&self, now: DateTime<Utc>) -> RecencyWindow {
        RecencyWindow::ending_at(now, self.config.window_hours)
    }

    /// Fetch every configured feed in order and group the recent articles.
    ///
    /// A failing feed is logged, recorded in `result` and skipped.
    pub async fn collect(&self, window: &RecencyWindow, result: &mut RunResult) -> CategoryDigest {
        let mut digest = CategoryDigest::new();

        for category in &self.config.categories {
            tracing::info!(
                category = %category.name,
                feeds = category.feeds.len(),
                "Processing category"
            );
            digest.extend(&category.name, Vec::new());

            for url in &category.feeds {
                match self.fetcher.fetch(url, window).await {
                    Ok(articles) => {
                        result.feeds_fetched += 1;
                        tracing::debug!(url = %url, recent = articles.len(), "Fetched feed");
                        digest.extend(&category.name, articles);
                    }
                    Err(e) => {
                        result.feeds_failed += 1;
                        tracing::warn!(
                            category = %category.name,
                            url = %url,
                            error = %e,
                            "Failed to fetch feed"
                        );
                        result.errors.push(format!("{url}: {e}"));
                    }
                }
            }
        }

        digest.sort_newest_first();
        result.articles = digest.total_articles();
        digest
    }

    /// Render the digest with the local date of `now`.
    #[must_use]
    pub fn render(&self, digest: &CategoryDigest, now: DateTime<Utc>) -> RenderedDigest {
        let date = now.with_timezone(&Local).date_naive();
        RenderedDigest {
            subject: self.renderer.heading(date),
            html: self.renderer.render(digest, date),
        }
    }

    /// Run one fetch-render-send cycle. Nothing is sent when no feed had
    /// recent articles.
    pub async fn run(&self, notifier: &Notifier, now: DateTime<Utc>) -> RunResult {
        let mut result = RunResult::default();
        let window = self.window(now);

        tracing::info!(
            categories = self.config.categories.len(),
            window_hours = window.hours(),
            cutoff = %window.cutoff(),
            "Starting fetch job"
        );

        let digest = self.collect(&window, &mut result).await;

        tracing::info!(
            fetched = result.feeds_fetched,
            failed = result.feeds_failed,
            articles = result.articles,
            "Fetch job complete"
        );

        if digest.is_empty() {
            tracing::info!("No new articles found, no email will be sent");
            return result;
        }

        let rendered = self.render(&digest, now);
        tracing::info!(
            articles = result.articles,
            subject = %rendered.subject,
            "Preparing digest email"
        );
        result.delivery = Some(notifier.send(&rendered.subject, &rendered.html).await);

        result
    }
}

//! Normalized feed entries and the recency window.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Display format for publication timestamps. Lexicographic order on this
/// format matches chronological order.
pub const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A recent feed entry, normalized across feed formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    title: String,
    link: String,
    published: DateTime<Utc>,
}

impl Article {
    /// Create an article. The timestamp is truncated to the minute.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        let published = published
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(published);

        Self {
            title: title.into(),
            link: link.into(),
            published,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published(&self) -> DateTime<Utc> {
        self.published
    }

    /// Publication time as `YYYY-MM-DD HH:MM` (UTC).
    pub fn published_display(&self) -> String {
        self.published.format(PUBLISHED_FORMAT).to_string()
    }
}

/// Trailing time window used to decide whether an entry is new.
///
/// The cutoff is fixed when the window is created, so every feed in a run is
/// judged against the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    hours: u32,
    cutoff: DateTime<Utc>,
}

impl RecencyWindow {
    /// Window of `hours` ending at `now`.
    pub fn ending_at(now: DateTime<Utc>, hours: u32) -> Self {
        Self {
            hours,
            cutoff: now - Duration::hours(i64::from(hours)),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Inclusive at the cutoff.
    pub fn contains(&self, published: DateTime<Utc>) -> bool {
        published >= self.cutoff
    }
}

//! Feed retrieval and recency filtering.

use std::time::Duration;

use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use reqwest::Client;
use url::Url;

use super::article::{Article, RecencyWindow};
use crate::error::FetchError;

const UNTITLED: &str = "Untitled";

/// Fetches feeds one at a time over a shared HTTP client.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Build a fetcher. Requests have no timeout unless one is given.
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetch `url` and return the entries published inside `window`, in feed order.
    pub async fn fetch(
        &self,
        url: &Url,
        window: &RecencyWindow,
    ) -> Result<Vec<Article>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;
        let total = feed.entries.len();

        let articles = select_recent(feed.entries, window);
        tracing::debug!(
            url = %url,
            total,
            recent = articles.len(),
            "Parsed feed"
        );

        Ok(articles)
    }
}

/// Keep entries whose publication date falls inside `window`.
///
/// Entries without a publication date or without a link are dropped.
pub fn select_recent(entries: Vec<Entry>, window: &RecencyWindow) -> Vec<Article> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let published = entry.published?;
            if !window.contains(published) {
                return None;
            }

            let Some(link) = entry_link(&entry.links) else {
                tracing::debug!(id = %entry.id, "Skipping entry without a link");
                return None;
            };

            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());

            Some(Article::new(title, link, published))
        })
        .collect()
}

/// The entry's page: the first `alternate` (or untyped) link, else the first link.
fn entry_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn atom_entry(id: &str, title: &str, published: Option<DateTime<Utc>>) -> String {
        let published = published
            .map(|p| format!("<published>{}</published>", p.to_rfc3339()))
            .unwrap_or_default();
        format!(
            r#"<entry>
    <id>{id}</id>
    <title>{title}</title>
    <link href="https://example.com/{id}"/>
    <updated>{updated}</updated>
    {published}
</entry>"#,
            updated = now().to_rfc3339(),
        )
    }

    fn parse_atom(entries: &[String]) -> Vec<Entry> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
<id>urn:test</id>
<title>Test</title>
<updated>{}</updated>
{}
</feed>"#,
            now().to_rfc3339(),
            entries.join("\n")
        );
        parser::parse(xml.as_bytes()).unwrap().entries
    }

    #[test]
    fn test_excludes_entries_older_than_window() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entries = parse_atom(&[
            atom_entry("fresh", "Fresh", Some(now() - chrono::Duration::hours(2))),
            atom_entry("stale", "Stale", Some(now() - chrono::Duration::hours(30))),
        ]);

        let articles = select_recent(entries, &window);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Fresh");
        assert_eq!(articles[0].link(), "https://example.com/fresh");
    }

    #[test]
    fn test_boundary_entry_is_included() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entries = parse_atom(&[atom_entry("edge", "Edge", Some(window.cutoff()))]);

        assert_eq!(select_recent(entries, &window).len(), 1);
    }

    #[test]
    fn test_skips_entries_without_published_date() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entries = parse_atom(&[
            atom_entry("undated", "Undated", None),
            atom_entry("dated", "Dated", Some(now())),
        ]);

        let articles = select_recent(entries, &window);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Dated");
    }

    #[test]
    fn test_preserves_feed_order() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entries = parse_atom(&[
            atom_entry("older", "Older", Some(now() - chrono::Duration::hours(5))),
            atom_entry("newer", "Newer", Some(now() - chrono::Duration::hours(1))),
        ]);

        let titles: Vec<_> = select_recent(entries, &window)
            .iter()
            .map(|a| a.title().to_string())
            .collect();

        assert_eq!(titles, vec!["Older", "Newer"]);
    }

    #[test]
    fn test_prefers_alternate_link() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entry = format!(
            r#"<entry>
    <id>urn:paper</id>
    <title>Paper</title>
    <link rel="enclosure" type="application/pdf" href="https://x.example/paper.pdf"/>
    <link rel="alternate" type="text/html" href="https://x.example/paper"/>
    <updated>{ts}</updated>
    <published>{ts}</published>
</entry>"#,
            ts = now().to_rfc3339(),
        );

        let articles = select_recent(parse_atom(&[entry]), &window);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link(), "https://x.example/paper");
    }

    #[test]
    fn test_falls_back_to_first_link() {
        let window = RecencyWindow::ending_at(now(), 24);
        let entry = format!(
            r#"<entry>
    <id>urn:related</id>
    <title>Related only</title>
    <link rel="related" href="https://x.example/related"/>
    <link rel="self" href="https://x.example/self"/>
    <updated>{ts}</updated>
    <published>{ts}</published>
</entry>"#,
            ts = now().to_rfc3339(),
        );

        let articles = select_recent(parse_atom(&[entry]), &window);

        assert_eq!(articles[0].link(), "https://x.example/related");
    }

    #[test]
    fn test_rss_pub_date() {
        let window = RecencyWindow::ending_at(now(), 24);
        let published = now() - chrono::Duration::minutes(90);
        let xml = format!(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test</title>
    <item>
        <title>RSS item</title>
        <link>https://example.com/rss-item</link>
        <pubDate>{}</pubDate>
    </item>
</channel></rss>"#,
            published.to_rfc2822()
        );
        let entries = parser::parse(xml.as_bytes()).unwrap().entries;

        let articles = select_recent(entries, &window);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link(), "https://example.com/rss-item");
        assert_eq!(articles[0].published_display(), "2026-10-19 10:30");
    }
}

//! Digest aggregation and rendering.
//!
//! Articles are grouped per category in configuration order and rendered as
//! a single HTML email body.

mod generator;

pub use generator::{title_case, DigestRenderer};

use crate::feed::Article;

/// Articles grouped by category, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDigest {
    sections: Vec<(String, Vec<Article>)>,
}

impl CategoryDigest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append articles to a category, creating it at the end if it is new.
    pub fn extend(&mut self, category: &str, articles: impl IntoIterator<Item = Article>) {
        if let Some((_, existing)) = self.sections.iter_mut().find(|(name, _)| name == category) {
            existing.extend(articles);
        } else {
            self.sections
                .push((category.to_string(), articles.into_iter().collect()));
        }
    }

    /// Sort every category newest first.
    pub fn sort_newest_first(&mut self) {
        for (_, articles) in &mut self.sections {
            sort_newest_first(articles);
        }
    }

    /// Categories with their articles, in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Article])> {
        self.sections
            .iter()
            .map(|(name, articles)| (name.as_str(), articles.as_slice()))
    }

    /// Articles for one category.
    pub fn get(&self, category: &str) -> Option<&[Article]> {
        self.sections
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, articles)| articles.as_slice())
    }

    /// Total number of articles across all categories.
    #[must_use]
    pub fn total_articles(&self) -> usize {
        self.sections.iter().map(|(_, a)| a.len()).sum()
    }

    /// True when no category holds an article.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_articles() == 0
    }
}

/// Stable sort by display timestamp, descending.
pub(crate) fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_key(|a| std::cmp::Reverse(a.published_display()));
}

//! Feed fetching module.
//!
//! Downloads RSS/Atom feeds and keeps the entries published inside the
//! recency window.

mod article;
mod fetcher;

pub use article::{Article, RecencyWindow, PUBLISHED_FORMAT};
pub use fetcher::{select_recent, FeedFetcher};

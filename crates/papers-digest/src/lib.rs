//! Academic feed digest.
//!
//! This crate provides:
//! - RSS/Atom fetching with a per-run recency window
//! - Per-category aggregation and HTML rendering
//! - Email delivery of the rendered digest over SMTPS

pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod notify;
pub mod pipeline;

// Re-export main types
pub use config::{CategoryConfig, DigestConfig, EmailConfig, FeedSource};
pub use digest::{CategoryDigest, DigestRenderer};
pub use error::{ConfigError, DeliveryError, FetchError};
pub use feed::{Article, FeedFetcher, RecencyWindow};
pub use notify::{DeliveryOutcome, DigestChannel, Notifier, SmtpChannel};
pub use pipeline::{Pipeline, RenderedDigest, RunResult};

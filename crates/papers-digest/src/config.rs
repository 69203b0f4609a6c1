//! Configuration for the digest run.
//!
//! Feed sources, recipients and rendering options come from a TOML document.
//! SMTP credentials come from the environment.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Default SMTPS port (implicit TLS).
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Default recency window in hours.
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Default digest title, used for the top-level heading and the subject.
pub const DEFAULT_TITLE: &str = "Papers Update";

/// Configuration document compiled into the binary.
pub const BUILTIN_CONFIG: &str = include_str!("../config/feeds.toml");

const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
const ENV_SMTP_PORT: &str = "SMTP_PORT";
const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestConfig {
    /// Heading text and subject prefix.
    #[serde(default = "default_title")]
    pub title: String,
    /// Entries older than this many hours are dropped.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// Per-request HTTP timeout. Unbounded when absent.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    /// HTTP `User-Agent` override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Digest recipients.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Categories in render order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// One category and its feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Category key.
    pub name: String,
    /// Heading override. The title-cased key is used when absent.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Feed URLs, fetched in order.
    #[serde(default)]
    pub feeds: Vec<Url>,
}

/// A (category, feed URL) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub category: String,
    pub url: Url,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

const fn default_window_hours() -> u32 {
    DEFAULT_WINDOW_HOURS
}

impl DigestConfig {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The stock academic feed set.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_hours == 0 {
            return Err(ConfigError::Invalid(
                "window_hours must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "category name must not be empty".to_string(),
                ));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category {:?}",
                    category.name
                )));
            }
            for url in &category.feeds {
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::Invalid(format!(
                        "feed {url} in {:?} is not an http(s) URL",
                        category.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// All feed sources in category order, then feed order.
    pub fn sources(&self) -> impl Iterator<Item = FeedSource> + '_ {
        self.categories.iter().flat_map(|category| {
            category.feeds.iter().map(|url| FeedSource {
                category: category.name.clone(),
                url: url.clone(),
            })
        })
    }

    /// Heading overrides keyed by category name.
    #[must_use]
    pub fn display_names(&self) -> HashMap<String, String> {
        self.categories
            .iter()
            .filter_map(|c| c.display_name.clone().map(|d| (c.name.clone(), d)))
            .collect()
    }
}

/// SMTP credentials and recipients, fixed for the duration of a run.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_server: Option<String>,
    pub smtp_port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub receiver_emails: Vec<String>,
}

impl EmailConfig {
    /// Read transport settings from the environment.
    ///
    /// # Environment Variables
    /// - `SMTP_SERVER`: SMTPS host
    /// - `SMTP_PORT`: port (default: 465)
    /// - `SENDER_EMAIL`: login and `From` address
    /// - `SENDER_PASSWORD`: login password
    ///
    /// Missing host or credentials are not an error here; they surface when
    /// the digest is sent.
    pub fn from_env(receiver_emails: Vec<String>) -> Result<Self, ConfigError> {
        let smtp_port = match env_non_empty(ENV_SMTP_PORT) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Port(raw.clone()))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            smtp_server: env_non_empty(ENV_SMTP_SERVER),
            smtp_port,
            sender_email: env_non_empty(ENV_SENDER_EMAIL),
            sender_password: env_non_empty(ENV_SENDER_PASSWORD),
            receiver_emails,
        })
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("sender_email", &self.sender_email)
            .field(
                "sender_password",
                &self.sender_password.as_ref().map(|_| "<redacted>"),
            )
            .field("receiver_emails", &self.receiver_emails)
            .finish()
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

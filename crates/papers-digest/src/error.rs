//! Error types for the digest pipeline.
//!
//! Each failure domain gets its own enum. Fetch and delivery errors are
//! logged and absorbed by the pipeline; only [`ConfigError`] ends the process.

use thiserror::Error;

/// Errors raised while fetching or parsing a single feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Body was not a recognizable RSS/Atom/JSON feed
    #[error("feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Errors raised while delivering the digest email.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A required transport setting was not provided
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// Sender or recipient address could not be parsed
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    /// The message itself could not be assembled
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Could not reach the server or negotiate TLS
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server rejected the credentials
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Server rejected a command or answered with something unexpected
    #[error("SMTP protocol error: {0}")]
    Protocol(String),
}

impl DeliveryError {
    /// Classify a transport error.
    ///
    /// SMTP reply codes 530, 534 and 535 are authentication failures. Any
    /// other reply or client-side protocol failure is a protocol error, and
    /// everything below the protocol (socket, TLS, timeouts) is a connection
    /// error.
    pub fn from_smtp(err: &lettre::transport::smtp::Error) -> Self {
        if let Some(code) = err.status() {
            if code.to_string().starts_with("53") {
                return Self::Auth(err.to_string());
            }
            return Self::Protocol(err.to_string());
        }
        if err.is_response() || err.is_client() {
            Self::Protocol(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("SMTP_PORT must be a port number, got {0:?}")]
    Port(String),
}

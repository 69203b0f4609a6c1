//! Configuration loading from files and the environment.

use std::io::Write;

use serial_test::serial;

use papers_digest::config::DEFAULT_SMTP_PORT;
use papers_digest::{ConfigError, DigestConfig, EmailConfig};

const SMTP_VARS: [&str; 4] = ["SMTP_SERVER", "SMTP_PORT", "SENDER_EMAIL", "SENDER_PASSWORD"];

fn clear_smtp_env() {
    for var in SMTP_VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
title = "Lab Reading List"
window_hours = 48
fetch_timeout_secs = 20
recipients = ["a@example.com", "b@example.com"]

[[categories]]
name = "blogs"
display_name = "Blog Posts"
feeds = ["https://blog.example/rss"]

[[categories]]
name = "preprints"
feeds = ["https://preprints.example/atom", "https://preprints.example/rss"]
"#
    )
    .unwrap();

    let config = DigestConfig::load(file.path()).unwrap();

    assert_eq!(config.title, "Lab Reading List");
    assert_eq!(config.window_hours, 48);
    assert_eq!(config.fetch_timeout_secs, Some(20));
    assert_eq!(config.recipients, vec!["a@example.com", "b@example.com"]);
    assert_eq!(
        config.categories[0].display_name.as_deref(),
        Some("Blog Posts")
    );
    assert_eq!(config.sources().count(), 3);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DigestConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = DigestConfig::from_toml_str("recipient = \"typo@example.com\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
#[serial]
fn test_email_config_defaults() {
    clear_smtp_env();

    let config = EmailConfig::from_env(vec!["r@example.com".to_string()]).unwrap();

    assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
    assert_eq!(config.smtp_port, 465);
    assert!(config.smtp_server.is_none());
    assert!(config.sender_email.is_none());
    assert!(config.sender_password.is_none());
    assert_eq!(config.receiver_emails, vec!["r@example.com"]);
}

#[test]
#[serial]
fn test_email_config_reads_environment() {
    clear_smtp_env();
    std::env::set_var("SMTP_SERVER", "smtp.example.com");
    std::env::set_var("SMTP_PORT", "2465");
    std::env::set_var("SENDER_EMAIL", "digest@example.com");
    std::env::set_var("SENDER_PASSWORD", "app-password");

    let config = EmailConfig::from_env(Vec::new()).unwrap();
    clear_smtp_env();

    assert_eq!(config.smtp_server.as_deref(), Some("smtp.example.com"));
    assert_eq!(config.smtp_port, 2465);
    assert_eq!(config.sender_email.as_deref(), Some("digest@example.com"));
    assert_eq!(config.sender_password.as_deref(), Some("app-password"));
}

#[test]
#[serial]
fn test_email_config_rejects_bad_port() {
    clear_smtp_env();
    std::env::set_var("SMTP_PORT", "smtps");

    let err = EmailConfig::from_env(Vec::new()).unwrap_err();
    clear_smtp_env();

    assert!(matches!(err, ConfigError::Port(p) if p == "smtps"));
}

#[test]
#[serial]
fn test_empty_env_values_count_as_unset() {
    clear_smtp_env();
    std::env::set_var("SMTP_SERVER", "");
    std::env::set_var("SMTP_PORT", "");

    let config = EmailConfig::from_env(Vec::new()).unwrap();
    clear_smtp_env();

    assert!(config.smtp_server.is_none());
    assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
}

//! Digest delivery.
//!
//! [`Notifier`] owns a single [`DigestChannel`] and never propagates delivery
//! errors: a failed send is logged and reported as a [`DeliveryOutcome`].

mod email;

pub use email::{build_message, SmtpChannel};

use async_trait::async_trait;

use crate::error::DeliveryError;

/// A destination for the rendered digest.
#[async_trait]
pub trait DigestChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Addresses the digest goes to.
    fn recipients(&self) -> &[String];

    /// Deliver one message to every recipient.
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), DeliveryError>;
}

/// What happened to the digest.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// Accepted by the server for this many recipients.
    Sent { recipients: usize },
    /// Nobody to send to, no connection was made.
    NoRecipients,
    /// Delivery failed. The error has already been logged.
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Sends the digest through a channel, absorbing failures.
pub struct Notifier {
    channel: Box<dyn DigestChannel>,
}

impl Notifier {
    #[must_use]
    pub fn new(channel: Box<dyn DigestChannel>) -> Self {
        Self { channel }
    }

    /// Send `html_body` to every recipient of the channel.
    ///
    /// With no recipients this returns without touching the channel.
    pub async fn send(&self, subject: &str, html_body: &str) -> DeliveryOutcome {
        let channel = self.channel.name();
        let recipients = self.channel.recipients();

        if recipients.is_empty() {
            tracing::info!(channel, "No recipients configured, skipping email");
            return DeliveryOutcome::NoRecipients;
        }

        tracing::info!(channel, recipients = recipients.len(), "Sending digest");

        match self.channel.send(subject, html_body).await {
            Ok(()) => {
                tracing::info!(
                    channel,
                    to = %recipients.join(", "),
                    subject,
                    "Digest sent successfully"
                );
                DeliveryOutcome::Sent {
                    recipients: recipients.len(),
                }
            }
            Err(e) => {
                match &e {
                    DeliveryError::Auth(_) => {
                        tracing::error!(
                            channel,
                            error = %e,
                            "SMTP authentication failed, digest not sent"
                        );
                    }
                    DeliveryError::Connection(_) => {
                        tracing::error!(
                            channel,
                            error = %e,
                            "Could not reach SMTP server, digest not sent"
                        );
                    }
                    _ => {
                        tracing::error!(channel, error = %e, "Failed to send digest");
                    }
                }
                DeliveryOutcome::Failed(e)
            }
        }
    }
}

//! Email delivery over SMTPS.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::DigestChannel;
use crate::config::EmailConfig;
use crate::error::DeliveryError;

/// Sends the digest as one HTML email over implicit-TLS SMTP.
pub struct SmtpChannel {
    config: EmailConfig,
}

impl SmtpChannel {
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DigestChannel for SmtpChannel {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn recipients(&self) -> &[String] {
        &self.config.receiver_emails
    }

    async fn send(&self, subject: &str, html_body: &str) -> Result<(), DeliveryError> {
        let host = self
            .config
            .smtp_server
            .as_deref()
            .ok_or(DeliveryError::MissingSetting("SMTP_SERVER"))?;
        let sender = self
            .config
            .sender_email
            .as_deref()
            .ok_or(DeliveryError::MissingSetting("SENDER_EMAIL"))?;
        let password = self
            .config
            .sender_password
            .clone()
            .ok_or(DeliveryError::MissingSetting("SENDER_PASSWORD"))?;

        let email = build_message(sender, &self.config.receiver_emails, subject, html_body)?;

        // No connection pool: the session opens and closes inside this call.
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| DeliveryError::from_smtp(&e))?
                .port(self.config.smtp_port)
                .credentials(Credentials::new(sender.to_string(), password))
                .build();

        tracing::debug!(
            host,
            port = self.config.smtp_port,
            "Connecting to SMTP server"
        );

        mailer
            .send(email)
            .await
            .map_err(|e| DeliveryError::from_smtp(&e))?;

        Ok(())
    }
}

/// Build one `text/html` message addressed to every recipient.
pub fn build_message(
    sender: &str,
    recipients: &[String],
    subject: &str,
    html_body: &str,
) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .subject(subject)
        .header(ContentType::TEXT_HTML);

    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    Ok(builder.body(html_body.to_string())?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| DeliveryError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

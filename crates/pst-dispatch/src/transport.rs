//! Delivery boundary.

use crate::DispatchError;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use pst_config::SmtpConfig;

/// Filename of the CSV attachment on every report mail.
pub const ATTACHMENT_NAME: &str = "paidStatements.csv";
/// Plain-text body accompanying the attachment.
pub const MESSAGE_BODY: &str = "Yesterday's paid statements";

/// Report delivery contract: one serialized artifact, one destination
/// list, one subject, one synchronous-from-the-pipeline's-view send.
/// Raises on failure; implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable name identifying this transport (e.g. `"smtp"`).
    fn name(&self) -> &'static str;

    async fn send(
        &self,
        artifact: &[u8],
        recipients: &[String],
        subject: &str,
    ) -> Result<(), DispatchError>;
}

/// STARTTLS SMTP implementation of [`Transport`]. The authenticated
/// username is also the sender address.
#[derive(Debug)]
pub struct SmtpSender {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpSender {
    pub fn new(config: &SmtpConfig) -> Result<SmtpSender, DispatchError> {
        let from: Mailbox =
            config
                .username
                .parse()
                .map_err(|e: lettre::address::AddressError| DispatchError::BadAddress {
                    address: config.username.clone(),
                    message: e.to_string(),
                })?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DispatchError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(SmtpSender { from, mailer })
    }

    fn build_message(
        &self,
        artifact: &[u8],
        recipients: &[String],
        subject: &str,
    ) -> Result<Message, DispatchError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in recipients {
            let mailbox: Mailbox =
                recipient
                    .parse()
                    .map_err(|e: lettre::address::AddressError| DispatchError::BadAddress {
                        address: recipient.clone(),
                        message: e.to_string(),
                    })?;
            builder = builder.to(mailbox);
        }

        let csv_type = ContentType::parse("text/csv")
            .map_err(|e| DispatchError::Render(e.to_string()))?;

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(MESSAGE_BODY.to_string()))
                    .singlepart(
                        Attachment::new(ATTACHMENT_NAME.to_string())
                            .body(artifact.to_vec(), csv_type),
                    ),
            )
            .map_err(|e| DispatchError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Transport for SmtpSender {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(
        &self,
        artifact: &[u8],
        recipients: &[String],
        subject: &str,
    ) -> Result<(), DispatchError> {
        let message = self.build_message(artifact, recipients, subject)?;
        self.mailer
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SmtpSender {
        SmtpSender::new(&SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "reports@example.com".to_string(),
            password: "pw".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn builds_message_with_csv_attachment() {
        let message = sender()
            .build_message(
                b"sale,net\nPM001,\"1,234.50\"\n",
                &["pm@example.com".to_string()],
                "PM Payments Raised Yesterday",
            )
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: PM Payments Raised Yesterday"));
        assert!(raw.contains("To: pm@example.com"));
        assert!(raw.contains(ATTACHMENT_NAME));
    }

    #[test]
    fn malformed_recipient_is_rejected_before_any_send() {
        let err = sender()
            .build_message(b"", &["not an address".to_string()], "x")
            .unwrap_err();
        assert!(matches!(err, DispatchError::BadAddress { .. }));
    }

    #[test]
    fn malformed_sender_is_rejected_at_construction() {
        let err = SmtpSender::new(&SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "not an address".to_string(),
            password: "pw".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, DispatchError::BadAddress { .. }));
    }
}

//! Outgoing mail relay.
//!
//! Wraps an async SMTP transport behind a small client the handlers share
//! through `AppState`. Notices are plain text; the admin UI composes the
//! subject and body.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from: Mailbox = config.from.parse()?;
        Ok(Mailer { transport, from })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = build_message(&self.from, to, subject, body)?;

        match self.transport.send(message).await {
            Ok(response) => {
                info!("email sent to {}: {:?}", to, response.code());
                Ok(())
            }
            Err(e) => {
                error!("failed to send email to {}: {:?}", to, e);
                Err(e.into())
            }
        }
    }
}

fn build_message(
    from: &Mailbox,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from() -> Mailbox {
        "bookings@example.edu".parse().unwrap()
    }

    #[test]
    fn builds_a_plain_text_message() {
        let msg = build_message(
            &from(),
            "rao@example.edu",
            "Booking accepted",
            "Your booking for Main Auditorium was accepted.",
        )
        .unwrap();

        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Subject: Booking accepted"));
        assert!(raw.contains("To: rao@example.edu"));
        assert!(raw.contains("Main Auditorium"));
    }

    #[test]
    fn rejects_a_malformed_recipient() {
        let result = build_message(&from(), "not-an-address", "s", "b");
        assert!(matches!(result, Err(MailError::Address(_))));
    }
}

//! SMTP delivery of the rendered digest.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::info;

use crate::{cli::SmtpConfig, error::DeliveryError, report::ReportFormat, types::Repo};

/// Subject line for the weekly digest email.
pub fn subject(repo: &Repo) -> String {
    format!("Weekly Update: GitHub Pull Requests for {repo}")
}

/// Sends the digest over an implicit-TLS SMTP session.
///
/// The From address is the authenticated username and there is a single
/// recipient. One message per run; the connection is established for the
/// send and torn down afterwards, and a failed send is not retried.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let from = config.username.parse::<Mailbox>()?;
        let to = config.recipient.parse::<Mailbox>()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Assembles and sends a single-part message carrying the report body.
    pub async fn send(
        &self,
        subject: &str,
        body: String,
        format: ReportFormat,
    ) -> Result<(), DeliveryError> {
        let content_type = match format {
            ReportFormat::Text => ContentType::TEXT_PLAIN,
            ReportFormat::Html => ContentType::TEXT_HTML,
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(content_type)
            .body(body)?;

        self.transport.send(message).await?;
        info!(to = %self.to, subject, "digest email sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_names_the_repository() {
        let repo = Repo::new("m3db", "m3").expect("valid repo");
        assert_eq!(
            subject(&repo),
            "Weekly Update: GitHub Pull Requests for m3db/m3"
        );
    }

    #[test]
    fn mailer_rejects_unparsable_addresses() {
        let config = SmtpConfig {
            server: "smtp.example.com".to_string(),
            port: 465,
            username: "not an address".to_string(),
            password: "hunter2".to_string(),
            recipient: "team@example.com".to_string(),
        };

        assert!(matches!(
            Mailer::new(&config),
            Err(DeliveryError::Address(_))
        ));
    }
}

/// Best-effort transactional mail
///
/// A thin JSON client for the SendGrid v3 send endpoint. The mailer is
/// constructed from explicit configuration rather than process-global state,
/// and it degrades to a logged no-op when no API key is configured, so
/// development and test environments never need mail credentials.
///
/// Sends are best-effort: callers fire them from a spawned task and the
/// user-facing response never waits on or fails with the mail provider.
use serde_json::json;

/// Configuration for the mail client
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Provider API key
    pub api_key: String,

    /// Verified sender address
    pub sender: String,
}

/// Error type for mail operations
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Transport-level failure
    #[error("Mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider rejected the send
    #[error("Mail provider returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

const SEND_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Transactional mail client.
///
/// Cheap to clone; holds a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: Option<MailConfig>,
}

impl Mailer {
    /// Creates a mailer from optional configuration.
    ///
    /// With `None` every send becomes a logged no-op.
    pub fn new(config: Option<MailConfig>) -> Self {
        if config.is_none() {
            tracing::info!("mail API key not configured, outgoing mail disabled");
        }

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Sends the signup welcome message.
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), MailError> {
        self.send(
            to,
            "Thanks for joining in!",
            &format!(
                "Welcome to the app, {}. Let me know how you get along with the app.",
                name
            ),
        )
        .await
    }

    /// Sends the account-cancellation message.
    pub async fn send_cancellation(&self, to: &str, name: &str) -> Result<(), MailError> {
        self.send(
            to,
            "Sorry to see you go",
            &format!(
                "Thanks for using our app. We hope to see you again, {}.",
                name
            ),
        )
        .await
    }

    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            tracing::debug!(to, subject, "mail disabled, dropping message");
            return Ok(());
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": config.sender },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": text }],
        });

        let response = self
            .client
            .post(SEND_ENDPOINT)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_mailer_is_a_noop() {
        let mailer = Mailer::new(None);
        mailer
            .send_welcome("andrew@example.com", "Andrew")
            .await
            .unwrap();
        mailer
            .send_cancellation("andrew@example.com", "Andrew")
            .await
            .unwrap();
    }
}

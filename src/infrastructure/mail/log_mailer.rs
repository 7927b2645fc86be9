//! Log Mailer
//!
//! Development mailer that writes every mail to the tracing log.

use async_trait::async_trait;

use crate::domain::{MailContent, MailError, Mailer};

/// Mailer that never leaves the process.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &MailContent) -> Result<(), MailError> {
        tracing::info!(
            from = %self.from,
            to = %mail.to,
            subject = %mail.subject,
            "Mail (log driver)"
        );
        tracing::debug!(body = %mail.body, "Mail body");
        Ok(())
    }
}

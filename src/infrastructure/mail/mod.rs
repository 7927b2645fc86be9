//! Mail Transports
//!
//! `Mailer` implementations and the configured selection between them.

mod http_mailer;
mod log_mailer;

use std::time::Duration;

use async_trait::async_trait;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;

use crate::config::{MailDriver, MailSettings};
use crate::domain::{MailContent, MailError, Mailer};

/// The mailer chosen by `mail.driver`.
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    Log(LogMailer),
    Http(HttpMailer),
}

#[async_trait]
impl Mailer for ConfiguredMailer {
    async fn send(&self, mail: &MailContent) -> Result<(), MailError> {
        match self {
            ConfiguredMailer::Log(mailer) => mailer.send(mail).await,
            ConfiguredMailer::Http(mailer) => mailer.send(mail).await,
        }
    }
}

/// Build the mailer described by the mail settings.
pub fn build_mailer(settings: &MailSettings) -> Result<ConfiguredMailer, MailError> {
    match settings.driver {
        MailDriver::Log => Ok(ConfiguredMailer::Log(LogMailer::new(&settings.from))),
        MailDriver::Http => {
            let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
                MailError::Configuration("mail.endpoint is required for the http driver".into())
            })?;
            let mailer = HttpMailer::new(
                endpoint,
                settings.api_key.clone(),
                &settings.from,
                Duration::from_secs(settings.timeout_secs),
            )?;
            Ok(ConfiguredMailer::Http(mailer))
        }
    }
}

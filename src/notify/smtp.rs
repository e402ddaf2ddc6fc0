// src/notify/smtp.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

use super::message::{OutgoingMail, to_message};
use super::secrets::Secret;
use crate::types::SmtpSecurity;

/// Connection details for the SMTP relay.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub timeout: Duration,
    pub username: Secret,
    pub password: Secret,
}

/// Trait abstracting how mail leaves the process.
///
/// Production code uses [`SmtpMailer`]; tests record the mail instead.
pub trait Mailer: Send + Sync {
    fn send<'a>(
        &'a self,
        relay: &'a RelaySettings,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Sends mail through an authenticated SMTP relay using `lettre`.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Mailer for SmtpMailer {
    fn send<'a>(
        &'a self,
        relay: &'a RelaySettings,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let message = to_message(mail)?;

            let builder = match relay.security {
                SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&relay.host)
                    .with_context(|| format!("configuring TLS relay {}", relay.host))?,
                SmtpSecurity::Starttls => {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&relay.host)
                        .with_context(|| format!("configuring STARTTLS relay {}", relay.host))?
                }
                SmtpSecurity::None => {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&relay.host)
                }
            };

            let transport = builder
                .port(relay.port)
                .timeout(Some(relay.timeout))
                .credentials(Credentials::new(
                    relay.username.expose().to_string(),
                    relay.password.expose().to_string(),
                ))
                .build();

            transport
                .send(message)
                .await
                .with_context(|| format!("sending mail via {}:{}", relay.host, relay.port))?;

            info!(
                host = %relay.host,
                port = relay.port,
                recipients = mail.to.len(),
                attachments = mail.attachments.len(),
                "mail accepted by relay"
            );
            Ok(())
        })
    }
}

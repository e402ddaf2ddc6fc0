// src/notify/mod.rs

//! Email notification: the invoice mail and the optional failure alert.
//!
//! - [`secrets`]: addresses and credentials from the environment.
//! - [`message`]: the transport-independent mail and its `lettre` form.
//! - [`smtp`]: the [`Mailer`] trait and the SMTP implementation.

pub mod message;
pub mod secrets;
pub mod smtp;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::artifacts::Artifact;
use crate::config::NotifyConfig;
use crate::fs::FileSystem;

pub use message::{MailAttachment, OutgoingMail, content_type_for, parse_recipients, to_message};
pub use secrets::{EnvSecrets, Secret, SecretSource};
pub use smtp::{Mailer, RelaySettings, SmtpMailer};

/// Resolve relay connection details, reading credentials from `secrets`.
pub fn relay_settings(cfg: &NotifyConfig, secrets: &dyn SecretSource) -> Result<RelaySettings> {
    Ok(RelaySettings {
        host: cfg.smtp_host.clone(),
        port: cfg.smtp_port,
        security: cfg.security,
        timeout: Duration::from_secs(cfg.timeout_secs),
        username: secrets.require(&cfg.username_env)?,
        password: secrets.require(&cfg.password_env)?,
    })
}

fn recipients_from(secrets: &dyn SecretSource, env_name: &str) -> Result<Vec<String>> {
    let raw = secrets.require(env_name)?;
    let recipients = parse_recipients(raw.expose());
    if recipients.is_empty() {
        return Err(anyhow!("environment variable {env_name} lists no recipients"));
    }
    Ok(recipients)
}

/// The invoice email: fixed subject and body, one attachment per artifact.
pub fn build_invoice_mail(
    cfg: &NotifyConfig,
    secrets: &dyn SecretSource,
    fs: &dyn FileSystem,
    artifacts: &[Artifact],
) -> Result<OutgoingMail> {
    if artifacts.is_empty() {
        return Err(anyhow!("no artifact to attach"));
    }

    let from = secrets.require(&cfg.sender_env)?;
    let to = recipients_from(secrets, &cfg.recipient_env)?;

    let mut attachments = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let content = fs
            .read(&artifact.path)
            .with_context(|| format!("reading attachment {:?}", artifact.path))?;
        attachments.push(MailAttachment {
            file_name: artifact.file_name.clone(),
            content_type: content_type_for(&artifact.path).to_string(),
            content,
        });
    }

    Ok(OutgoingMail {
        from: from.expose().to_string(),
        to,
        subject: cfg.subject.clone(),
        body: cfg.body.clone(),
        attachments,
    })
}

/// The alert sent when a step after the gate fails. No attachments.
pub fn build_failure_alert(
    cfg: &NotifyConfig,
    secrets: &dyn SecretSource,
    failed_step: &str,
    error: &str,
) -> Result<OutgoingMail> {
    let from = secrets.require(&cfg.sender_env)?;
    let to = recipients_from(secrets, cfg.on_failure.effective_recipient_env(cfg))?;

    let body = format!(
        "The monthly invoice run failed.\n\nFailed step: {failed_step}\nError: {error}\n\nNo invoice was sent."
    );

    Ok(OutgoingMail {
        from: from.expose().to_string(),
        to,
        subject: cfg.on_failure.subject.clone(),
        body,
        attachments: Vec::new(),
    })
}

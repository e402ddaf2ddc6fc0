// src/notify/message.rs

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

/// An email ready to hand to a [`super::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl std::fmt::Debug for MailAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// MIME type for an attachment, chosen by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "pdf" => "application/pdf",
        "odt" => "application/vnd.oasis.opendocument.text",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

/// Split a comma/semicolon separated recipient list.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert into a `lettre` message.
///
/// Without attachments the body is sent as a single `text/plain` part;
/// otherwise as `multipart/mixed` with the text first.
pub fn to_message(mail: &OutgoingMail) -> Result<Message> {
    if mail.to.is_empty() {
        return Err(anyhow!("mail has no recipients"));
    }

    let from: Mailbox = mail
        .from
        .parse()
        .with_context(|| format!("invalid sender address '{}'", mail.from))?;
    let mut builder = Message::builder().from(from).subject(mail.subject.clone());

    for to in &mail.to {
        let mailbox: Mailbox = to
            .parse()
            .with_context(|| format!("invalid recipient address '{to}'"))?;
        builder = builder.to(mailbox);
    }

    if mail.attachments.is_empty() {
        return builder
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .context("building plain-text message");
    }

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    for attachment in &mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            anyhow!(
                "invalid content type '{}' for {}: {:?}",
                attachment.content_type,
                attachment.file_name,
                e
            )
        })?;
        multipart = multipart.singlepart(
            Attachment::new(attachment.file_name.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    builder
        .multipart(multipart)
        .context("building multipart message")
}

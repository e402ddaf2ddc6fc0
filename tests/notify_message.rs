mod common;

use std::path::Path;
use std::time::SystemTime;

use common::{TestResult, workspace_fs};
use invoicebot::artifacts::Artifact;
use invoicebot::notify::{
    MailAttachment, OutgoingMail, Secret, SecretSource, build_failure_alert,
    build_invoice_mail, content_type_for, parse_recipients, relay_settings, to_message,
};
use invoicebot::types::SmtpSecurity;
use invoicebot_test_utils::builders::{ConfigFileBuilder, default_secrets};
use invoicebot_test_utils::fake_secrets::StaticSecrets;

fn invoice_mail() -> OutgoingMail {
    OutgoingMail {
        from: "bot@example.com".to_string(),
        to: vec!["accounts@client.example".to_string()],
        subject: "Monthly Invoice".to_string(),
        body: "Please find attached the invoice for this month.".to_string(),
        attachments: vec![MailAttachment {
            file_name: "invoice_january_2025.docx".to_string(),
            content_type: content_type_for(Path::new("invoice_january_2025.docx")).to_string(),
            content: b"PK\x03\x04".to_vec(),
        }],
    }
}

#[test]
fn content_types_follow_the_extension() {
    assert_eq!(
        content_type_for(Path::new("invoice.docx")),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(content_type_for(Path::new("INVOICE.PDF")), "application/pdf");
    assert_eq!(content_type_for(Path::new("notes.txt")), "text/plain");
    assert_eq!(
        content_type_for(Path::new("no_extension")),
        "application/octet-stream"
    );
}

#[test]
fn recipients_split_on_commas_and_semicolons() {
    assert_eq!(
        parse_recipients(" a@x.example, b@x.example;c@x.example ;; "),
        vec!["a@x.example", "b@x.example", "c@x.example"]
    );
    assert!(parse_recipients(" , ").is_empty());
}

#[test]
fn message_with_attachment_is_multipart() -> TestResult {
    let message = to_message(&invoice_mail())?;
    let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

    assert!(raw.contains("Subject: Monthly Invoice"));
    assert!(raw.contains("multipart/mixed"));
    assert!(raw.contains("invoice_january_2025.docx"));
    assert!(raw.contains("wordprocessingml.document"));
    assert!(raw.contains("Please find attached the invoice for this month."));
    Ok(())
}

#[test]
fn message_without_attachment_is_plain_text() -> TestResult {
    let mut mail = invoice_mail();
    mail.attachments.clear();
    let raw = String::from_utf8_lossy(&to_message(&mail)?.formatted()).into_owned();

    assert!(!raw.contains("multipart/mixed"));
    assert!(raw.contains("text/plain"));
    Ok(())
}

#[test]
fn bad_addresses_are_rejected() {
    let mut mail = invoice_mail();
    mail.from = "not an address".to_string();
    let err = to_message(&mail).unwrap_err();
    assert!(format!("{err:#}").contains("invalid sender address"));

    let mut mail = invoice_mail();
    mail.to = vec!["also bad".to_string()];
    let err = to_message(&mail).unwrap_err();
    assert!(format!("{err:#}").contains("invalid recipient address"));

    let mut mail = invoice_mail();
    mail.to.clear();
    assert!(to_message(&mail).is_err());
}

#[test]
fn secrets_are_redacted_in_debug_output() -> TestResult {
    let cfg = ConfigFileBuilder::new().build();
    let relay = relay_settings(&cfg.notify, &default_secrets())?;
    let debug = format!("{relay:?}");

    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("Secret(***)"));
    assert_eq!(relay.password.expose(), "hunter2");
    assert_eq!(relay.host, "smtp.gmail.com");
    assert_eq!(relay.port, 465);
    assert_eq!(relay.security, SmtpSecurity::Tls);
    Ok(())
}

#[test]
fn missing_secret_names_the_variable_not_the_value() {
    let secrets = StaticSecrets::new().with("EMAIL_USERNAME", "bot@example.com");
    let cfg = ConfigFileBuilder::new().build();

    let err = relay_settings(&cfg.notify, &secrets).unwrap_err();
    assert_eq!(err.to_string(), "environment variable EMAIL_PASSWORD is not set");

    let blank = StaticSecrets::new().with("TOKEN", "   ");
    let err = blank.require("TOKEN").unwrap_err();
    assert!(err.to_string().contains("TOKEN is empty"));
    assert_eq!(blank.get("TOKEN"), Some(Secret::new("   ")));
}

#[test]
fn invoice_mail_attaches_every_artifact() -> TestResult {
    let fs = workspace_fs();
    fs.add_file("/work/invoice_january_2025.docx", b"jan".to_vec());
    fs.add_file("/work/invoice_january_2025.pdf", b"pdf".to_vec());
    let artifacts = vec![
        Artifact::describe(
            &fs,
            Path::new("/work/invoice_january_2025.docx"),
            SystemTime::UNIX_EPOCH,
        )?,
        Artifact::describe(
            &fs,
            Path::new("/work/invoice_january_2025.pdf"),
            SystemTime::UNIX_EPOCH,
        )?,
    ];

    let cfg = ConfigFileBuilder::new().build();
    let secrets = default_secrets().with("EMAIL_RECIPIENT", "a@client.example; b@client.example");
    let mail = build_invoice_mail(&cfg.notify, &secrets, &fs, &artifacts)?;

    assert_eq!(mail.to, vec!["a@client.example", "b@client.example"]);
    assert_eq!(mail.attachments.len(), 2);
    assert_eq!(mail.attachments[1].content_type, "application/pdf");
    assert_eq!(mail.attachments[1].content, b"pdf".to_vec());
    Ok(())
}

#[test]
fn invoice_mail_requires_an_artifact() {
    let fs = workspace_fs();
    let cfg = ConfigFileBuilder::new().build();
    let err = build_invoice_mail(&cfg.notify, &default_secrets(), &fs, &[]).unwrap_err();
    assert!(err.to_string().contains("no artifact"));
}

#[test]
fn failure_alert_uses_its_own_recipient_when_set() -> TestResult {
    let mut raw = ConfigFileBuilder::new().failure_alert(true).raw();
    raw.notify.on_failure.recipient_env = Some("OPS_EMAIL".to_string());
    let cfg = invoicebot::config::ConfigFile::try_from(raw)?;

    let secrets = default_secrets().with("OPS_EMAIL", "ops@example.com");
    let mail = build_failure_alert(
        &cfg.notify,
        &secrets,
        "install-dependencies",
        "install command exited with code 1",
    )?;

    assert_eq!(mail.to, vec!["ops@example.com"]);
    assert_eq!(mail.subject, "Invoice automation failed");
    assert!(mail.body.contains("Failed step: install-dependencies"));
    assert!(mail.body.contains("exited with code 1"));
    assert!(mail.attachments.is_empty());
    Ok(())
}

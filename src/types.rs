use std::fmt;
use std::str::FromStr;

/// Classification of the event that started a run.
///
/// Only `Manual` is restricted by the authorization gate. Unknown event
/// names are kept verbatim in `Other` and treated like any other
/// non-manual trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Calendar trigger (CI `schedule` event).
    Scheduled,
    /// On-demand dispatch by a person (CI `workflow_dispatch`).
    Manual,
    Other(String),
}

impl EventKind {
    pub fn is_manual(&self) -> bool {
        matches!(self, EventKind::Manual)
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err("event name must not be empty".to_string()),
            "schedule" | "scheduled" | "cron" => Ok(EventKind::Scheduled),
            "workflow_dispatch" | "manual" | "dispatch" => Ok(EventKind::Manual),
            _ => Ok(EventKind::Other(normalized)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Scheduled => f.write_str("schedule"),
            EventKind::Manual => f.write_str("workflow_dispatch"),
            EventKind::Other(name) => f.write_str(name),
        }
    }
}

/// What to do when the generator leaves more than one fresh artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultipleArtifactPolicy {
    /// Attach every fresh artifact to the email.
    #[default]
    AttachAll,
    /// Attach only the most recently modified artifact.
    Latest,
    /// Treat more than one artifact as a generator failure.
    Error,
}

impl FromStr for MultipleArtifactPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attach_all" => Ok(MultipleArtifactPolicy::AttachAll),
            "latest" => Ok(MultipleArtifactPolicy::Latest),
            "error" => Ok(MultipleArtifactPolicy::Error),
            other => Err(format!(
                "invalid on_multiple: {other} (expected \"attach_all\", \"latest\" or \"error\")"
            )),
        }
    }
}

/// Transport security used for the SMTP relay connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Implicit TLS from the first byte (usually port 465).
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    Starttls,
    /// Unencrypted; only for local relays and tests.
    None,
}

impl FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tls" => Ok(SmtpSecurity::Tls),
            "starttls" => Ok(SmtpSecurity::Starttls),
            "none" => Ok(SmtpSecurity::None),
            other => Err(format!(
                "invalid smtp security: {other} (expected \"tls\", \"starttls\" or \"none\")"
            )),
        }
    }
}

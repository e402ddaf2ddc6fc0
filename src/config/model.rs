// src/config/model.rs

use std::str::FromStr;

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::{InvoicebotError, Result};
use crate::types::{MultipleArtifactPolicy, SmtpSecurity};

/// Configuration exactly as read from `Invoicebot.toml`.
///
/// ```toml
/// [authorization]
/// allowed_actors = ["SarveshK16"]
///
/// [environment]
/// runtime_version = "3.10"
/// version_command = "python --version"
///
/// [dependencies]
/// manifest = "requirements.txt"
///
/// [generator]
/// command = "python generate_invoice.py"
/// artifact = "invoice_*.docx"
///
/// [notify]
/// subject = "Monthly Invoice"
/// smtp_host = "smtp.gmail.com"
/// ```
///
/// Every section except `[generator]` is optional. Use
/// [`ConfigFile::try_from`] to validate and obtain the typed form.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub trigger: TriggerSection,

    #[serde(default)]
    pub authorization: AuthorizationSection,

    #[serde(default)]
    pub environment: EnvironmentSection,

    #[serde(default)]
    pub dependencies: DependenciesSection,

    #[serde(default)]
    pub generator: RawGeneratorSection,

    #[serde(default)]
    pub plan: PlanSection,

    #[serde(default)]
    pub notify: RawNotifySection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[trigger]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TriggerSection {
    /// Cron expression the external scheduler uses. Informational only:
    /// scheduling itself belongs to the CI platform.
    #[serde(default)]
    pub schedule: Option<String>,
}

/// `[authorization]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthorizationSection {
    /// Actors allowed to start a run manually. Scheduled runs ignore this.
    #[serde(default)]
    pub allowed_actors: Vec<String>,
}

/// `[environment]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentSection {
    /// Working directory, relative to the config file's directory.
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Optional command that brings the repository to the triggering commit.
    #[serde(default)]
    pub checkout: Option<String>,

    /// Pinned runtime version (e.g. `"3.10"`). Unset means "any".
    #[serde(default)]
    pub runtime_version: Option<String>,

    /// Command whose output contains the runtime version.
    #[serde(default)]
    pub version_command: Option<String>,
}

fn default_workdir() -> String {
    ".".to_string()
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            checkout: None,
            runtime_version: None,
            version_command: None,
        }
    }
}

/// `[dependencies]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DependenciesSection {
    /// Manifest listing the generator's packages, relative to the workdir.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Install command; `{manifest}` is replaced with the manifest path.
    #[serde(default = "default_install")]
    pub install: String,
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_install() -> String {
    "pip install -r {manifest}".to_string()
}

impl Default for DependenciesSection {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            install: default_install(),
        }
    }
}

/// `[generator]` section as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeneratorSection {
    /// Command that produces the invoice. Run without arguments.
    #[serde(default)]
    pub command: String,

    /// Glob (relative to the workdir) the produced files must match.
    #[serde(default = "default_artifact")]
    pub artifact: String,

    /// `"attach_all"`, `"latest"` or `"error"`.
    #[serde(default = "default_on_multiple")]
    pub on_multiple: String,
}

fn default_artifact() -> String {
    "invoice_*.docx".to_string()
}

fn default_on_multiple() -> String {
    "attach_all".to_string()
}

impl Default for RawGeneratorSection {
    fn default() -> Self {
        Self {
            command: String::new(),
            artifact: default_artifact(),
            on_multiple: default_on_multiple(),
        }
    }
}

/// `[plan]` section: how the next invoice's period and number are derived.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSection {
    /// Export the plan to the generator as `INVOICE_*` variables.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// First month (1-12) of the financial year.
    #[serde(default = "default_fiscal_year_start_month")]
    pub fiscal_year_start_month: u32,

    /// Day of the previous month the service period starts on.
    #[serde(default = "default_service_start_day")]
    pub service_start_day: u32,

    /// Invoice number prefix, e.g. `IN` in `IN4821/2024-25`.
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,

    /// Extension of the planned output file.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_true() -> bool {
    true
}

fn default_fiscal_year_start_month() -> u32 {
    4
}

fn default_service_start_day() -> u32 {
    7
}

fn default_number_prefix() -> String {
    "IN".to_string()
}

fn default_extension() -> String {
    "docx".to_string()
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            fiscal_year_start_month: default_fiscal_year_start_month(),
            service_start_day: default_service_start_day(),
            number_prefix: default_number_prefix(),
            extension: default_extension(),
        }
    }
}

/// `[notify]` section as written in TOML.
///
/// Addresses and credentials are never stored here, only the names of the
/// environment variables that hold them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNotifySection {
    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_body")]
    pub body: String,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// `"tls"`, `"starttls"` or `"none"`.
    #[serde(default = "default_security")]
    pub security: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_username_env")]
    pub username_env: String,

    #[serde(default = "default_password_env")]
    pub password_env: String,

    #[serde(default = "default_recipient_env")]
    pub recipient_env: String,

    #[serde(default = "default_sender_env")]
    pub sender_env: String,

    #[serde(default)]
    pub on_failure: FailureAlertSection,
}

fn default_subject() -> String {
    "Monthly Invoice".to_string()
}

fn default_body() -> String {
    "Please find attached the invoice for this month.".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_security() -> String {
    "tls".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_username_env() -> String {
    "EMAIL_USERNAME".to_string()
}

fn default_password_env() -> String {
    "EMAIL_PASSWORD".to_string()
}

fn default_recipient_env() -> String {
    "EMAIL_RECIPIENT".to_string()
}

fn default_sender_env() -> String {
    "EMAIL_SENDER".to_string()
}

impl Default for RawNotifySection {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            body: default_body(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            security: default_security(),
            timeout_secs: default_timeout_secs(),
            username_env: default_username_env(),
            password_env: default_password_env(),
            recipient_env: default_recipient_env(),
            sender_env: default_sender_env(),
            on_failure: FailureAlertSection::default(),
        }
    }
}

/// `[notify.on_failure]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FailureAlertSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_alert_subject")]
    pub subject: String,

    /// Variable holding the alert recipient; falls back to
    /// `notify.recipient_env` when unset.
    #[serde(default)]
    pub recipient_env: Option<String>,
}

fn default_alert_subject() -> String {
    "Invoice automation failed".to_string()
}

impl Default for FailureAlertSection {
    fn default() -> Self {
        Self {
            enabled: false,
            subject: default_alert_subject(),
            recipient_env: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSection {
    /// Extra log file (appended to), relative to the config directory.
    #[serde(default)]
    pub file: Option<String>,
}

/// Validated generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub command: String,
    pub artifact: String,
    pub on_multiple: MultipleArtifactPolicy,
}

/// Validated notifier settings.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub subject: String,
    pub body: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
    pub timeout_secs: u64,
    pub username_env: String,
    pub password_env: String,
    pub recipient_env: String,
    pub sender_env: String,
    pub on_failure: FailureAlertSection,
}

/// Validated configuration used by the rest of the crate.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub trigger: TriggerSection,
    pub authorization: AuthorizationSection,
    pub environment: EnvironmentSection,
    pub dependencies: DependenciesSection,
    pub generator: GeneratorConfig,
    pub plan: PlanSection,
    pub notify: NotifyConfig,
    pub logging: LoggingSection,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = InvoicebotError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        validate_config(&raw)?;

        let on_multiple = MultipleArtifactPolicy::from_str(&raw.generator.on_multiple)
            .map_err(InvoicebotError::ConfigError)?;
        let security =
            SmtpSecurity::from_str(&raw.notify.security).map_err(InvoicebotError::ConfigError)?;

        Ok(Self {
            trigger: raw.trigger,
            authorization: raw.authorization,
            environment: raw.environment,
            dependencies: raw.dependencies,
            generator: GeneratorConfig {
                command: raw.generator.command,
                artifact: raw.generator.artifact,
                on_multiple,
            },
            plan: raw.plan,
            notify: NotifyConfig {
                subject: raw.notify.subject,
                body: raw.notify.body,
                smtp_host: raw.notify.smtp_host,
                smtp_port: raw.notify.smtp_port,
                security,
                timeout_secs: raw.notify.timeout_secs,
                username_env: raw.notify.username_env,
                password_env: raw.notify.password_env,
                recipient_env: raw.notify.recipient_env,
                sender_env: raw.notify.sender_env,
                on_failure: raw.notify.on_failure,
            },
            logging: raw.logging,
        })
    }
}

impl FailureAlertSection {
    /// Environment variable naming the alert recipient.
    pub fn effective_recipient_env<'a>(&'a self, notify: &'a NotifyConfig) -> &'a str {
        self.recipient_env
            .as_deref()
            .unwrap_or(notify.recipient_env.as_str())
    }
}

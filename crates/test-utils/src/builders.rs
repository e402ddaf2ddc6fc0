#![allow(dead_code)]

use invoicebot::config::{ConfigFile, RawConfigFile};

use crate::fake_secrets::StaticSecrets;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults plus a generator command, one allowed actor
/// (`SarveshK16`), a runtime pin and plan generation turned on.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.authorization.allowed_actors = vec!["SarveshK16".to_string()];
        config.environment.runtime_version = Some("3.10".to_string());
        config.environment.version_command = Some("python --version".to_string());
        config.generator.command = "python generate_invoice.py".to_string();
        Self { config }
    }

    pub fn allowed_actor(mut self, actor: &str) -> Self {
        self.config.authorization.allowed_actors.push(actor.to_string());
        self
    }

    pub fn no_allowed_actors(mut self) -> Self {
        self.config.authorization.allowed_actors.clear();
        self
    }

    pub fn checkout(mut self, cmd: &str) -> Self {
        self.config.environment.checkout = Some(cmd.to_string());
        self
    }

    pub fn without_runtime_pin(mut self) -> Self {
        self.config.environment.runtime_version = None;
        self.config.environment.version_command = None;
        self
    }

    pub fn artifact(mut self, pattern: &str) -> Self {
        self.config.generator.artifact = pattern.to_string();
        self
    }

    pub fn on_multiple(mut self, policy: &str) -> Self {
        self.config.generator.on_multiple = policy.to_string();
        self
    }

    pub fn plan_enabled(mut self, enabled: bool) -> Self {
        self.config.plan.enabled = enabled;
        self
    }

    pub fn failure_alert(mut self, enabled: bool) -> Self {
        self.config.notify.on_failure.enabled = enabled;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Secrets matching the default `[notify]` variable names.
pub fn default_secrets() -> StaticSecrets {
    StaticSecrets::new()
        .with("EMAIL_USERNAME", "bot@example.com")
        .with("EMAIL_PASSWORD", "hunter2")
        .with("EMAIL_SENDER", "bot@example.com")
        .with("EMAIL_RECIPIENT", "accounts@client.example")
}

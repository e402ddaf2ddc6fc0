// src/config/validate.rs

use std::str::FromStr;

use globset::GlobBuilder;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{InvoicebotError, Result};
use crate::types::{MultipleArtifactPolicy, SmtpSecurity};

/// Run semantic validation against a freshly deserialized configuration.
///
/// This checks:
/// - the generator command is set and the artifact glob compiles
/// - `on_multiple` and `security` name known values
/// - `runtime_version` looks like `N[.N[.N]]` and has a `version_command`
/// - plan calendar settings produce valid dates in every month
/// - the SMTP endpoint and the secret variable names are non-empty
/// - `trigger.schedule`, when present, has five cron fields
///
/// It does **not** check that the commands exist or that secrets are set;
/// that happens when the corresponding step runs.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_authorization(cfg)?;
    validate_environment(cfg)?;
    validate_dependencies(cfg)?;
    validate_generator(cfg)?;
    validate_plan(cfg)?;
    validate_notify(cfg)?;
    validate_trigger(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> InvoicebotError {
    InvoicebotError::ConfigError(msg.into())
}

fn validate_authorization(cfg: &RawConfigFile) -> Result<()> {
    for actor in &cfg.authorization.allowed_actors {
        if actor.trim().is_empty() {
            return Err(config_error(
                "[authorization].allowed_actors must not contain empty names",
            ));
        }
        if actor.trim() != actor {
            return Err(config_error(format!(
                "[authorization].allowed_actors entry '{actor}' has surrounding whitespace"
            )));
        }
    }
    Ok(())
}

fn validate_environment(cfg: &RawConfigFile) -> Result<()> {
    let env = &cfg.environment;
    if env.workdir.trim().is_empty() {
        return Err(config_error("[environment].workdir must not be empty"));
    }

    if let Some(version) = &env.runtime_version {
        let well_formed = !version.is_empty()
            && version
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !well_formed {
            return Err(config_error(format!(
                "[environment].runtime_version '{version}' must look like 3, 3.10 or 3.10.4"
            )));
        }
        if env.version_command.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return Err(config_error(
                "[environment].runtime_version requires a version_command",
            ));
        }
    }

    if let Some(checkout) = &env.checkout {
        if checkout.trim().is_empty() {
            return Err(config_error(
                "[environment].checkout must not be empty when set",
            ));
        }
    }
    Ok(())
}

fn validate_dependencies(cfg: &RawConfigFile) -> Result<()> {
    if cfg.dependencies.manifest.trim().is_empty() {
        return Err(config_error("[dependencies].manifest must not be empty"));
    }
    if cfg.dependencies.install.trim().is_empty() {
        return Err(config_error("[dependencies].install must not be empty"));
    }
    Ok(())
}

fn validate_generator(cfg: &RawConfigFile) -> Result<()> {
    if cfg.generator.command.trim().is_empty() {
        return Err(config_error("[generator].command must be set"));
    }

    GlobBuilder::new(&cfg.generator.artifact)
        .literal_separator(true)
        .build()
        .map_err(|e| {
            config_error(format!(
                "[generator].artifact '{}' is not a valid glob: {e}",
                cfg.generator.artifact
            ))
        })?;

    MultipleArtifactPolicy::from_str(&cfg.generator.on_multiple)
        .map_err(|e| config_error(format!("[generator].on_multiple: {e}")))?;
    Ok(())
}

fn validate_plan(cfg: &RawConfigFile) -> Result<()> {
    let plan = &cfg.plan;
    if !(1..=12).contains(&plan.fiscal_year_start_month) {
        return Err(config_error(format!(
            "[plan].fiscal_year_start_month must be 1-12 (got {})",
            plan.fiscal_year_start_month
        )));
    }
    // The period ends the day before `service_start_day`, and that day must
    // exist in every month.
    if !(2..=28).contains(&plan.service_start_day) {
        return Err(config_error(format!(
            "[plan].service_start_day must be 2-28 (got {})",
            plan.service_start_day
        )));
    }
    if plan.extension.trim().is_empty() || plan.extension.contains('.') {
        return Err(config_error(
            "[plan].extension must be a bare extension such as \"docx\"",
        ));
    }
    Ok(())
}

fn validate_notify(cfg: &RawConfigFile) -> Result<()> {
    let notify = &cfg.notify;
    if notify.smtp_host.trim().is_empty() {
        return Err(config_error("[notify].smtp_host must not be empty"));
    }
    if notify.smtp_port == 0 {
        return Err(config_error("[notify].smtp_port must be >= 1 (got 0)"));
    }
    if notify.timeout_secs == 0 {
        return Err(config_error("[notify].timeout_secs must be >= 1 (got 0)"));
    }
    SmtpSecurity::from_str(&notify.security)
        .map_err(|e| config_error(format!("[notify].security: {e}")))?;

    let names = [
        ("username_env", notify.username_env.as_str()),
        ("password_env", notify.password_env.as_str()),
        ("recipient_env", notify.recipient_env.as_str()),
        ("sender_env", notify.sender_env.as_str()),
    ];
    for (key, value) in names {
        if value.trim().is_empty() {
            return Err(config_error(format!("[notify].{key} must not be empty")));
        }
    }

    if let Some(name) = &notify.on_failure.recipient_env {
        if name.trim().is_empty() {
            return Err(config_error(
                "[notify.on_failure].recipient_env must not be empty when set",
            ));
        }
    }
    Ok(())
}

fn validate_trigger(cfg: &RawConfigFile) -> Result<()> {
    if let Some(schedule) = &cfg.trigger.schedule {
        let fields = schedule.split_whitespace().count();
        if fields != 5 {
            return Err(config_error(format!(
                "[trigger].schedule '{schedule}' must have 5 cron fields (got {fields})"
            )));
        }
    }
    Ok(())
}

/// Settings that are valid but probably not what the operator meant.
///
/// Validation runs before logging is configured, so callers log these once
/// the subscriber is installed.
pub fn config_warnings(cfg: &ConfigFile) -> Vec<String> {
    let mut warnings = Vec::new();
    if cfg.authorization.allowed_actors.is_empty() {
        warnings.push(
            "[authorization].allowed_actors is empty; every manual trigger will be denied"
                .to_string(),
        );
    }
    warnings
}

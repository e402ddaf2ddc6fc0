// src/config/mod.rs

//! Configuration loading and validation for invoicebot.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate the values before any step runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_root_dir, default_config_path, load_and_validate, load_from_path};
pub use model::{
    AuthorizationSection, ConfigFile, DependenciesSection, EnvironmentSection,
    FailureAlertSection, GeneratorConfig, LoggingSection, NotifyConfig, PlanSection,
    RawConfigFile, RawGeneratorSection, RawNotifySection, TriggerSection,
};
pub use validate::{config_warnings, validate_config};

// src/errors.rs

//! Crate-wide error type, result alias and exit-code mapping.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoicebotError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Environment setup failed: {0}")]
    EnvironmentSetup(String),

    #[error("Dependency install failed: {0}")]
    DependencyInstall(String),

    #[error("Invoice generation failed: {0}")]
    Generator(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InvoicebotError {
    /// Process exit code for this error category.
    ///
    /// `0` is reserved for success; a denied gate exits with `1`, the same
    /// code used for uncategorised failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            InvoicebotError::AuthorizationDenied(_) => 1,
            InvoicebotError::ConfigError(_) | InvoicebotError::TomlError(_) => 2,
            InvoicebotError::EnvironmentSetup(_) => 3,
            InvoicebotError::DependencyInstall(_) => 4,
            InvoicebotError::Generator(_) => 5,
            InvoicebotError::Notification(_) => 6,
            InvoicebotError::IoError(_) | InvoicebotError::Other(_) => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, InvoicebotError>;

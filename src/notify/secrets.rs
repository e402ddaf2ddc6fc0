// src/notify/secrets.rs

//! Credential and address lookup. Values are wrapped in [`Secret`] so they
//! cannot end up in logs through `Debug`.

use std::fmt;

use anyhow::{Result, anyhow};

/// A string that must never be printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Where secrets come from. Production reads the process environment.
pub trait SecretSource: Send + Sync {
    fn get(&self, name: &str) -> Option<Secret>;

    /// Like [`SecretSource::get`] but fails with the variable's name (never
    /// its value) when it is missing or blank.
    fn require(&self, name: &str) -> Result<Secret> {
        match self.get(name) {
            Some(secret) if !secret.expose().trim().is_empty() => Ok(secret),
            Some(_) => Err(anyhow!("environment variable {name} is empty")),
            None => Err(anyhow!("environment variable {name} is not set")),
        }
    }
}

/// Reads secrets from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, name: &str) -> Option<Secret> {
        std::env::var(name).ok().map(Secret::new)
    }
}

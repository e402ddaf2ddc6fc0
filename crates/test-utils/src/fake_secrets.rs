use std::collections::HashMap;

use invoicebot::notify::{Secret, SecretSource};

/// Fixed secrets instead of the process environment.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, Secret>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), Secret::new(value));
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, name: &str) -> Option<Secret> {
        self.values.get(name).cloned()
    }
}

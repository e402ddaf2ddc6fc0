// src/gate.rs

//! Authorization gate.
//!
//! A pure predicate over `(event, actor)`: non-manual triggers always pass,
//! manual triggers pass only when the actor is on the allow-list.

use std::fmt;

use crate::config::AuthorizationSection;
use crate::types::EventKind;

/// The event that started a run and who started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub event: EventKind,
    pub actor: String,
}

impl Trigger {
    pub fn new(event: EventKind, actor: impl Into<String>) -> Self {
        Self {
            event,
            actor: actor.into(),
        }
    }

    pub fn scheduled(actor: impl Into<String>) -> Self {
        Self::new(EventKind::Scheduled, actor)
    }

    pub fn manual(actor: impl Into<String>) -> Self {
        Self::new(EventKind::Manual, actor)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by '{}'", self.event, self.actor)
    }
}

/// Actors allowed to dispatch a run manually.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    allowed_actors: Vec<String>,
}

impl AuthorizationPolicy {
    pub fn new<I, S>(allowed_actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_actors: allowed_actors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(section: &AuthorizationSection) -> Self {
        Self::new(section.allowed_actors.iter().cloned())
    }

    /// Exact, case-sensitive membership check.
    pub fn permits(&self, actor: &str) -> bool {
        self.allowed_actors.iter().any(|a| a == actor)
    }
}

/// Result of evaluating the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether a run may proceed.
pub fn authorize(trigger: &Trigger, policy: &AuthorizationPolicy) -> Decision {
    if !trigger.event.is_manual() {
        return Decision::Allow;
    }

    if policy.permits(&trigger.actor) {
        Decision::Allow
    } else {
        Decision::Deny {
            reason: format!(
                "actor '{}' is not allowed to dispatch this job manually",
                trigger.actor
            ),
        }
    }
}

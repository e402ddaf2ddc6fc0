// src/engine/report.rs

use crate::artifacts::Artifact;
use crate::errors::{InvoicebotError, Result};
use crate::gate::Trigger;
use crate::plan::InvoicePlan;

use super::Step;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub status: StepStatus,
}

/// Everything a run did, in order.
#[derive(Debug)]
pub struct RunReport {
    pub trigger: Trigger,
    pub steps: Vec<StepRecord>,
    pub plan: Option<InvoicePlan>,
    pub artifacts: Vec<Artifact>,
    /// Whether a failure alert was delivered.
    pub alert_sent: bool,
    pub error: Option<InvoicebotError>,
}

impl RunReport {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            steps: Vec::new(),
            plan: None,
            artifacts: Vec::new(),
            alert_sent: false,
            error: None,
        }
    }

    pub fn record(&mut self, step: Step, status: StepStatus) {
        self.steps.push(StepRecord { step, status });
    }

    /// Mark every step after `failed` as skipped.
    pub fn skip_after(&mut self, failed: Step) {
        for step in Step::ALL.into_iter().filter(|s| *s > failed) {
            self.record(step, StepStatus::Skipped);
        }
    }

    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.status)
    }

    /// True when the step actually executed, successfully or not.
    pub fn ran(&self, step: Step) -> bool {
        matches!(
            self.status_of(step),
            Some(StepStatus::Succeeded) | Some(StepStatus::Failed(_))
        )
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn failed_step(&self) -> Option<Step> {
        self.steps
            .iter()
            .find(|r| matches!(r.status, StepStatus::Failed(_)))
            .map(|r| r.step)
    }

    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map_or(0, InvoicebotError::exit_code)
    }

    /// Split off the terminal error, if any.
    pub fn into_result(mut self) -> Result<Self> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

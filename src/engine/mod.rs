// src/engine/mod.rs

//! Orchestration engine for invoicebot.
//!
//! The run is a fixed, linear sequence of [`Step`]s. The gate may end it
//! early; after that every step is fatal on error and later steps are
//! recorded as skipped. [`pipeline`] drives the sequence, [`report`] holds
//! what happened.

use std::fmt;

pub mod pipeline;
pub mod report;

pub use pipeline::Pipeline;
pub use report::{RunReport, StepRecord, StepStatus};

/// One stage of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Authorize,
    Provision,
    InstallDependencies,
    Plan,
    Generate,
    Notify,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Authorize,
        Step::Provision,
        Step::InstallDependencies,
        Step::Plan,
        Step::Generate,
        Step::Notify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Authorize => "authorize",
            Step::Provision => "provision",
            Step::InstallDependencies => "install-dependencies",
            Step::Plan => "plan",
            Step::Generate => "generate",
            Step::Notify => "notify",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

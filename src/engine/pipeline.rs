// src/engine/pipeline.rs

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::artifacts::ArtifactPattern;
use crate::config::ConfigFile;
use crate::deps;
use crate::errors::InvoicebotError;
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::gate::{AuthorizationPolicy, Decision, Trigger, authorize};
use crate::generator;
use crate::notify::{self, Mailer, SecretSource};
use crate::plan::{self, InvoicePlan};
use crate::provision;

use super::{RunReport, Step, StepStatus};

/// The full invoice job: gate, provision, install, plan, generate, notify.
///
/// All side effects go through the injected filesystem, command runner,
/// mailer and secret source.
pub struct Pipeline {
    config: ConfigFile,
    workdir: PathBuf,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
    mailer: Arc<dyn Mailer>,
    secrets: Arc<dyn SecretSource>,
    today: NaiveDate,
    serial: Option<u16>,
}

type StepError = (Step, InvoicebotError);

impl Pipeline {
    pub fn new(
        config: ConfigFile,
        workdir: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
        mailer: Arc<dyn Mailer>,
        secrets: Arc<dyn SecretSource>,
    ) -> Self {
        Self {
            config,
            workdir: workdir.into(),
            fs,
            runner,
            mailer,
            secrets,
            today: Local::now().date_naive(),
            serial: None,
        }
    }

    /// Override the date the planner treats as today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Use a fixed invoice serial instead of a random one.
    pub fn with_invoice_serial(mut self, serial: u16) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Execute one run. Never panics; the outcome is in the report.
    pub async fn run(&self, trigger: &Trigger) -> RunReport {
        let mut report = RunReport::new(trigger.clone());
        info!(trigger = %trigger, workdir = ?self.workdir, "invoice run started");

        let policy = AuthorizationPolicy::from_config(&self.config.authorization);
        if let Decision::Deny { reason } = authorize(trigger, &policy) {
            warn!(actor = %trigger.actor, event = %trigger.event, "{reason}");
            report.record(Step::Authorize, StepStatus::Failed(reason.clone()));
            report.skip_after(Step::Authorize);
            report.error = Some(InvoicebotError::AuthorizationDenied(reason));
            return report;
        }
        report.record(Step::Authorize, StepStatus::Succeeded);

        match self.run_steps(&mut report).await {
            Ok(()) => {
                info!(
                    attachments = report.artifacts.len(),
                    "invoice run finished successfully"
                );
            }
            Err((step, err)) => {
                error!(step = %step, error = %err, "invoice run failed");
                report.record(step, StepStatus::Failed(err.to_string()));
                report.skip_after(step);
                if self.config.notify.on_failure.enabled {
                    report.alert_sent = self.send_failure_alert(step, &err).await;
                }
                report.error = Some(err);
            }
        }

        report
    }

    async fn run_steps(&self, report: &mut RunReport) -> Result<(), StepError> {
        let fs = self.fs.as_ref();
        let runner = self.runner.as_ref();

        provision::provision(fs, runner, &self.workdir, &self.config.environment)
            .await
            .map_err(|e| {
                (
                    Step::Provision,
                    InvoicebotError::EnvironmentSetup(format!("{e:#}")),
                )
            })?;
        report.record(Step::Provision, StepStatus::Succeeded);

        deps::install(fs, runner, &self.workdir, &self.config.dependencies)
            .await
            .map_err(|e| {
                (
                    Step::InstallDependencies,
                    InvoicebotError::DependencyInstall(format!("{e:#}")),
                )
            })?;
        report.record(Step::InstallDependencies, StepStatus::Succeeded);

        let env = if self.config.plan.enabled {
            let plan = self
                .plan()
                .map_err(|e| (Step::Plan, InvoicebotError::Generator(format!("{e:#}"))))?;
            let env = plan.env_vars();
            report.plan = Some(plan);
            report.record(Step::Plan, StepStatus::Succeeded);
            env
        } else {
            report.record(Step::Plan, StepStatus::Skipped);
            Vec::new()
        };

        let artifacts =
            generator::generate(fs, runner, &self.workdir, &self.config.generator, env)
                .await
                .map_err(|e| (Step::Generate, InvoicebotError::Generator(format!("{e:#}"))))?;
        report.artifacts = artifacts;
        report.record(Step::Generate, StepStatus::Succeeded);

        self.send_invoice(report)
            .await
            .map_err(|e| (Step::Notify, InvoicebotError::Notification(format!("{e:#}"))))?;
        report.record(Step::Notify, StepStatus::Succeeded);

        Ok(())
    }

    /// Plan the next invoice from the files already in the workdir.
    pub fn plan(&self) -> anyhow::Result<InvoicePlan> {
        let pattern = ArtifactPattern::new(&self.config.generator.artifact)?;
        let serial = self.serial.unwrap_or_else(plan::random_serial);
        plan::plan_next(
            self.fs.as_ref(),
            &self.workdir,
            &pattern,
            &self.config.plan,
            self.today,
            serial,
        )
    }

    async fn send_invoice(&self, report: &RunReport) -> anyhow::Result<()> {
        let notify_cfg = &self.config.notify;
        let relay = notify::relay_settings(notify_cfg, self.secrets.as_ref())?;
        let mail = notify::build_invoice_mail(
            notify_cfg,
            self.secrets.as_ref(),
            self.fs.as_ref(),
            &report.artifacts,
        )?;

        info!(
            subject = %mail.subject,
            recipients = mail.to.len(),
            attachments = ?mail.attachments.iter().map(|a| a.file_name.as_str()).collect::<Vec<_>>(),
            "sending invoice mail"
        );
        self.mailer.send(&relay, &mail).await
    }

    /// Best effort: a failing alert is logged and reported as `false`.
    async fn send_failure_alert(&self, step: Step, err: &InvoicebotError) -> bool {
        let notify_cfg = &self.config.notify;
        let result: anyhow::Result<()> = async {
            let relay = notify::relay_settings(notify_cfg, self.secrets.as_ref())?;
            let mail = notify::build_failure_alert(
                notify_cfg,
                self.secrets.as_ref(),
                step.as_str(),
                &err.to_string(),
            )?;
            self.mailer.send(&relay, &mail).await
        }
        .await;

        match result {
            Ok(()) => {
                info!(step = %step, "failure alert sent");
                true
            }
            Err(alert_err) => {
                warn!(
                    step = %step,
                    error = %format!("{alert_err:#}"),
                    "failure alert could not be sent"
                );
                false
            }
        }
    }
}

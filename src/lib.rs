// src/lib.rs

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod gate;
pub mod generator;
pub mod logging;
pub mod notify;
pub mod plan;
pub mod provision;
pub mod types;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cli::{CliArgs, Command, RunArgs};
use crate::config::{ConfigFile, config_root_dir, config_warnings};
use crate::engine::Pipeline;
use crate::errors::{InvoicebotError, Result};
use crate::exec::ShellCommandRunner;
use crate::fs::RealFileSystem;
use crate::gate::{AuthorizationPolicy, Decision, Trigger, authorize};
use crate::notify::{EnvSecrets, SmtpMailer};
use crate::plan::InvoicePlan;
use crate::types::EventKind;

/// High-level entry point used by `main.rs`.
///
/// `cfg` is the already validated config loaded from `args.config`. This
/// wires the production filesystem, shell runner, SMTP mailer and
/// environment secrets into a [`Pipeline`] and dispatches the subcommand.
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    for warning in config_warnings(&cfg) {
        warn!("{warning}");
    }

    let config_path = PathBuf::from(&args.config);
    let workdir = config_root_dir(&config_path).join(&cfg.environment.workdir);

    match args.command {
        Command::Check => {
            print_check(&cfg, &workdir);
            Ok(())
        }
        Command::Plan => {
            let pipeline = production_pipeline(cfg, workdir);
            let plan = pipeline.plan()?;
            print_plan(&plan);
            Ok(())
        }
        Command::Run(run_args) => {
            let trigger = trigger_from_args(&run_args)?;
            if run_args.dry_run {
                return print_dry_run(&cfg, &workdir, &trigger);
            }

            let pipeline = production_pipeline(cfg, workdir);
            let report = pipeline.run(&trigger).await;
            report.into_result().map(|_| ())
        }
    }
}

/// Build the trigger from `--event` / `--actor`.
pub fn trigger_from_args(args: &RunArgs) -> Result<Trigger> {
    let event = EventKind::from_str(&args.event)
        .map_err(|e| InvoicebotError::ConfigError(format!("--event: {e}")))?;
    Ok(Trigger::new(event, args.actor.clone()))
}

fn production_pipeline(cfg: ConfigFile, workdir: PathBuf) -> Pipeline {
    Pipeline::new(
        cfg,
        workdir,
        Arc::new(RealFileSystem),
        Arc::new(ShellCommandRunner::new()),
        Arc::new(SmtpMailer::new()),
        Arc::new(EnvSecrets),
    )
}

fn print_plan(plan: &InvoicePlan) {
    println!("invoice_number  = {}", plan.invoice_number);
    println!("invoice_date    = {}", plan.long_date);
    println!("short_date      = {}", plan.short_date);
    println!("financial_year  = {}", plan.financial_year);
    println!("service_period  = {}", plan.service_period);
    println!("output_file     = {}", plan.output_file);
}

/// Summary of the validated config; secrets are listed by variable name.
fn print_check(cfg: &ConfigFile, workdir: &Path) {
    println!("invoicebot check: config OK");
    println!("  workdir = {}", workdir.display());
    if let Some(schedule) = &cfg.trigger.schedule {
        println!("  schedule = {schedule}");
    }
    println!(
        "  allowed_actors = {:?}",
        cfg.authorization.allowed_actors
    );
    println!();
    print_steps(cfg);
}

fn print_steps(cfg: &ConfigFile) {
    println!("steps:");
    let env = &cfg.environment;
    println!("  - provision");
    if let Some(checkout) = &env.checkout {
        println!("      checkout: {checkout}");
    }
    if let (Some(version), Some(version_cmd)) = (&env.runtime_version, &env.version_command) {
        println!("      runtime: {version} (check: {version_cmd})");
    }

    println!("  - install-dependencies");
    println!("      manifest: {}", cfg.dependencies.manifest);
    println!(
        "      cmd: {}",
        cfg.dependencies
            .install
            .replace("{manifest}", &cfg.dependencies.manifest)
    );

    if cfg.plan.enabled {
        println!("  - plan");
        println!(
            "      fiscal_year_start_month: {}, service_start_day: {}",
            cfg.plan.fiscal_year_start_month, cfg.plan.service_start_day
        );
    }

    println!("  - generate");
    println!("      cmd: {}", cfg.generator.command);
    println!("      artifact: {}", cfg.generator.artifact);
    println!("      on_multiple: {:?}", cfg.generator.on_multiple);

    let notify = &cfg.notify;
    println!("  - notify");
    println!("      subject: {}", notify.subject);
    println!(
        "      relay: {}:{} ({:?})",
        notify.smtp_host, notify.smtp_port, notify.security
    );
    println!(
        "      secrets: {}, {}, {}, {}",
        notify.username_env, notify.password_env, notify.sender_env, notify.recipient_env
    );
    if notify.on_failure.enabled {
        println!("      on_failure: {}", notify.on_failure.subject);
    }
}

/// Evaluate the gate and show what a run would do.
fn print_dry_run(cfg: &ConfigFile, workdir: &Path, trigger: &Trigger) -> Result<()> {
    println!("invoicebot dry-run");
    println!("  trigger = {trigger}");
    println!("  workdir = {}", workdir.display());

    let policy = AuthorizationPolicy::from_config(&cfg.authorization);
    let decision = authorize(trigger, &policy);
    match &decision {
        Decision::Allow => println!("  gate = ALLOW"),
        Decision::Deny { reason } => println!("  gate = DENY ({reason})"),
    }
    println!();

    debug!("dry-run complete (no execution)");
    match decision {
        Decision::Allow => {
            print_steps(cfg);
            Ok(())
        }
        Decision::Deny { reason } => Err(InvoicebotError::AuthorizationDenied(reason)),
    }
}

// src/plan/mod.rs

//! Planning of the next invoice: its month, number and service period.
//!
//! The generator receives the plan through `INVOICE_*` environment
//! variables, and `invoicebot plan` prints it without running anything.

pub mod calendar;

use std::path::Path;

use anyhow::{Result, anyhow};
use chrono::{Datelike, Months, NaiveDate};
use rand::Rng;
use tracing::{debug, info};

use crate::artifacts::{ArtifactPattern, collect_matching_files};
use crate::config::PlanSection;
use crate::fs::FileSystem;

pub use calendar::{
    financial_year, first_of_month, long_date, ordinal, output_file_name,
    parse_invoice_file_name, short_date,
};

/// All fields of the next invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePlan {
    /// Always the first day of the invoiced month.
    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub financial_year: String,
    pub long_date: String,
    pub short_date: String,
    pub service_start: NaiveDate,
    pub service_end: NaiveDate,
    /// `"7th January 2025 to 6th February 2025"`.
    pub service_period: String,
    pub output_file: String,
}

impl InvoicePlan {
    /// Build the plan for the month containing `date`, using `serial` as the
    /// numeric part of the invoice number.
    pub fn for_month(date: NaiveDate, serial: u16, settings: &PlanSection) -> Result<Self> {
        let invoice_date = first_of_month(date);
        let fy = financial_year(invoice_date, settings.fiscal_year_start_month);

        let previous = invoice_date
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| anyhow!("no month before {invoice_date}"))?;
        let service_start = NaiveDate::from_ymd_opt(
            previous.year(),
            previous.month(),
            settings.service_start_day,
        )
        .ok_or_else(|| anyhow!("invalid service start day {}", settings.service_start_day))?;
        let end_day = settings.service_start_day.saturating_sub(1);
        let service_end =
            NaiveDate::from_ymd_opt(invoice_date.year(), invoice_date.month(), end_day)
                .ok_or_else(|| anyhow!("invalid service end day {end_day}"))?;

        Ok(Self {
            invoice_date,
            invoice_number: format!("{}{:04}/{}", settings.number_prefix, serial, fy),
            financial_year: fy,
            long_date: long_date(invoice_date),
            short_date: short_date(invoice_date),
            service_start,
            service_end,
            service_period: format!("{} to {}", long_date(service_start), long_date(service_end)),
            output_file: output_file_name(invoice_date, &settings.extension),
        })
    }

    /// Variables exported to the generator process.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        vec![
            ("INVOICE_DATE".to_string(), self.invoice_date.to_string()),
            ("INVOICE_DATE_LONG".to_string(), self.long_date.clone()),
            ("INVOICE_DATE_SHORT".to_string(), self.short_date.clone()),
            ("INVOICE_NUMBER".to_string(), self.invoice_number.clone()),
            ("INVOICE_FINANCIAL_YEAR".to_string(), self.financial_year.clone()),
            ("INVOICE_SERVICE_PERIOD".to_string(), self.service_period.clone()),
            ("INVOICE_OUTPUT".to_string(), self.output_file.clone()),
        ]
    }
}

/// Random four-digit invoice serial.
pub fn random_serial() -> u16 {
    rand::rng().random_range(1000..=9999)
}

/// Month the next invoice is for.
///
/// The month after the newest invoice found among `existing` file names;
/// the current month when none of them parses.
pub fn next_invoice_date<'a, I>(existing: I, today: NaiveDate) -> NaiveDate
where
    I: IntoIterator<Item = &'a str>,
{
    let latest = existing
        .into_iter()
        .filter_map(|name| {
            let parsed = parse_invoice_file_name(name);
            if parsed.is_none() {
                debug!(file = %name, "ignoring invoice file with unrecognised name");
            }
            parsed
        })
        .max();

    match latest.and_then(|d| d.checked_add_months(Months::new(1))) {
        Some(next) => next,
        None => first_of_month(today),
    }
}

/// Look at the invoices already in `workdir` and plan the next one.
///
/// File names decide the month, not modification times: a fresh checkout
/// gives every file the same mtime.
pub fn plan_next(
    fs: &dyn FileSystem,
    workdir: &Path,
    pattern: &ArtifactPattern,
    settings: &PlanSection,
    today: NaiveDate,
    serial: u16,
) -> Result<InvoicePlan> {
    let existing = collect_matching_files(fs, workdir, pattern)?;
    let names: Vec<String> = existing
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    let date = next_invoice_date(names.iter().map(String::as_str), today);
    let plan = InvoicePlan::for_month(date, serial, settings)?;

    info!(
        existing = names.len(),
        invoice_number = %plan.invoice_number,
        date = %plan.long_date,
        service_period = %plan.service_period,
        output = %plan.output_file,
        "planned next invoice"
    );
    Ok(plan)
}

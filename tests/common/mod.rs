#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use invoicebot::config::ConfigFile;
use invoicebot::engine::Pipeline;
use invoicebot::fs::mock::MockFileSystem;
use invoicebot_test_utils::builders::default_secrets;
use invoicebot_test_utils::fake_mailer::FakeMailer;
use invoicebot_test_utils::fake_runner::FakeCommandRunner;

pub const WORKDIR: &str = "/work";

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A checked-out repository: manifest and generator script, no invoices.
pub fn workspace_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir(WORKDIR);
    fs.add_file(
        "/work/requirements.txt",
        "python-docx==1.1.0\npython-dateutil>=2.8  # relativedelta\n",
    );
    fs.add_file("/work/generate_invoice.py", "print('generating')\n");
    fs
}

/// Pipeline over the mock filesystem with a fixed date (15 January 2025)
/// and invoice serial 4821.
pub fn pipeline(
    cfg: ConfigFile,
    fs: &MockFileSystem,
    runner: FakeCommandRunner,
    mailer: &FakeMailer,
) -> Pipeline {
    Pipeline::new(
        cfg,
        WORKDIR,
        Arc::new(fs.clone()),
        Arc::new(runner),
        Arc::new(mailer.clone()),
        Arc::new(default_secrets()),
    )
    .with_today(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    .with_invoice_serial(4821)
}

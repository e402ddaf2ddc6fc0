// src/main.rs

use std::path::PathBuf;

use invoicebot::config::{config_root_dir, load_and_validate};
use invoicebot::errors::Result;
use invoicebot::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("invoicebot error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run_main() -> Result<()> {
    let args = cli::parse();

    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let log_file = cfg
        .logging
        .file
        .as_ref()
        .map(|file| config_root_dir(&config_path).join(file));
    logging::init_logging(args.log_level, log_file.as_deref())?;

    run(args, cfg).await
}

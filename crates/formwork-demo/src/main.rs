//! Headless demo runner.
//!
//! Run with: `cargo run --package formwork-demo -- --submit-delay-ms 0`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use formwork_demo::config::DemoConfig;
use formwork_demo::runner::run;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formwork-demo")]
#[command(version)]
#[command(about = "Render, fill and submit every form of a schema", long_about = None)]
struct Cli {
    /// Demo config file (RON, JSON, TOML or YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Schema file, overrides the config
    #[arg(long, short)]
    schema: Option<PathBuf>,

    /// Delay of the stand-in submission backend, in milliseconds
    #[arg(long)]
    submit_delay_ms: Option<u64>,

    /// Make every submission fail
    #[arg(long)]
    fail_submissions: bool,

    /// Print each form's raw source
    #[arg(long)]
    show_raw_code: bool,
}

impl Cli {
    fn into_config(self) -> Result<DemoConfig, formwork_demo::error::DemoError> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        if let Some(schema) = self.schema {
            config.schema = schema;
        }
        if let Some(delay) = self.submit_delay_ms {
            config.submit_delay_ms = delay;
        }
        config.fail_submissions |= self.fail_submissions;
        config.show_raw_code |= self.show_raw_code;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(report) => {
            for block in &report.rendered {
                println!("{block}");
            }
            println!(
                "{} forms, {} links, {} submitted, {} failed",
                report.forms,
                report.links,
                report.submitted.len(),
                report.failed.len()
            );
            if report.failed.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}

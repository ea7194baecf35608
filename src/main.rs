//! Site content service.
//!
//! Serves normalized CMS content to the page renderer over a JSON API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Page renderer             ┌──────────────────────────────────────────────┐
//!     ─────────────────────────▶│ http (axum) → content mappers                 │
//!                               │                 │                              │
//!                               │                 ▼                              │
//!                               │        resilience (deadline racer)            │
//!                               │                 │                              │
//!                               │                 ▼                              │
//!                               │        cms (payload | git | memory) ──────────┼──▶ CMS
//!                               │                                                │
//!                               │  config · observability · lifecycle           │
//!                               └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use site_content::cms::audit::audit;
use site_content::cms::{factory_from_config, init_client};
use site_content::lifecycle::{prepare, serve};
use site_content::resilience::Racer;

#[derive(Parser)]
#[command(name = "site-content")]
#[command(about = "Content resolution service for the IIS Precision Manufacturing site", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus CMS_* environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Validate every CMS document against its expected shape
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = prepare(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.config).await?,
        Commands::Check => {
            let factory = factory_from_config(&config.cms)?;
            let racer = Racer::new(
                std::time::Duration::from_millis(config.cms.init_timeout_ms()),
                config.cms.timeout_policy,
            );
            let source = init_client(Arc::clone(&factory), &racer).await?;

            let reports = audit(&*source, config.content.max_docs).await;
            let mut failed = false;
            for report in &reports {
                if report.is_clean() {
                    println!("ok    {:<24} {} checked", report.kind, report.checked);
                } else {
                    failed = true;
                    println!("FAIL  {:<24} {} checked", report.kind, report.checked);
                    for problem in &report.problems {
                        println!("      - {problem}");
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

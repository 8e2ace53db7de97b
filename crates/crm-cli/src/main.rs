//! CRM CLI
//!
//! Serves the CRM graph API and manages its Neo4j schema.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Cli;

/// Initialize tracing with optional daily-rolling file logging.
///
/// The returned guard flushes the file writer on drop and must outlive the
/// program's work.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crm=info,crm_web=info,crm_graph=info,tower_http=info".into());

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "crm.log"));

        // stdout and file
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Best-effort .env load so clap's `env` fallbacks see it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref())?;

    cli.execute().await
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use driverfetch_core::{
    format_elapsed, load_config, load_config_from_env, render_json, render_table,
    validate_config, BatchOrchestrator, Config, DetailFetcher, HttpApiClient, OutputFormat,
    RunEvent, RunObserver, RunReport,
};

/// Config file used when `DRIVERFETCH_CONFIG` is not set.
const DEFAULT_CONFIG_FILE: &str = "driverfetch.toml";

/// Process exit code when the run stopped on a server error.
const EXIT_ABORTED: i32 = 2;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(report) if report.aborted() => std::process::exit(EXIT_ABORTED),
        Ok(_) => {}
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<RunReport> {
    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load(std::env::var("DRIVERFETCH_CONFIG").ok().map(PathBuf::from))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("API base URL: {}", config.api.base_url);
    info!(
        "Window size: {}, worker pool: {}, pause: {}ms",
        config.batch.window_size, config.batch.worker_pool_size, config.batch.pause_ms
    );

    let client = HttpApiClient::new(&config.api).context("Failed to create HTTP client")?;
    let fetcher = DetailFetcher::new(Arc::new(client), &config.api);
    let orchestrator =
        BatchOrchestrator::new(fetcher, config.batch.clone()).with_observer(progress_printer());

    let report = orchestrator.trigger().await.context("Failed to start run")?;

    match config.output.format {
        OutputFormat::Table => {
            print!("{}", render_table(&report.outcomes));
            println!("{}", format_elapsed(report.elapsed));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&render_json(&report))
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    Ok(report)
}

/// Load config from an explicit path, the default file, or env only.
fn load(explicit: Option<PathBuf>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => PathBuf::from(DEFAULT_CONFIG_FILE),
        None => {
            info!("No config file found, using defaults and environment");
            return load_config_from_env().context("Failed to load config from environment");
        }
    };

    info!("Loading configuration from {:?}", path);
    load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
}

/// Observer writing one progress line per event to stderr.
fn progress_printer() -> RunObserver {
    Arc::new(|event: &RunEvent| match event {
        RunEvent::ListFetchFailed { reason } => eprintln!("{}", reason),
        RunEvent::DriversDiscovered { count } => eprintln!("Total drivers found: {}", count),
        RunEvent::BatchStarted {
            index,
            total,
            driver_ids,
        } => {
            let ids: Vec<&str> = driver_ids.iter().map(|id| id.as_str()).collect();
            eprintln!(
                "Fetching details for batch {}/{}: [{}]",
                index,
                total,
                ids.join(", ")
            );
        }
        RunEvent::BatchCompleted { .. } => {}
        RunEvent::Aborted { reason } => eprintln!("Aborting: {}", reason),
        RunEvent::Finished { report } => {
            let summary = report.summary();
            eprintln!(
                "Finished: {} rows ({} values, {} missing, {} parse errors, {} HTTP errors, {} network errors)",
                report.outcomes.len(),
                summary.values,
                summary.missing,
                summary.parse_errors,
                summary.http_errors,
                summary.network_errors
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let result = load(Some(PathBuf::from("/nonexistent/driverfetch.toml")));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("not found"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[batch]
window_size = 3

[output]
format = "json"
"#
        )
        .unwrap();

        let config = load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.batch.window_size, 3);
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}

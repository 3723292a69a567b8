use crate::cli::ShellCommand;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::shell::{HttpFetcher, ServiceWorker, ShellRequest, SledCacheStorage};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

fn worker(config: &Config, origin: Option<String>) -> Result<ServiceWorker> {
    let store = open_store(config)?;
    let origin = origin.unwrap_or_else(|| config.client.shell_origin.clone());
    let fetcher = HttpFetcher::new(&origin, Duration::from_secs(config.client.timeout_seconds))?;
    let storage = SledCacheStorage::new(store.db().clone());
    Ok(ServiceWorker::new(Arc::new(storage), Arc::new(fetcher)))
}

/// Handle application shell commands
pub async fn handle_shell(config: &Config, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Install { origin } => {
            let worker = worker(config, origin)?;
            let cached = worker.install().await?;
            let report = worker.activate().await?;
            println!(
                "{}",
                format!("Cached {} shell assets in {}", cached, worker.cache_name()).green()
            );
            for name in report.deleted {
                println!("{}", format!("Removed old cache {}", name).dimmed());
            }
        }
        ShellCommand::Fetch {
            path,
            navigate,
            method,
            origin,
        } => {
            let worker = worker(config, origin)?;
            let request = ShellRequest {
                method,
                path,
                navigate,
            };
            let response = worker.handle_fetch(&request).await?;

            let status = if response.status == 200 {
                response.status.to_string().green()
            } else {
                response.status.to_string().yellow()
            };
            println!(
                "{} {}",
                status,
                response.header("content-type").unwrap_or("-").dimmed()
            );
            println!("{}", String::from_utf8_lossy(&response.body));
        }
    }
    Ok(())
}

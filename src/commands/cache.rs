use crate::cli::CacheCommand;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Handle response cache commands
pub fn handle_cache(config: &Config, command: CacheCommand) -> Result<()> {
    match command {
        CacheCommand::Sweep { days } => {
            let days = days.unwrap_or(config.client.cache_ttl_days);
            let store = open_store(config)?;
            let removed = store.sweep_cache_older_than(days)?;
            println!(
                "{}",
                format!(
                    "Removed {} cached responses older than {} days ({} kept)",
                    removed,
                    days,
                    store.cache_len()
                )
                .green()
            );
        }
    }
    Ok(())
}

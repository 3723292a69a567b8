use crate::cli::PendingCommand;
use crate::commands::ask::build_engine;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::storage::LocalStore;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle pending queue commands
pub async fn handle_pending(config: &Config, command: PendingCommand) -> Result<()> {
    match command {
        PendingCommand::List => {
            let store = open_store(config)?;
            let pending = store.pending_queries()?;

            if pending.is_empty() {
                println!("{}", "No queries waiting for a connection.".green());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row!["ID".bold(), "Query".bold(), "Queued".bold()]);
            for item in pending {
                table.add_row(prettytable::row![
                    item.id.to_string().cyan(),
                    item.query,
                    item.timestamp.format("%Y-%m-%d %H:%M").to_string()
                ]);
            }
            table.printstd();
        }
        PendingCommand::Sync => {
            let engine = build_engine(config, false).await?;
            let report = engine.sync_pending().await?;

            if report.skipped_offline {
                println!(
                    "{}",
                    format!(
                        "Coaching API unreachable; {} queries still queued.",
                        report.remaining
                    )
                    .yellow()
                );
                return Ok(());
            }

            for (item, answer) in &report.answered {
                println!("{} {}", "Q:".green().bold(), item.query);
                println!("{}", answer);
                println!();
            }

            let summary = format!(
                "Answered {}, {} remaining",
                report.answered.len(),
                report.remaining
            );
            if report.stopped_on_error {
                println!("{} (stopped at a failed request)", summary.yellow());
            } else {
                println!("{}", summary.green());
            }
        }
    }

    Ok(())
}

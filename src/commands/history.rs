use crate::cli::HistoryCommand;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::{Result, SaathiError};
use crate::providers::Role;
use crate::storage::LocalStore;
use colored::Colorize;
use prettytable::{format, Table};

const TITLE_WIDTH: usize = 40;

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = open_store(config)?;

    match command {
        HistoryCommand::List => {
            let chats = store.all_chats()?;

            if chats.is_empty() {
                println!("{}", "No chat history found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold()
            ]);

            for chat in chats {
                let title = if chat.title.chars().count() > TITLE_WIDTH {
                    let cut: String = chat.title.chars().take(TITLE_WIDTH - 3).collect();
                    format!("{}...", cut)
                } else {
                    chat.title
                };
                let updated = chat.updated_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    chat.id.to_string().cyan(),
                    title,
                    chat.messages.len(),
                    updated
                ]);
            }

            println!("\nChat History:");
            table.printstd();
            println!();
            println!(
                "Use {} to continue a session.",
                "saathi ask --chat <ID> <QUERY>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let chat = store
                .get_chat(id)?
                .ok_or_else(|| SaathiError::NotFound(format!("Chat session {}", id)))?;

            println!("{}", chat.title.bold());
            println!(
                "{}",
                chat.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed()
            );
            println!();
            for message in &chat.messages {
                let speaker = match message.role {
                    Role::User => "You".green().bold(),
                    Role::Assistant => "Saathi".cyan().bold(),
                };
                println!("{}: {}", speaker, message.content);
                println!();
            }
        }
        HistoryCommand::Delete { id } => {
            if store.delete_chat(id)? {
                println!("{}", format!("Deleted chat session {}", id).green());
            } else {
                println!("{}", format!("No chat session {}", id).yellow());
            }
        }
    }

    Ok(())
}

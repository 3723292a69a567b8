//! Command-line interface definition for Shikshak Saathi
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the API server, the offline coaching client,
//! local history management and the offline application shell.

use clap::{Parser, Subcommand};

/// Shikshak Saathi - bilingual teaching coach
///
/// Runs the coaching API server or talks to it as an offline-first client.
#[derive(Parser, Debug, Clone)]
#[command(name = "saathi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the coaching API base URL (e.g. http://localhost:3001/api)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Override the local database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Shikshak Saathi
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the coaching API server
    Serve {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,

        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the coach a question (works offline)
    Ask {
        /// The question to ask
        query: String,

        /// Treat the connection as offline without probing the API
        #[arg(long)]
        offline: bool,

        /// Display language for notices (en, hi)
        #[arg(short, long)]
        language: Option<String>,

        /// Continue a stored chat session
        #[arg(long, conflicts_with = "new")]
        chat: Option<u64>,

        /// Start a new chat session instead of continuing the latest one
        #[arg(long)]
        new: bool,
    },

    /// Manage stored chat sessions
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Inspect or sync queries saved while offline
    Pending {
        /// Pending queue subcommand
        #[command(subcommand)]
        command: PendingCommand,
    },

    /// Maintain the offline response cache
    Cache {
        /// Cache subcommand
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Read or write client settings
    Settings {
        /// Settings subcommand
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Manage the cached offline application shell
    Shell {
        /// Shell subcommand
        #[command(subcommand)]
        command: ShellCommand,
    },
}

/// Chat history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored chat sessions
    List,

    /// Show the transcript of a chat session
    Show {
        /// Chat session ID
        id: u64,
    },

    /// Delete a chat session
    Delete {
        /// Chat session ID
        id: u64,
    },
}

/// Pending queue subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PendingCommand {
    /// List queries waiting for a connection
    List,

    /// Send queued queries to the coaching API
    Sync,
}

/// Response cache subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommand {
    /// Delete cached responses older than the TTL
    Sweep {
        /// Age in days (defaults to client.cache_ttl_days)
        #[arg(long)]
        days: Option<u32>,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print a setting
    Get {
        /// Setting key
        key: String,
    },

    /// Store a setting (value is parsed as JSON, otherwise kept as a string)
    Set {
        /// Setting key
        key: String,

        /// Setting value
        value: String,
    },
}

/// Application shell subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ShellCommand {
    /// Pre-cache the application shell and activate it
    Install {
        /// Origin serving the web app (defaults to client.shell_origin)
        #[arg(long)]
        origin: Option<String>,
    },

    /// Fetch a path through the offline cache strategy
    Fetch {
        /// Request path (e.g. /coach or /api/health)
        path: String,

        /// Treat the request as a page navigation
        #[arg(long)]
        navigate: bool,

        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,

        /// Origin serving the web app (defaults to client.shell_origin)
        #[arg(long)]
        origin: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["saathi", "serve", "--port", "8080"]).unwrap();
        if let Commands::Serve { host, port } = cli.command {
            assert_eq!(host, None);
            assert_eq!(port, Some(8080));
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_ask() {
        let cli = Cli::try_parse_from([
            "saathi",
            "ask",
            "How do I teach zero?",
            "--offline",
            "--language",
            "hi",
        ])
        .unwrap();
        if let Commands::Ask {
            query,
            offline,
            language,
            chat,
            new,
        } = cli.command
        {
            assert_eq!(query, "How do I teach zero?");
            assert!(offline);
            assert_eq!(language, Some("hi".to_string()));
            assert_eq!(chat, None);
            assert!(!new);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_ask_chat_conflicts_with_new() {
        let cli = Cli::try_parse_from(["saathi", "ask", "hello", "--chat", "3", "--new"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_history_show() {
        let cli = Cli::try_parse_from(["saathi", "history", "show", "42"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::Show { id },
        } = cli.command
        {
            assert_eq!(id, 42);
        } else {
            panic!("Expected History Show command");
        }
    }

    #[test]
    fn test_cli_global_db_path() {
        let cli =
            Cli::try_parse_from(["saathi", "pending", "list", "--db-path", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db_path, Some("/tmp/x.db".to_string()));
        assert!(matches!(
            cli.command,
            Commands::Pending {
                command: PendingCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_cache_sweep_days() {
        let cli = Cli::try_parse_from(["saathi", "cache", "sweep", "--days", "3"]).unwrap();
        if let Commands::Cache {
            command: CacheCommand::Sweep { days },
        } = cli.command
        {
            assert_eq!(days, Some(3));
        } else {
            panic!("Expected Cache Sweep command");
        }
    }

    #[test]
    fn test_cli_parse_shell_fetch_defaults() {
        let cli =
            Cli::try_parse_from(["saathi", "shell", "fetch", "/coach", "--navigate"]).unwrap();
        if let Commands::Shell {
            command:
                ShellCommand::Fetch {
                    path,
                    navigate,
                    method,
                    origin,
                },
        } = cli.command
        {
            assert_eq!(path, "/coach");
            assert!(navigate);
            assert_eq!(method, "GET");
            assert_eq!(origin, None);
        } else {
            panic!("Expected Shell Fetch command");
        }
    }

    #[test]
    fn test_cli_parse_settings_set() {
        let cli = Cli::try_parse_from(["saathi", "settings", "set", "language", "\"hi\""]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::Set { .. }
            }
        ));
    }
}

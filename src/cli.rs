//! Command-line interface definition for Nexus
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! history inspection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nexus - chat with Gemini from the terminal
///
/// Conversations are kept in a local JSON history file and can be
/// reopened, retitled and edited later.
#[derive(Parser, Debug, Clone)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat history file location
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Nexus
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session with history
    Chat {
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Reopen a stored chat by id (or unique id prefix)
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Ask a single question without saving anything
    Ask {
        /// The question to send
        prompt: String,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Inspect stored chats
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored chats, most recent first
    List,

    /// Print every turn of a stored chat
    Show {
        /// Chat id or unique id prefix
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            history_file: None,
            command: Commands::Chat {
                model: None,
                resume: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.history_file.is_none());
        assert!(matches!(
            cli.command,
            Commands::Chat {
                model: None,
                resume: None
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["nexus", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_with_model_and_resume() {
        let cli =
            Cli::try_parse_from(["nexus", "chat", "--model", "gemini-pro", "--resume", "01HZ"])
                .unwrap();
        if let Commands::Chat { model, resume } = cli.command {
            assert_eq!(model, Some("gemini-pro".to_string()));
            assert_eq!(resume, Some("01HZ".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_ask() {
        let cli = Cli::try_parse_from(["nexus", "ask", "What is 2+2?"]).unwrap();
        if let Commands::Ask { prompt, model } = cli.command {
            assert_eq!(prompt, "What is 2+2?");
            assert_eq!(model, None);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_parse_ask_requires_prompt() {
        assert!(Cli::try_parse_from(["nexus", "ask"]).is_err());
    }

    #[test]
    fn test_cli_parse_history_list() {
        let cli = Cli::try_parse_from(["nexus", "history", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_history_show() {
        let cli = Cli::try_parse_from(["nexus", "history", "show", "abc"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::Show { id },
        } = cli.command
        {
            assert_eq!(id, "abc");
        } else {
            panic!("Expected History Show command");
        }
    }

    #[test]
    fn test_cli_history_file_is_global() {
        let cli =
            Cli::try_parse_from(["nexus", "history", "list", "--history-file", "/tmp/h.json"])
                .unwrap();
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/h.json")));
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli = Cli::try_parse_from(["nexus", "-v", "--config", "custom.yaml", "chat"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["nexus"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["nexus", "invalid"]).is_err());
    }
}

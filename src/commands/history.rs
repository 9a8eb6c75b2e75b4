use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{NexusError, Result};
use crate::storage::{self, ChatRecord, Role};
use colored::Colorize;
use prettytable::{format, Table};

const TITLE_COLUMN_WIDTH: usize = 40;

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = super::open_store(config)?;
    let records = store.load_all();

    match command {
        HistoryCommand::List => {
            if records.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            println!("\nConversation History:");
            history_table(&records).printstd();
            println!();
            println!(
                "Use {} to reopen a chat.",
                "nexus chat --resume <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let record = storage::find(&records, &id).ok_or(NexusError::ChatNotFound(id))?;
            print_chat(record);
        }
    }

    Ok(())
}

/// Build a table of stored chats, most recent first
pub fn history_table(records: &[ChatRecord]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "#".bold(),
        "ID".bold(),
        "Title".bold(),
        "Turns".bold(),
        "Created".bold()
    ]);

    for (n, record) in records.iter().rev().enumerate() {
        let created = record
            .created_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(prettytable::row![
            n + 1,
            record.id.cyan(),
            clip(&record.title, TITLE_COLUMN_WIDTH),
            record.messages.len(),
            created
        ]);
    }

    table
}

/// Print a whole chat with role-colored speakers
pub fn print_chat(record: &ChatRecord) {
    println!();
    println!("{} {}", record.title.bold(), format!("({})", record.id).dimmed());
    println!();
    for (n, turn) in record.messages.iter().enumerate() {
        let speaker = match turn.role {
            Role::User => "you".green().bold(),
            Role::Model => "ai".purple().bold(),
        };
        println!("{:>3}. {}: {}", n + 1, speaker, turn.content);
    }
    println!();
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

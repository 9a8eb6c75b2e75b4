//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` are session commands rather than questions.
//! They map onto the chat session events: start a new chat, open one from
//! history, edit a stored chat, save, cancel, and leave.
//!
//! Commands are case-insensitive; arguments are kept verbatim.

use crate::storage::Role;
use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new, empty chat
    NewChat,

    /// List stored chats, most recent first
    ListHistory,

    /// Open a stored chat by list number, id, or id prefix
    Open(String),

    /// Start editing a stored chat by list number, id, or id prefix
    Edit(String),

    /// Set the title of the chat being edited
    SetTitle(String),

    /// Set the speaker of a turn in the chat being edited
    SetRole {
        /// 1-based turn number
        turn: usize,
        /// New speaker
        role: Role,
    },

    /// Replace the text of a turn in the chat being edited
    SetContent {
        /// 1-based turn number
        turn: usize,
        /// New text
        content: String,
    },

    /// Print the edit draft
    ShowDraft,

    /// Save the edit draft over the stored chat
    SaveEdit,

    /// Discard the edit draft
    CancelEdit,

    /// Store the current chat if it is not already stored
    Save,

    /// Reprint the current chat
    Show,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; the input is a question
    None,
}

/// Parse a user input string into a special command
///
/// # Returns
///
/// Returns `SpecialCommand::None` for input that does not start with `/`.
///
/// # Errors
///
/// Returns `CommandError` for unknown commands or bad arguments.
///
/// # Examples
///
/// ```
/// use nexus::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("/open 2").unwrap(),
///     SpecialCommand::Open("2".to_string())
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };
    let command = command.to_lowercase();

    match command.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/history" | "/list" => Ok(SpecialCommand::ListHistory),
        "/open" | "/select" => {
            require_arg(&command, rest, "/open <number|id>")?;
            Ok(SpecialCommand::Open(rest.to_string()))
        }
        "/edit" => {
            require_arg(&command, rest, "/edit <number|id>")?;
            Ok(SpecialCommand::Edit(rest.to_string()))
        }
        "/title" => {
            require_arg(&command, rest, "/title <new title>")?;
            Ok(SpecialCommand::SetTitle(rest.to_string()))
        }
        "/role" => {
            let usage = "/role <turn> <user|ai>";
            require_arg(&command, rest, usage)?;
            let (turn, role) = split_turn_arg(&command, rest, usage)?;
            let role = Role::parse_str(role).map_err(|_| CommandError::UnsupportedArgument {
                command: command.clone(),
                arg: role.to_string(),
            })?;
            Ok(SpecialCommand::SetRole { turn, role })
        }
        "/content" => {
            let usage = "/content <turn> <text>";
            require_arg(&command, rest, usage)?;
            let (turn, content) = split_turn_arg(&command, rest, usage)?;
            Ok(SpecialCommand::SetContent {
                turn,
                content: content.to_string(),
            })
        }
        "/draft" => Ok(SpecialCommand::ShowDraft),
        "/done" => Ok(SpecialCommand::SaveEdit),
        "/cancel" => Ok(SpecialCommand::CancelEdit),
        "/save" => Ok(SpecialCommand::Save),
        "/show" => Ok(SpecialCommand::Show),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn require_arg(command: &str, rest: &str, usage: &str) -> Result<(), CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        });
    }
    Ok(())
}

/// Split `<turn> <value>` where turn is a 1-based number
fn split_turn_arg<'a>(
    command: &str,
    rest: &'a str,
    usage: &str,
) -> Result<(usize, &'a str), CommandError> {
    let (turn, value) = match rest.split_once(char::is_whitespace) {
        Some((turn, value)) => (turn, value.trim()),
        None => {
            return Err(CommandError::MissingArgument {
                command: command.to_string(),
                usage: usage.to_string(),
            })
        }
    };

    match turn.parse::<usize>() {
        Ok(n) if n > 0 => Ok((n, value)),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: turn.to_string(),
        }),
    }
}

/// Print help for the interactive session
pub fn print_help() {
    println!();
    println!("{}", "Chat".bold());
    println!("  <text>                     Send a question");
    println!("  /new                       Start a new chat");
    println!("  /show                      Reprint the current chat");
    println!("  /save                      Store the current chat");
    println!();
    println!("{}", "History".bold());
    println!("  /history                   List stored chats, newest first");
    println!("  /open <number|id>          Open a stored chat");
    println!();
    println!("{}", "Editing".bold());
    println!("  /edit <number|id>          Edit a stored chat");
    println!("  /title <text>              Set the title");
    println!("  /role <turn> <user|ai>     Set who said a turn");
    println!("  /content <turn> <text>     Replace the text of a turn");
    println!("  /draft                     Show the draft");
    println!("  /done                      Save changes");
    println!("  /cancel                    Discard changes");
    println!();
    println!("  /help                      Show this help");
    println!("  /exit                      Leave the session");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(
            parse_special_command("What is 2+2?").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_simple_commands_case_insensitive() {
        assert_eq!(parse_special_command("/NEW").unwrap(), SpecialCommand::NewChat);
        assert_eq!(
            parse_special_command("/History").unwrap(),
            SpecialCommand::ListHistory
        );
        assert_eq!(parse_special_command("/done").unwrap(), SpecialCommand::SaveEdit);
        assert_eq!(
            parse_special_command("/cancel").unwrap(),
            SpecialCommand::CancelEdit
        );
        assert_eq!(parse_special_command("/save").unwrap(), SpecialCommand::Save);
        assert_eq!(parse_special_command("/quit").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_open_and_edit_keep_argument() {
        assert_eq!(
            parse_special_command("/open 01HZX3").unwrap(),
            SpecialCommand::Open("01HZX3".to_string())
        );
        assert_eq!(
            parse_special_command("/edit   3 ").unwrap(),
            SpecialCommand::Edit("3".to_string())
        );
    }

    #[test]
    fn test_open_requires_argument() {
        assert!(matches!(
            parse_special_command("/open"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_title_keeps_spaces() {
        assert_eq!(
            parse_special_command("/title My  renamed chat").unwrap(),
            SpecialCommand::SetTitle("My  renamed chat".to_string())
        );
    }

    #[test]
    fn test_role_parses_turn_and_role() {
        assert_eq!(
            parse_special_command("/role 2 user").unwrap(),
            SpecialCommand::SetRole {
                turn: 2,
                role: Role::User
            }
        );
        assert_eq!(
            parse_special_command("/role 1 AI").unwrap(),
            SpecialCommand::SetRole {
                turn: 1,
                role: Role::Model
            }
        );
    }

    #[test]
    fn test_role_rejects_bad_values() {
        assert!(matches!(
            parse_special_command("/role 1 system"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/role 0 user"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/role 1"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_content_keeps_text() {
        assert_eq!(
            parse_special_command("/content 3 It is four.").unwrap(),
            SpecialCommand::SetContent {
                turn: 3,
                content: "It is four.".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_special_command("/frobnicate now").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/frobnicate".to_string()));
        assert!(err.to_string().contains("/help"));
    }
}

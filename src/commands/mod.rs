/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`:    Interactive chat with history, selection and editing
- `ask`:     A single question, nothing stored
- `history`: List and print stored chats

These handlers stay small: the rules live in `session`, the file format in
`storage`, and the remote call in `providers`.
*/

use crate::config::Config;
use crate::error::Result;
use crate::storage::JsonStore;

// Special commands parser for the chat REPL
pub mod special_commands;

// History listing and printing
pub mod history;

/// Open the history store named by configuration, or the default one
pub fn open_store(config: &Config) -> Result<JsonStore> {
    match &config.storage.history_file {
        Some(path) => JsonStore::new_with_path(path.clone()),
        None => JsonStore::new(),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Loads the history, creates the provider (or records why it is
    //! unavailable), and runs a readline loop. Slash commands drive the
    //! session controller; everything else is submitted as a question.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::error::NexusError;
    use crate::providers::create_provider;
    use crate::session::{SessionController, SessionPhase, SessionState};
    use crate::storage::Role;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `resume` - Optional stored chat to open first (id or id prefix)
    ///
    /// # Errors
    ///
    /// Only setup failures (store location, terminal) end the session.
    /// Errors from individual actions are printed and the loop continues.
    pub async fn run_chat(config: Config, resume: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let store = open_store(&config)?;
        let controller = SessionController::from_provider_result(store, create_provider(&config));
        let mut state = controller.start();

        print_welcome_banner(&controller, &state);

        if let Some(id) = resume.as_deref() {
            match controller.select(&mut state, id) {
                Ok(()) => super::history::print_chat(state.current()),
                Err(e) => print_error(&e),
            }
        }

        let mut rl = DefaultEditor::new()?;

        loop {
            let prompt = format_prompt(&state);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            println!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            handle_submit(&controller, &mut state, trimmed).await;
                        }
                        other => {
                            if let Err(e) = handle_command(&controller, &mut state, other) {
                                print_error(&e);
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        if state.editing().is_some() {
            println!("{}", "Unsaved edits were discarded.".yellow());
        }
        tracing::info!("Chat session ended");
        Ok(())
    }

    async fn handle_submit(controller: &SessionController, state: &mut SessionState, question: &str) {
        match controller.submit(state, question).await {
            Ok(outcome) => {
                println!("\n{} {}\n", "ai:".purple().bold(), outcome.reply);
                if outcome.title_changed {
                    tracing::debug!("Chat titled \"{}\"", state.current().title);
                }
            }
            Err(e) => {
                // The exchange happened; only the write failed.
                if matches!(e.downcast_ref::<NexusError>(), Some(NexusError::StorageWrite(_))) {
                    if let Some(turn) = state.current().messages.last() {
                        println!("\n{} {}\n", "ai:".purple().bold(), turn.content);
                    }
                }
                print_error(&e);
            }
        }
    }

    fn handle_command(
        controller: &SessionController,
        state: &mut SessionState,
        command: SpecialCommand,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewChat => {
                controller.new_chat(state);
                println!("{}\n", "Started a new chat.".green());
            }
            SpecialCommand::ListHistory => print_history(state),
            SpecialCommand::Open(target) => {
                let id = resolve_chat(state, &target)?;
                controller.select(state, &id)?;
                super::history::print_chat(state.current());
            }
            SpecialCommand::Edit(target) => {
                let id = resolve_chat(state, &target)?;
                controller.edit(state, &id)?;
                print_draft(state)?;
                println!(
                    "Use {}, {} or {}, then {} or {}.\n",
                    "/title".cyan(),
                    "/role".cyan(),
                    "/content".cyan(),
                    "/done".cyan(),
                    "/cancel".cyan()
                );
            }
            SpecialCommand::SetTitle(title) => {
                draft_mut(state)?.set_title(title);
            }
            SpecialCommand::SetRole { turn, role } => {
                draft_mut(state)?.set_role(turn - 1, role)?;
            }
            SpecialCommand::SetContent { turn, content } => {
                draft_mut(state)?.set_content(turn - 1, content)?;
            }
            SpecialCommand::ShowDraft => print_draft(state)?,
            SpecialCommand::SaveEdit => {
                controller.save_edit(state)?;
                println!("{}\n", "Chat updated!".green());
            }
            SpecialCommand::CancelEdit => {
                if controller.cancel_edit(state) {
                    println!("{}\n", "Edit cancelled.".yellow());
                } else {
                    return Err(NexusError::NotEditing.into());
                }
            }
            SpecialCommand::Save => {
                if controller.save(state)? {
                    println!("{}\n", "Chat saved!".green());
                } else {
                    println!("Nothing new to save.\n");
                }
            }
            SpecialCommand::Show => super::history::print_chat(state.current()),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    /// Turn a `/open` or `/edit` argument into a chat id
    ///
    /// An exact id always wins. Otherwise a number within the `/history`
    /// listing picks from it (1 = most recent), and anything else is passed
    /// through as an id or id prefix. Timestamp ids are all digits, so a
    /// number past the end of the listing is treated as an id prefix.
    pub fn resolve_chat(state: &SessionState, target: &str) -> Result<String> {
        if state.records().iter().any(|r| r.id == target) {
            return Ok(target.to_string());
        }

        if let Ok(n) = target.parse::<usize>() {
            if (1..=state.records().len()).contains(&n) {
                if let Some(record) = state.history().nth(n - 1) {
                    return Ok(record.id.clone());
                }
            }
        }
        Ok(target.to_string())
    }

    fn draft_mut(state: &mut SessionState) -> Result<&mut crate::session::EditDraft> {
        state
            .editing_mut()
            .ok_or_else(|| NexusError::NotEditing.into())
    }

    fn print_draft(state: &SessionState) -> Result<()> {
        let draft = state.editing().ok_or(NexusError::NotEditing)?;
        println!();
        println!("{} {}", "Editing:".bold(), draft.title());
        for (n, turn) in draft.messages().iter().enumerate() {
            let role = match turn.role {
                Role::User => "user".green(),
                Role::Model => "ai".purple(),
            };
            println!("{:>3}. [{}] {}", n + 1, role, turn.content);
        }
        println!();
        Ok(())
    }

    fn print_history(state: &SessionState) {
        if state.records().is_empty() {
            println!("{}\n", "No conversation history found.".yellow());
            return;
        }
        println!();
        for (n, record) in state.history().enumerate() {
            let marker = if record.id == state.current().id {
                "*".green()
            } else {
                " ".normal()
            };
            println!(
                "{}{:>3}. {} {}",
                marker,
                n + 1,
                record.title,
                format!("({} turns)", record.messages.len()).dimmed()
            );
        }
        println!();
    }

    fn format_prompt(state: &SessionState) -> String {
        match state.phase() {
            SessionPhase::Fresh => format!("[{}] >>> ", "NEW".cyan()),
            SessionPhase::Active => format!("[{}] >>> ", state.current().title.green()),
            SessionPhase::Editing => {
                let title = state.editing().map(|d| d.title()).unwrap_or_default();
                format!("[{} {}] >>> ", "EDIT".yellow(), title)
            }
        }
    }

    fn print_welcome_banner(controller: &SessionController, state: &SessionState) {
        println!();
        println!("{}", "Nexus AI".bold());
        match controller.model_name() {
            Some(model) => println!("Model: {}", model.cyan()),
            None => {
                let reason = controller.unavailable_reason().unwrap_or_default();
                println!("{} {}", "API key not configured:".red().bold(), reason);
                println!("History is available; questions cannot be sent.");
            }
        }
        println!(
            "History: {} ({} chats)",
            controller.store().path().display(),
            state.records().len()
        );
        println!("Type {} for commands.", "/help".cyan());
        println!();
    }

    fn print_error(e: &anyhow::Error) {
        println!("{}\n", format!("Error: {}", e).red());
    }

}

// One-shot question handler
pub mod ask {
    //! History-less question mode.
    //!
    //! Sends one prompt, prints the reply, stores nothing. Unlike the chat
    //! session a missing API key is fatal here, since there is nothing else
    //! the command can do.

    use super::*;
    use crate::error::NexusError;
    use crate::providers::create_provider;

    /// Ask a single question and print the answer
    ///
    /// # Errors
    ///
    /// Returns error for an empty prompt, a missing credential, or a failed
    /// generation call
    pub async fn run_ask(config: Config, prompt: String) -> Result<()> {
        if prompt.trim().is_empty() {
            return Err(NexusError::EmptyPrompt.into());
        }

        let provider = create_provider(&config)?;
        tracing::info!("Asking {} a single question", provider.model_name());

        let reply = provider.generate(&prompt).await?;
        println!("{}", reply);
        Ok(())
    }
}

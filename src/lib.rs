//! Nexus - terminal chat front-end for Gemini
//!
//! This library provides the pieces behind the `nexus` binary: the chat
//! history file, the session rules that decide when a chat is created,
//! titled, stored and edited, and the generation provider.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Chat records and the JSON history file
//! - `session`: Session state and the controller that drives it
//! - `providers`: Generation provider abstraction and the Gemini client
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers for the CLI commands
//!
//! # Example
//!
//! ```no_run
//! use nexus::{Config, SessionController};
//! use nexus::providers::create_provider;
//! use nexus::storage::JsonStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let store = JsonStore::new()?;
//!     let controller = SessionController::from_provider_result(store, create_provider(&config));
//!     let mut state = controller.start();
//!     let outcome = controller.submit(&mut state, "What is 2+2?").await?;
//!     println!("{}", outcome.reply);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{NexusError, Result};
pub use session::{SessionController, SessionPhase, SessionState};
pub use storage::{ChatRecord, JsonStore, Role, Turn};

#[cfg(test)]
pub mod test_utils;

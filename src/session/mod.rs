//! Chat session management
//!
//! The controller owns the rules (when to title, when to store, how edits
//! are applied); the state owns the data for one interactive session.

pub mod controller;
pub mod state;

pub use controller::{SessionController, SubmitOutcome};
pub use state::{EditDraft, SessionPhase, SessionState};

//! Base provider trait for Nexus
//!
//! A provider turns one prompt into one reply. The session controller only
//! ever talks to this trait, so tests can substitute a mock.

use crate::error::Result;
use async_trait::async_trait;

/// Text generation backend
///
/// Implementations report every failure (transport, HTTP status, quota,
/// unexpected payload) as [`crate::error::NexusError::Generation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a reply for a single prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - The user's question, sent verbatim
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails or yields no text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model answering, for display
    fn model_name(&self) -> String;
}

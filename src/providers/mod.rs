//! Provider module for Nexus
//!
//! This module contains the generation provider abstraction and the
//! Gemini implementation.

pub mod base;
pub mod gemini;

pub use base::Provider;
pub use gemini::GeminiProvider;

#[cfg(test)]
pub use base::MockProvider;

use crate::config::Config;
use crate::error::Result;

/// Create the configured provider
///
/// # Errors
///
/// Returns [`crate::error::NexusError::Config`] when the API key
/// environment variable is unset, or an error if the HTTP client cannot be
/// built. Callers treat either as "generation unavailable" rather than a
/// fatal error.
pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let api_key = config.api_key()?;
    Ok(Box::new(GeminiProvider::new(
        config.provider.clone(),
        api_key,
    )?))
}

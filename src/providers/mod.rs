//! Provider module for Maguai
//!
//! This module contains the upstream provider abstraction and the Gemini
//! implementation.

pub mod base;
pub mod gemini;

pub use base::{
    FaultKind, GenerateRequest, GenerateResponse, GenerationConfig, Provider, ThinkingConfig,
    TokenUsage, Turn, TurnRole, UpstreamFault,
};
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::{MaguaiError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini")
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match provider_type {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone())?)),
        _ => Err(MaguaiError::Provider(format!("Unknown provider type: {}", provider_type)).into()),
    }
}

//! Provider resolution and lazy construction.
//!
//! Resolves a provider name to a concrete implementation, constructing it
//! only when requested so that a misconfigured provider never takes down the
//! process: an unknown name or missing credential comes back as a typed
//! `Configuration` error and nothing is built.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AssistantError;
use crate::llm::providers::{GeminiProvider, GroqProvider};
use crate::llm::traits::{AiProvider, ProviderType};

/// Construct a provider instance for the given type.
///
/// `api_key` overrides the provider's environment fallback; `model`
/// overrides the provider default.
pub fn create_provider(
    provider: ProviderType,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Arc<dyn AiProvider>, AssistantError> {
    let provider: Arc<dyn AiProvider> = match provider {
        ProviderType::Gemini => Arc::new(GeminiProvider::new(api_key, model)?),
        ProviderType::Groq => Arc::new(GroqProvider::new(api_key, model)?),
    };
    tracing::info!(
        provider = %provider.provider_type(),
        model = %provider.model_id(),
        "constructed provider"
    );
    Ok(provider)
}

/// Construct the provider selected by `settings`.
pub fn provider_from_settings(settings: &Settings) -> Result<Arc<dyn AiProvider>, AssistantError> {
    create_provider(
        settings.active_provider,
        settings
            .api_key_for(settings.active_provider)
            .map(String::from),
        settings.active_model.clone(),
    )
}

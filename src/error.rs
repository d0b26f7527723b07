//! Error types for the assistant core.
//!
//! The taxonomy mirrors how failures are handled, not just where they occur:
//!
//! - [`AssistantError::Configuration`] happens at provider construction
//!   (unknown provider name, missing credential) and is the only error a
//!   caller of the public facade can observe, via an explicit rebuild.
//! - [`AssistantError::ProviderCall`] covers any live network/API failure.
//!   It is always absorbed inside the core and converted into a heuristic
//!   result; it never escapes `chat`, `analyze_concept`, or `generate`.
//! - [`AssistantError::OutputParse`] means the provider answered but its
//!   text carried no usable structured payload. It is converted into the
//!   fixed recovery analysis, distinct from the heuristic fallback.

use crate::llm::traits::ProviderType;

/// Unified error type for provider construction and provider calls.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Unknown provider, missing credential, or unbuildable HTTP client.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A live provider call failed (network, HTTP status, malformed body).
    #[error("{provider} call failed: {message}")]
    ProviderCall {
        provider: ProviderType,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered but the reply held no parseable payload.
    #[error("could not parse structured output: {message}")]
    OutputParse { message: String },
}

impl AssistantError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn provider_call(provider: ProviderType, message: impl Into<String>) -> Self {
        Self::ProviderCall {
            provider,
            message: message.into(),
            source: None,
        }
    }

    pub fn provider_call_with_source(
        provider: ProviderType,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ProviderCall {
            provider,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn output_parse(message: impl Into<String>) -> Self {
        Self::OutputParse {
            message: message.into(),
        }
    }

    /// True for construction-time failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// True for live-call failures.
    pub fn is_provider_call(&self) -> bool {
        matches!(self, Self::ProviderCall { .. })
    }

    /// True when a reply could not be parsed as structured output.
    pub fn is_output_parse(&self) -> bool {
        matches!(self, Self::OutputParse { .. })
    }
}

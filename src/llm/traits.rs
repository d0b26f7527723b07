//! Core trait for the provider abstraction layer.
//!
//! Every generative-text backend implements [`AiProvider`]; callers only ever
//! see this contract. Providers own all protocol details: request formatting,
//! role mapping, response parsing, and the decision to fall through to the
//! heuristic engine when a live call fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AssistantError;
use crate::types::{AnalysisReply, ChatMessage, ChatReply, HealthStatus, ModelInfo};

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Google Gemini via the Generative Language REST API.
    Gemini,
    /// Groq via its OpenAI-compatible REST API.
    Groq,
}

impl ProviderType {
    /// Stable string identifier, as used in configuration and reply metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini",
            ProviderType::Groq => "groq",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderType::Gemini),
            "groq" => Ok(ProviderType::Groq),
            other => Err(AssistantError::configuration(format!(
                "unknown provider: {other}. Available providers: gemini, groq"
            ))),
        }
    }
}

/// Sampling options for a single request.
///
/// Each option is forwarded to the provider only when supplied; an absent
/// option means the provider's own default applies, not a core-imposed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

/// Polymorphic contract every provider implements.
///
/// `chat` and `analyze_concept` are infallible by design: a transient
/// provider failure is absorbed and answered by the heuristic engine, and
/// the reply's metadata records which path produced it (`provider == "demo"`
/// for the heuristic). `generate` and `generate_with_context` surface
/// [`AssistantError::ProviderCall`] and leave recovery to the facade.
#[async_trait]
pub trait AiProvider: Send + Sync + std::fmt::Debug {
    /// Single-shot completion for a raw prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError>;

    /// Completion with optional system instructions and context material,
    /// composed into the provider's native call shape.
    async fn generate_with_context(
        &self,
        prompt: &str,
        context: Option<&str>,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError>;

    /// Mentor Mode: multi-turn tutoring over ordered history.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        topic: &str,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> ChatReply;

    /// Concept Mirror Mode: structured critique of a concept explanation.
    async fn analyze_concept(
        &self,
        concept_name: &str,
        user_explanation: &str,
        options: &GenerateOptions,
    ) -> AnalysisReply;

    /// Descriptor of the current provider/model configuration.
    fn model_info(&self) -> ModelInfo;

    /// Connectivity probe: a minimal live completion with timing.
    async fn health_check(&self) -> HealthStatus;

    /// Which backend this is.
    fn provider_type(&self) -> ProviderType;

    /// Model identifier currently in use.
    fn model_id(&self) -> &str;
}

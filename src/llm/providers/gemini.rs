//! Google Gemini provider implementation.
//!
//! Talks to the Generative Language REST API (`generateContent`). Gemini has
//! no first-class system role, so both interaction modes use the priming
//! strategy: the persona is injected as a synthetic leading `user` turn
//! followed by a canned `model` acknowledgment, ahead of the real history.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Settings;
use crate::demo;
use crate::error::AssistantError;
use crate::llm::extract;
use crate::llm::traits::{AiProvider, GenerateOptions, ProviderType};
use crate::prompts;
use crate::types::{AnalysisReply, ChatMessage, ChatReply, HealthStatus, MessageRole, ModelInfo};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider.
#[derive(Debug)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Default model when no override is configured.
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    /// Create a new Gemini provider.
    ///
    /// The credential resolves from the explicit argument first, then the
    /// `GOOGLE_API_KEY` / `GEMINI_API_KEY` environment variables; failing
    /// both is a `Configuration` error, returned rather than panicked so
    /// other providers stay usable.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, AssistantError> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AssistantError::configuration(
                    "Gemini API key is required. Provide it directly or set \
                     GOOGLE_API_KEY or GEMINI_API_KEY",
                )
            })?;

        let client = reqwest::Client::builder().build().map_err(|e| {
            AssistantError::configuration(format!("could not build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Create a provider from settings, honoring the model override.
    pub fn from_settings(settings: &Settings) -> Result<Self, AssistantError> {
        Self::new(
            settings.api_key_for(ProviderType::Gemini).map(String::from),
            settings.active_model.clone(),
        )
    }

    /// Build `generationConfig` from explicitly supplied options only.
    fn generation_config(options: &GenerateOptions) -> Value {
        let mut config = serde_json::Map::new();
        if let Some(temperature) = options.temperature {
            config.insert("temperature".into(), json!(temperature));
        }
        if let Some(max_output_tokens) = options.max_output_tokens {
            config.insert("maxOutputTokens".into(), json!(max_output_tokens));
        }
        if let Some(top_p) = options.top_p {
            config.insert("topP".into(), json!(top_p));
        }
        if let Some(top_k) = options.top_k {
            config.insert("topK".into(), json!(top_k));
        }
        Value::Object(config)
    }

    /// Normalize Mentor Mode history into Gemini `contents`.
    ///
    /// Priming pair first, then the real turns with `User -> "user"` and
    /// everything else `-> "model"`.
    pub(crate) fn chat_contents(
        messages: &[ChatMessage],
        topic: &str,
        system_prompt: Option<&str>,
    ) -> Vec<Value> {
        let persona = system_prompt.unwrap_or(prompts::MENTOR_SYSTEM_PROMPT);
        let mut contents = vec![
            json!({"role": "user", "parts": [{"text": persona}]}),
            json!({"role": "model", "parts": [{"text": prompts::mentor_priming_ack(topic)}]}),
        ];
        contents.extend(messages.iter().map(|msg| {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            };
            json!({"role": role, "parts": [{"text": msg.content}]})
        }));
        contents
    }

    /// Normalize a Concept Mirror request into Gemini `contents`.
    pub(crate) fn analysis_contents(concept_name: &str, user_explanation: &str) -> Vec<Value> {
        vec![
            json!({"role": "user", "parts": [{"text": prompts::CONCEPT_MIRROR_SYSTEM_PROMPT}]}),
            json!({"role": "model", "parts": [{"text": prompts::concept_mirror_ack()}]}),
            json!({
                "role": "user",
                "parts": [{"text": prompts::concept_mirror_prompt(concept_name, user_explanation)}],
            }),
        ]
    }

    /// Issue a `generateContent` call and pull the text out of the reply.
    async fn generate_content(
        &self,
        contents: Vec<Value>,
        generation_config: Value,
    ) -> Result<String, AssistantError> {
        let mut request_body = json!({ "contents": contents });
        if generation_config
            .as_object()
            .is_some_and(|c| !c.is_empty())
        {
            request_body["generationConfig"] = generation_config;
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        tracing::debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AssistantError::provider_call_with_source(
                    ProviderType::Gemini,
                    format!("request failed: {e}"),
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AssistantError::provider_call(
                ProviderType::Gemini,
                format!("API error {status}: {error_text}"),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            AssistantError::provider_call_with_source(
                ProviderType::Gemini,
                format!("unreadable response body: {e}"),
                e,
            )
        })?;

        let parts = body["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                AssistantError::provider_call(
                    ProviderType::Gemini,
                    "response carried no candidates",
                )
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        if text.is_empty() {
            return Err(AssistantError::provider_call(
                ProviderType::Gemini,
                "response carried no text parts",
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError> {
        let contents = vec![json!({"role": "user", "parts": [{"text": prompt}]})];
        self.generate_content(contents, Self::generation_config(options))
            .await
    }

    async fn generate_with_context(
        &self,
        prompt: &str,
        context: Option<&str>,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError> {
        // Gemini has no system field here; compose one combined prompt.
        let mut full_prompt = String::new();
        if let Some(system) = system_prompt {
            full_prompt.push_str(&format!("Instructions: {system}\n\n"));
        }
        if let Some(context) = context {
            full_prompt.push_str(&format!("Context:\n{context}\n\n"));
        }
        full_prompt.push_str(&format!("User Query: {prompt}"));

        self.generate(&full_prompt, options).await
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        topic: &str,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> ChatReply {
        let contents = Self::chat_contents(messages, topic, system_prompt);
        let generation_config = json!({
            "temperature": options.temperature.unwrap_or(0.8),
            "topK": options.top_k.unwrap_or(40),
            "topP": options.top_p.unwrap_or(0.95),
            "maxOutputTokens": options.max_output_tokens.unwrap_or(4096),
        });

        match self.generate_content(contents, generation_config).await {
            Ok(text) => ChatReply::live(text, ProviderType::Gemini, &self.model),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini chat failed, serving heuristic response");
                ChatReply::demo(demo::mentor_response(messages, topic))
            }
        }
    }

    async fn analyze_concept(
        &self,
        concept_name: &str,
        user_explanation: &str,
        options: &GenerateOptions,
    ) -> AnalysisReply {
        let contents = Self::analysis_contents(concept_name, user_explanation);
        let generation_config = json!({
            "temperature": options.temperature.unwrap_or(0.7),
            "topK": options.top_k.unwrap_or(40),
            "topP": options.top_p.unwrap_or(0.95),
            "maxOutputTokens": options.max_output_tokens.unwrap_or(4096),
        });

        match self.generate_content(contents, generation_config).await {
            // The provider did answer; a malformed payload downgrades to the
            // recovery analysis but keeps the live provider metadata.
            Ok(text) => AnalysisReply::live(
                extract::analysis_or_recovery(&text),
                ProviderType::Gemini,
                &self.model,
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini analysis failed, serving heuristic analysis");
                AnalysisReply::demo(demo::concept_analysis(concept_name, user_explanation))
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: ProviderType::Gemini.to_string(),
            provider_name: "Google Gemini".to_string(),
            model: self.model.clone(),
            sdk_available: true,
            default_model: Self::DEFAULT_MODEL.to_string(),
            available_models: None,
        }
    }

    async fn health_check(&self) -> HealthStatus {
        let start = Instant::now();
        let options = GenerateOptions {
            max_output_tokens: Some(16),
            ..Default::default()
        };
        match self.generate("Reply with the single word OK.", &options).await {
            Ok(_) => HealthStatus {
                healthy: true,
                provider: ProviderType::Gemini.to_string(),
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: None,
            },
            Err(e) => HealthStatus {
                healthy: false,
                provider: ProviderType::Gemini.to_string(),
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Gemini
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

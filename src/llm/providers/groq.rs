//! Groq provider implementation.
//!
//! Talks to Groq's OpenAI-compatible `chat/completions` endpoint. Groq has a
//! first-class system role, so both interaction modes use the native system
//! strategy: the persona travels in a leading `system` message and the real
//! history follows unmodified.

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

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq provider.
#[derive(Debug)]
pub struct GroqProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqProvider {
    /// Default model when no override is configured.
    pub const DEFAULT_MODEL: &'static str = "llama-3.3-70b-versatile";

    /// Models known to be hosted on Groq.
    pub const AVAILABLE_MODELS: &'static [&'static str] = &[
        "llama-3.3-70b-versatile",
        "llama-3.1-8b-instant",
        "llama-3.2-11b-vision-preview",
        "gemma2-9b-it",
        "meta-llama/llama-4-scout-17b-16e-instruct",
        "compound-mini",
        "compound-beta",
    ];

    /// Create a new Groq provider.
    ///
    /// The credential resolves from the explicit argument first, then the
    /// `GROQ_API_KEY` environment variable.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, AssistantError> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AssistantError::configuration(
                    "Groq API key is required. Provide it directly or set GROQ_API_KEY",
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
            settings.api_key_for(ProviderType::Groq).map(String::from),
            settings.active_model.clone(),
        )
    }

    /// Normalize Mentor Mode history into OpenAI-style messages.
    ///
    /// System message first, then the real turns with `User -> "user"` and
    /// everything else `-> "assistant"`.
    pub(crate) fn chat_messages(
        messages: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> Vec<Value> {
        let persona = system_prompt.unwrap_or(prompts::MENTOR_SYSTEM_PROMPT);
        let mut wire = vec![json!({"role": "system", "content": persona})];
        wire.extend(messages.iter().map(|msg| {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            json!({"role": role, "content": msg.content})
        }));
        wire
    }

    /// Normalize a Concept Mirror request into OpenAI-style messages.
    pub(crate) fn analysis_messages(concept_name: &str, user_explanation: &str) -> Vec<Value> {
        vec![
            json!({"role": "system", "content": prompts::CONCEPT_MIRROR_SYSTEM_PROMPT}),
            json!({
                "role": "user",
                "content": prompts::concept_mirror_prompt(concept_name, user_explanation),
            }),
        ]
    }

    /// Issue a `chat/completions` call and pull the text out of the reply.
    async fn chat_completion(&self, request_body: Value) -> Result<String, AssistantError> {
        tracing::debug!(model = %self.model, "Groq chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AssistantError::provider_call_with_source(
                    ProviderType::Groq,
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
                ProviderType::Groq,
                format!("API error {status}: {error_text}"),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            AssistantError::provider_call_with_source(
                ProviderType::Groq,
                format!("unreadable response body: {e}"),
                e,
            )
        })?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AssistantError::provider_call(ProviderType::Groq, "response carried no choices")
            })
    }

    /// Build a request body, forwarding only explicitly supplied options.
    fn request_body(&self, messages: Vec<Value>, options: &GenerateOptions) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_output_tokens) = options.max_output_tokens {
            body["max_tokens"] = json!(max_output_tokens);
        }
        if let Some(top_p) = options.top_p {
            body["top_p"] = json!(top_p);
        }
        // Groq's API has no top_k knob; a supplied top_k is ignored.
        body
    }
}

#[async_trait]
impl AiProvider for GroqProvider {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError> {
        let messages = vec![json!({"role": "user", "content": prompt})];
        self.chat_completion(self.request_body(messages, options))
            .await
    }

    async fn generate_with_context(
        &self,
        prompt: &str,
        context: Option<&str>,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<String, AssistantError> {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        let user_content = match context {
            Some(context) => format!("Context:\n{context}\n\nQuery: {prompt}"),
            None => prompt.to_string(),
        };
        messages.push(json!({"role": "user", "content": user_content}));

        self.chat_completion(self.request_body(messages, options))
            .await
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        topic: &str,
        system_prompt: Option<&str>,
        options: &GenerateOptions,
    ) -> ChatReply {
        let wire = Self::chat_messages(messages, system_prompt);
        let request_body = json!({
            "model": self.model,
            "messages": wire,
            "temperature": options.temperature.unwrap_or(0.7),
            "max_tokens": options.max_output_tokens.unwrap_or(1024),
            "top_p": options.top_p.unwrap_or(0.9),
            "stream": false,
        });

        match self.chat_completion(request_body).await {
            Ok(text) => ChatReply::live(text, ProviderType::Groq, &self.model),
            Err(e) => {
                tracing::warn!(error = %e, "Groq chat failed, serving heuristic response");
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
        let wire = Self::analysis_messages(concept_name, user_explanation);
        let request_body = json!({
            "model": self.model,
            "messages": wire,
            "temperature": options.temperature.unwrap_or(0.7),
            "max_tokens": options.max_output_tokens.unwrap_or(4096),
            "top_p": options.top_p.unwrap_or(0.95),
            "stream": false,
        });

        match self.chat_completion(request_body).await {
            // The provider did answer; a malformed payload downgrades to the
            // recovery analysis but keeps the live provider metadata.
            Ok(text) => AnalysisReply::live(
                extract::analysis_or_recovery(&text),
                ProviderType::Groq,
                &self.model,
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Groq analysis failed, serving heuristic analysis");
                AnalysisReply::demo(demo::concept_analysis(concept_name, user_explanation))
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: ProviderType::Groq.to_string(),
            provider_name: "Groq".to_string(),
            model: self.model.clone(),
            sdk_available: true,
            default_model: Self::DEFAULT_MODEL.to_string(),
            available_models: Some(
                Self::AVAILABLE_MODELS
                    .iter()
                    .map(|m| m.to_string())
                    .collect(),
            ),
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
                provider: ProviderType::Groq.to_string(),
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: None,
            },
            Err(e) => HealthStatus {
                healthy: false,
                provider: ProviderType::Groq.to_string(),
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Groq
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_messages_lead_with_native_system_role() {
        let messages = vec![ChatMessage::user("what is a closure?")];
        let wire = GroqProvider::chat_messages(&messages, None);

        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0]["role"], "system");
        assert!(wire[0]["content"].as_str().unwrap().contains("AI Mentor"));
        assert_eq!(wire[1]["role"], "user");
        assert_eq!(wire[1]["content"], "what is a closure?");
    }

    #[test]
    fn assistant_turns_keep_assistant_role() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let wire = GroqProvider::chat_messages(&messages, None);
        assert_eq!(wire[1]["role"], "user");
        assert_eq!(wire[2]["role"], "assistant");
    }

    #[test]
    fn analysis_messages_skip_the_priming_ack() {
        // Native system strategy needs no synthetic acknowledgment turn.
        let wire = GroqProvider::analysis_messages("Binary Search", "It halves the range.");
        assert_eq!(wire.len(), 2);
        assert!(wire[0]["content"]
            .as_str()
            .unwrap()
            .contains("Concept Mirror"));
        assert!(wire[1]["content"]
            .as_str()
            .unwrap()
            .contains("Concept Name: Binary Search"));
    }

    #[test]
    fn request_body_forwards_only_supplied_options() {
        let provider = GroqProvider::new(Some("test-key".to_string()), None).unwrap();
        let body = provider.request_body(vec![], &GenerateOptions::default());
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("top_p").is_none());

        let body = provider.request_body(
            vec![],
            &GenerateOptions {
                temperature: Some(0.3),
                max_output_tokens: Some(256),
                ..Default::default()
            },
        );
        // f32 options widen when serialized; compare as the same width.
        assert_eq!(body["temperature"], json!(0.3f32));
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn model_info_lists_available_models() {
        let provider = GroqProvider::new(Some("test-key".to_string()), None).unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "groq");
        assert_eq!(info.model, GroqProvider::DEFAULT_MODEL);
        assert!(info
            .available_models
            .unwrap()
            .contains(&"llama-3.1-8b-instant".to_string()));
    }

    #[test]
    fn model_override_is_honored() {
        let provider =
            GroqProvider::new(Some("test-key".to_string()), Some("gemma2-9b-it".to_string()))
                .unwrap();
        assert_eq!(provider.model_id(), "gemma2-9b-it");
    }
}

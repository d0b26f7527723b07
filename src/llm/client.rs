//! Lazy client facade.
//!
//! [`AiClient`] is the single entry point the boundary layer calls. It defers
//! provider construction until the first operation that needs one, caches the
//! instance until an explicit [`AiClient::reset`], and routes to the
//! heuristic engine whenever demo mode is on, no credential is configured, or
//! construction fails mid-call. The four public operations therefore never
//! fail; the only observable error is a `Configuration` failure from an
//! explicit [`AiClient::rebuild`].

use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Settings;
use crate::demo;
use crate::error::AssistantError;
use crate::llm::registry;
use crate::llm::traits::{AiProvider, GenerateOptions};
use crate::llm::DEMO_PROVIDER;
use crate::types::{AnalysisReply, ChatMessage, ChatReply, HealthStatus, ModelInfo};

/// Process-wide client, configured from the environment on first touch.
static AI: Lazy<AiClient> = Lazy::new(|| AiClient::new(Settings::from_env()));

/// The process-wide client handle.
pub fn ai() -> &'static AiClient {
    &AI
}

/// Lazy, resettable handle over the configured provider.
pub struct AiClient {
    settings: Settings,
    provider: RwLock<Option<Arc<dyn AiProvider>>>,
}

impl AiClient {
    /// Create a client over explicit settings. No provider is constructed
    /// until the first operation that needs one.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            provider: RwLock::new(None),
        }
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Self {
        Self::new(Settings::from_env())
    }

    /// The settings this client was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True when requests are served by the heuristic engine without trying
    /// a provider at all.
    fn demo_routed(&self) -> bool {
        self.settings.demo_mode || !self.settings.has_api_key()
    }

    /// Get the cached provider, constructing it on first use.
    ///
    /// Double-checked under the write lock so concurrent first calls retain
    /// exactly one instance.
    async fn provider(&self) -> Result<Arc<dyn AiProvider>, AssistantError> {
        {
            let guard = self.provider.read().await;
            if let Some(provider) = guard.as_ref() {
                return Ok(Arc::clone(provider));
            }
        }

        let mut guard = self.provider.write().await;
        if let Some(provider) = guard.as_ref() {
            return Ok(Arc::clone(provider));
        }
        let provider = registry::provider_from_settings(&self.settings)?;
        *guard = Some(Arc::clone(&provider));
        Ok(provider)
    }

    /// Drop the cached provider. The next operation reconstructs it.
    pub async fn reset(&self) {
        let mut guard = self.provider.write().await;
        *guard = None;
    }

    /// Reconstruct the provider now, surfacing configuration problems.
    ///
    /// This is the one place a `Configuration` error reaches a caller;
    /// implicit construction inside the operations falls back to the
    /// heuristic engine instead.
    pub async fn rebuild(&self) -> Result<(), AssistantError> {
        let provider = registry::provider_from_settings(&self.settings)?;
        let mut guard = self.provider.write().await;
        *guard = Some(provider);
        Ok(())
    }

    /// Mentor Mode conversation.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        topic: &str,
        system_prompt: Option<&str>,
    ) -> ChatReply {
        if self.demo_routed() {
            return ChatReply::demo(demo::mentor_response(messages, topic));
        }
        match self.provider().await {
            // The reply carries the provider's own metadata, including the
            // demo marker when the provider fell back internally.
            Ok(provider) => {
                provider
                    .chat(messages, topic, system_prompt, &GenerateOptions::default())
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "provider unavailable, serving heuristic chat");
                ChatReply::demo(demo::mentor_response(messages, topic))
            }
        }
    }

    /// Concept Mirror Mode analysis.
    pub async fn analyze_concept(
        &self,
        concept_name: &str,
        user_explanation: &str,
    ) -> AnalysisReply {
        if self.demo_routed() {
            return AnalysisReply::demo(demo::concept_analysis(concept_name, user_explanation));
        }
        match self.provider().await {
            Ok(provider) => {
                provider
                    .analyze_concept(concept_name, user_explanation, &GenerateOptions::default())
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "provider unavailable, serving heuristic analysis");
                AnalysisReply::demo(demo::concept_analysis(concept_name, user_explanation))
            }
        }
    }

    /// Single-shot completion.
    pub async fn generate(&self, prompt: &str) -> ChatReply {
        if self.demo_routed() {
            return ChatReply::demo(demo::generate_response(prompt));
        }
        let provider = match self.provider().await {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!(error = %e, "provider unavailable, serving heuristic completion");
                return ChatReply::demo(demo::generate_response(prompt));
            }
        };
        match provider.generate(prompt, &GenerateOptions::default()).await {
            Ok(response) => {
                ChatReply::live(response, provider.provider_type(), provider.model_id())
            }
            Err(e) => {
                tracing::warn!(error = %e, "generate failed, serving heuristic completion");
                ChatReply::demo(demo::generate_response(prompt))
            }
        }
    }

    /// Descriptor of the active configuration.
    ///
    /// When no provider can be constructed, describes the demo path instead
    /// of failing.
    pub async fn model_info(&self) -> ModelInfo {
        if !self.demo_routed() {
            if let Ok(provider) = self.provider().await {
                return provider.model_info();
            }
        }
        ModelInfo {
            provider: DEMO_PROVIDER.to_string(),
            provider_name: "Demo (heuristic)".to_string(),
            model: DEMO_PROVIDER.to_string(),
            sdk_available: false,
            default_model: DEMO_PROVIDER.to_string(),
            available_models: None,
        }
    }

    /// Probe the active provider; the demo path is always healthy.
    pub async fn health_check(&self) -> HealthStatus {
        if self.demo_routed() {
            return HealthStatus {
                healthy: true,
                provider: DEMO_PROVIDER.to_string(),
                latency_ms: None,
                error: None,
            };
        }
        match self.provider().await {
            Ok(provider) => provider.health_check().await,
            Err(e) => HealthStatus {
                healthy: false,
                provider: self.settings.active_provider.to_string(),
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// The cached provider instance, if one has been constructed.
    pub async fn current_provider(&self) -> Option<Arc<dyn AiProvider>> {
        self.provider.read().await.clone()
    }

    /// Replace the cached provider. Test seam for injecting doubles.
    #[doc(hidden)]
    pub async fn set_provider(&self, provider: Arc<dyn AiProvider>) {
        let mut guard = self.provider.write().await;
        *guard = Some(provider);
    }
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("provider", &self.settings.active_provider)
            .field("model", &self.settings.active_model)
            .field("demo_mode", &self.settings.demo_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::traits::ProviderType;
    use crate::types::ConceptAnalysis;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct MockProvider {
        reply: String,
    }

    #[async_trait]
    impl AiProvider for MockProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<String, AssistantError> {
            Ok(self.reply.clone())
        }

        async fn generate_with_context(
            &self,
            prompt: &str,
            _context: Option<&str>,
            _system_prompt: Option<&str>,
            options: &GenerateOptions,
        ) -> Result<String, AssistantError> {
            self.generate(prompt, options).await
        }

        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _topic: &str,
            _system_prompt: Option<&str>,
            _options: &GenerateOptions,
        ) -> ChatReply {
            ChatReply {
                response: self.reply.clone(),
                provider: self.provider_type().to_string(),
                model: Some(self.model_id().to_string()),
            }
        }

        async fn analyze_concept(
            &self,
            _concept_name: &str,
            _user_explanation: &str,
            _options: &GenerateOptions,
        ) -> AnalysisReply {
            AnalysisReply {
                analysis: ConceptAnalysis {
                    summary: self.reply.clone(),
                    ..Default::default()
                },
                provider: self.provider_type().to_string(),
                model: Some(self.model_id().to_string()),
            }
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                provider: "mock".to_string(),
                provider_name: "Mock".to_string(),
                model: "mock-1".to_string(),
                sdk_available: true,
                default_model: "mock-1".to_string(),
                available_models: None,
            }
        }

        async fn health_check(&self) -> HealthStatus {
            HealthStatus {
                healthy: true,
                provider: "mock".to_string(),
                latency_ms: Some(0),
                error: None,
            }
        }

        fn provider_type(&self) -> ProviderType {
            ProviderType::Groq
        }

        fn model_id(&self) -> &str {
            "mock-1"
        }
    }

    fn live_settings() -> Settings {
        Settings {
            active_provider: ProviderType::Groq,
            groq_api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn demo_mode_routes_to_heuristic_with_demo_metadata() {
        let client = AiClient::new(Settings {
            demo_mode: true,
            ..live_settings()
        });
        let reply = client
            .chat(&[ChatMessage::user("hi")], "Recursion", None)
            .await;
        assert_eq!(reply.provider, "demo");
        assert!(reply.model.is_none());
        assert!(reply.response.contains("Recursion"));
        // Nothing was constructed for the demo route.
        assert!(client.current_provider().await.is_none());
    }

    #[tokio::test]
    async fn missing_credential_routes_to_heuristic() {
        let client = AiClient::new(Settings {
            active_provider: ProviderType::Groq,
            groq_api_key: None,
            ..Default::default()
        });
        let reply = client.generate("Explain big-O notation").await;
        assert_eq!(reply.provider, "demo");
        assert!(reply.response.starts_with("Demo response for: "));

        let analysis = client
            .analyze_concept("Recursion", "A function calling itself.")
            .await;
        assert_eq!(analysis.provider, "demo");
        assert!(!analysis.analysis.summary.is_empty());
    }

    #[tokio::test]
    async fn cached_provider_is_reused_until_reset() {
        let client = AiClient::new(live_settings());
        let mock = Arc::new(MockProvider {
            reply: "from mock".to_string(),
        });
        client.set_provider(mock.clone()).await;

        let reply = client.chat(&[ChatMessage::user("hi")], "Rust", None).await;
        assert_eq!(reply.response, "from mock");
        assert_eq!(reply.provider, "groq");
        assert_eq!(reply.model.as_deref(), Some("mock-1"));

        let cached = client.current_provider().await.unwrap();
        assert!(Arc::ptr_eq(
            &cached,
            &(mock.clone() as Arc<dyn AiProvider>)
        ));

        client.reset().await;
        assert!(client.current_provider().await.is_none());

        // The next operation reconstructs from settings, so the fresh
        // instance cannot be the mock. model_info touches the provider
        // without any network traffic.
        let _ = client.model_info().await;
        let rebuilt = client.current_provider().await.unwrap();
        assert!(!Arc::ptr_eq(&rebuilt, &(mock as Arc<dyn AiProvider>)));
    }

    #[tokio::test]
    async fn rebuild_surfaces_configuration_errors() {
        // Unknown credential situation: no key in settings and (in this test
        // environment) none in the env either.
        let client = AiClient::new(Settings {
            active_provider: ProviderType::Groq,
            groq_api_key: None,
            ..Default::default()
        });
        if std::env::var("GROQ_API_KEY").is_err() {
            let err = client.rebuild().await.unwrap_err();
            assert!(err.is_configuration());
        }
    }

    #[tokio::test]
    async fn model_info_describes_demo_when_unconfigured() {
        let client = AiClient::new(Settings {
            demo_mode: true,
            ..Default::default()
        });
        let info = client.model_info().await;
        assert_eq!(info.provider, "demo");
        assert!(!info.sdk_available);
    }

    #[tokio::test]
    async fn model_info_comes_from_the_cached_provider() {
        let client = AiClient::new(live_settings());
        client
            .set_provider(Arc::new(MockProvider {
                reply: String::new(),
            }))
            .await;
        let info = client.model_info().await;
        assert_eq!(info.provider, "mock");
        assert_eq!(info.model, "mock-1");
    }

    #[tokio::test]
    async fn health_check_is_healthy_on_the_demo_path() {
        let client = AiClient::new(Settings {
            demo_mode: true,
            ..Default::default()
        });
        let status = client.health_check().await;
        assert!(status.healthy);
        assert_eq!(status.provider, "demo");
    }

    #[tokio::test]
    async fn concurrent_first_calls_retain_one_instance() {
        let client = Arc::new(AiClient::new(live_settings()));

        let a = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.provider().await.map(|p| Arc::as_ptr(&p) as *const () as usize) })
        };
        let b = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.provider().await.map(|p| Arc::as_ptr(&p) as *const () as usize) })
        };

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a, b);
    }
}

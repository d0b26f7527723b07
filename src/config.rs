//! Runtime settings for provider selection.
//!
//! The boundary layer owns configuration loading and hands the core plain
//! values. `Settings::from_env` exists as the conventional loader for that
//! boundary and for the process-wide handle; inside the core, environment
//! reads otherwise happen only as a last-resort credential fallback in the
//! provider constructors.

use crate::llm::traits::ProviderType;

/// Placeholder values that shipped in sample .env files; treated as absent.
const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key_here", "your_groq_api_key_here"];

/// Plain-value configuration for the assistant core.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Which provider serves live requests.
    pub active_provider: ProviderType,
    /// Model override; `None` means the provider's default model.
    pub active_model: Option<String>,
    /// Gemini credential, if configured.
    pub gemini_api_key: Option<String>,
    /// Groq credential, if configured.
    pub groq_api_key: Option<String>,
    /// Force heuristic responses even when a credential is configured.
    pub demo_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_provider: ProviderType::Gemini,
            active_model: None,
            gemini_api_key: None,
            groq_api_key: None,
            demo_mode: false,
        }
    }
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `ACTIVE_PROVIDER` values other than `gemini`/`groq` fall back to
    /// Gemini rather than failing; a blank `ACTIVE_MODEL` means no override.
    pub fn from_env() -> Self {
        let active_provider = std::env::var("ACTIVE_PROVIDER")
            .ok()
            .and_then(|name| name.parse::<ProviderType>().ok())
            .unwrap_or(ProviderType::Gemini);

        let active_model = std::env::var("ACTIVE_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let gemini_api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok();
        let groq_api_key = std::env::var("GROQ_API_KEY").ok();

        let demo_mode = std::env::var("DEMO_MODE")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            active_provider,
            active_model,
            gemini_api_key,
            groq_api_key,
            demo_mode,
        }
    }

    /// Credential for the given provider, with placeholder values filtered.
    pub fn api_key_for(&self, provider: ProviderType) -> Option<&str> {
        let key = match provider {
            ProviderType::Gemini => self.gemini_api_key.as_deref(),
            ProviderType::Groq => self.groq_api_key.as_deref(),
        };
        key.filter(|k| !k.is_empty() && !PLACEHOLDER_KEYS.contains(k))
    }

    /// Whether a usable credential is configured for the active provider.
    pub fn has_api_key(&self) -> bool {
        self.api_key_for(self.active_provider).is_some()
    }
}

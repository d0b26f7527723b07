//! Core data types shared across providers and the fallback engine.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
///
/// The core knows exactly two roles. Any role label it does not recognize
/// (for example `"model"` or `"system"` arriving from an external payload)
/// deserializes as [`MessageRole::Assistant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MessageRole {
    /// Message from the user/human.
    User,
    /// Message from the AI assistant.
    Assistant,
}

impl From<String> for MessageRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => MessageRole::User,
            _ => MessageRole::Assistant,
        }
    }
}

/// A single role-tagged message in a conversation.
///
/// Conversations are ordered sequences of these, newest turn last, and are
/// treated as immutable history once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Structured result of a Concept Mirror analysis.
///
/// All five fields are always present; an empty category is an empty vector,
/// never a missing key. Every field carries a serde default so a partial
/// provider payload still parses into a complete result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConceptAnalysis {
    /// Things the user clearly understands.
    #[serde(default)]
    pub understood: Vec<String>,
    /// Concepts or details that are missing or incomplete (at most 4).
    #[serde(default)]
    pub missing: Vec<String>,
    /// Statements that are wrong or misleading.
    #[serde(default)]
    pub incorrect: Vec<String>,
    /// Hidden or unstated assumptions detected (at most 3).
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// A short paragraph describing the shape of the user's understanding.
    #[serde(default)]
    pub summary: String,
}

/// Descriptor of the active provider/model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider identifier, e.g. `"gemini"` or `"groq"`.
    pub provider: String,
    /// Human-readable provider name.
    pub provider_name: String,
    /// Model identifier currently in use.
    pub model: String,
    /// Whether the provider's backend is usable from this build.
    pub sdk_available: bool,
    /// Model used when no override is configured.
    pub default_model: String,
    /// Known model identifiers, where the provider publishes a fixed list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
}

/// Result of a provider connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub provider: String,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Reply shape for `chat` and `generate`.
///
/// `provider` is the identifier of the backend that actually produced the
/// text; `"demo"` means the heuristic engine answered. `model` is absent on
/// the demo path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatReply {
    pub(crate) fn live(
        response: String,
        provider: crate::llm::ProviderType,
        model: &str,
    ) -> Self {
        Self {
            response,
            provider: provider.to_string(),
            model: Some(model.to_string()),
        }
    }

    pub(crate) fn demo(response: String) -> Self {
        Self {
            response,
            provider: crate::llm::DEMO_PROVIDER.to_string(),
            model: None,
        }
    }
}

/// Reply shape for `analyze_concept`: the analysis fields flattened next to
/// the same provider/model metadata as [`ChatReply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReply {
    #[serde(flatten)]
    pub analysis: ConceptAnalysis,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AnalysisReply {
    pub(crate) fn live(
        analysis: ConceptAnalysis,
        provider: crate::llm::ProviderType,
        model: &str,
    ) -> Self {
        Self {
            analysis,
            provider: provider.to_string(),
            model: Some(model.to_string()),
        }
    }

    pub(crate) fn demo(analysis: ConceptAnalysis) -> Self {
        Self {
            analysis,
            provider: crate::llm::DEMO_PROVIDER.to_string(),
            model: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_deserialize_as_assistant() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "model", "content": "hi"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);

        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::User);
    }

    #[test]
    fn concept_analysis_parses_with_missing_keys() {
        let analysis: ConceptAnalysis =
            serde_json::from_str(r#"{"understood": ["recursion basics"]}"#).unwrap();
        assert_eq!(analysis.understood, vec!["recursion basics"]);
        assert!(analysis.missing.is_empty());
        assert!(analysis.incorrect.is_empty());
        assert!(analysis.assumptions.is_empty());
        assert!(analysis.summary.is_empty());
    }

    #[test]
    fn analysis_reply_serializes_flat() {
        let reply = AnalysisReply {
            analysis: ConceptAnalysis {
                understood: vec!["a".to_string()],
                summary: "s".to_string(),
                ..Default::default()
            },
            provider: "groq".to_string(),
            model: Some("llama-3.3-70b-versatile".to_string()),
        };
        let value = serde_json::to_value(&reply).unwrap();
        // Analysis keys live at the top level, next to the metadata.
        assert_eq!(value["understood"][0], "a");
        assert_eq!(value["provider"], "groq");
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
    }
}

//! AI mentor core with interchangeable providers and a deterministic fallback.
//!
//! This crate powers two interaction modes for a study assistant:
//!
//! - **Mentor Mode** - multi-turn tutoring conversations with a fixed mentor
//!   persona and topic framing.
//! - **Concept Mirror Mode** - a single-shot structured critique of the
//!   user's own explanation of a concept.
//!
//! Requests are served by one of several interchangeable generative-text
//! providers (Google Gemini, Groq) behind a single [`llm::AiProvider`]
//! contract. When no provider is configured, a call fails mid-flight, or
//! demo mode is forced, the [`demo`] engine produces a deterministic,
//! equivalently shaped response, so callers never have to care which path
//! answered beyond the `provider` metadata field.
//!
//! # Quick start
//!
//! ```no_run
//! use mentor_ai::llm::ai;
//! use mentor_ai::types::ChatMessage;
//!
//! #[tokio::main]
//! async fn main() {
//!     let reply = ai()
//!         .chat(&[ChatMessage::user("What is recursion?")], "Recursion", None)
//!         .await;
//!     println!("[{}] {}", reply.provider, reply.response);
//! }
//! ```
//!
//! Provider selection, model overrides, credentials, and demo mode come from
//! [`config::Settings`]; the process-wide handle loads them from the
//! environment (`ACTIVE_PROVIDER`, `ACTIVE_MODEL`, `GOOGLE_API_KEY` /
//! `GEMINI_API_KEY`, `GROQ_API_KEY`, `DEMO_MODE`), while embedding callers
//! can pass a `Settings` value directly to [`llm::AiClient::new`].

pub mod config;
pub mod demo;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod types;

pub use config::Settings;
pub use error::AssistantError;
pub use llm::{ai, AiClient, AiProvider, GenerateOptions, ProviderType};
pub use types::{
    AnalysisReply, ChatMessage, ChatReply, ConceptAnalysis, HealthStatus, MessageRole, ModelInfo,
};

//! Multi-provider abstraction layer.
//!
//! One contract, interchangeable backends, and a deterministic fallback.
//! Callers go through [`client::AiClient`] (or the process-wide
//! [`client::ai`] handle), which resolves the configured provider lazily via
//! [`registry`] and answers from the heuristic engine whenever no provider
//! is reachable or configured:
//!
//! ```text
//! caller -> AiClient -> registry -> AiProvider (Gemini | Groq)
//!                |                       |
//!                |            normalizer + REST call + extractor
//!                |                       |
//!                +---- heuristic engine (on any failure) ----+
//! ```
//!
//! The live path and the fallback path produce structurally equivalent
//! results; only the reply metadata (`provider` field) tells them apart.

pub mod client;
pub mod extract;
pub mod providers;
pub mod registry;
pub mod traits;

pub use client::{ai, AiClient};
pub use providers::{GeminiProvider, GroqProvider};
pub use traits::{AiProvider, GenerateOptions, ProviderType};

/// Provider identifier reported when the heuristic engine answered.
pub const DEMO_PROVIDER: &str = "demo";

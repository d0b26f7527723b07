//! Provider implementations.
//!
//! Each provider implements the [`AiProvider`](crate::llm::traits::AiProvider)
//! trait and owns its protocol details. Gemini uses the priming strategy for
//! persona injection; Groq uses its native system role. Both must stay
//! behaviorally aligned on everything the strategy difference does not force,
//! which the parity tests below pin down.

pub mod gemini;
pub mod groq;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;

//! Completion API clients.
//!
//! One implementation today: OpenAI-compatible chat completions, which
//! covers OpenAI itself plus the long tail of compatible hosts (OpenRouter,
//! Ollama, vLLM, gateway front doors).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;

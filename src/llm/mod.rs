//! Remote analysis backends.
//!
//! This module provides:
//! * [`AnalysisBackend`]: async trait implemented by all backends.
//! * [`GeminiBackend`]: Google Gemini `generateContent` backend (default).
//! * [`OpenAiBackend`]: any OpenAI-compatible chat-completions endpoint.
//! * [`backend_from_config`]: picks one from [`LlmConfig`](crate::config::LlmConfig).
//! * [`PromptBuilder`]: builds the analysis prompt.
//! * [`LlmError`]: error variants for remote calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chat_vibes::config::AppConfig;
//! use chat_vibes::llm::{backend_from_config, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let backend = backend_from_config(&config.llm);
//!
//!     let prompt = PromptBuilder::new().build("[17/01/25, 10:12:01 PM] A: hi");
//!     let reply = backend.generate(&prompt).await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod backend;
pub mod gemini;
pub mod openai;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{backend_from_config, AnalysisBackend, LlmError};
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use prompt::{PromptBuilder, TRANSCRIPT_DELIMITER};

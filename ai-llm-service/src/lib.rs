//! Shared LLM access layer: provider config from env, OpenAI/Ollama chat
//! clients behind one [`LlmService`], unified errors and log formatting.

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::{GenerationOptions, LlmModelConfig};
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;

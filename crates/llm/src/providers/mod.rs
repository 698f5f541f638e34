pub mod claude;
pub mod gemini;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use pakar_core::Config;

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(config: &Config) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let llm_config = &config.llm;
    let timeout = config.timeouts.request();

    let provider: Arc<dyn LlmProvider> = match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
                timeout,
            ))
        }
        "anthropic" | "claude" => {
            let api_key = llm_config
                .anthropic_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".into()))?;
            Arc::new(claude::ClaudeProvider::new(
                api_key.clone(),
                llm_config.anthropic_model.clone(),
                timeout,
            ))
        }
        "gemini" | "google" => {
            let api_key = config
                .gemini
                .api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                config.gemini.model.clone(),
                timeout,
            ))
        }
        "ollama" => Arc::new(ollama::OllamaProvider::new(
            config.ollama.url.clone(),
            config.ollama.model.clone(),
            timeout,
        )),
        other => {
            return Err(LlmError::NotConfigured(format!(
                "unknown LLM provider: '{}'",
                other
            )))
        }
    };

    tracing::info!(provider = %llm_config.provider, model = %provider.model(), "generation backend ready");
    Ok(provider)
}

//! Remote text-generation providers and the fallback chain over them.
//!
//! Providers are tried strictly in order. The first one that answers wins;
//! there are no retries and no backoff.

pub mod deepseek;
pub mod gemini;

pub use deepseek::DeepSeekClient;
pub use gemini::GeminiClient;

use crate::config::AppConfig;
use crate::model::ProviderError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Sampling knobs forwarded to whichever provider ends up answering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationOptions {
    pub const ANALYSIS: Self = Self {
        temperature: 0.3,
        max_tokens: 1500,
    };
    pub const SEARCH: Self = Self {
        temperature: 0.7,
        max_tokens: 2000,
    };
    pub const CARD_ADVICE: Self = Self {
        temperature: 0.5,
        max_tokens: 500,
    };
}

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String, ProviderError>;
}

#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextGenerator>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { providers }
    }

    /// DeepSeek first, Gemini second; a provider without an API key is left out.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Http {
                provider: "http client",
                message: e.to_string(),
            })?;

        let mut providers: Vec<Arc<dyn TextGenerator>> = Vec::new();
        if let Some(deepseek) = DeepSeekClient::from_config(&config.deepseek, client.clone()) {
            providers.push(Arc::new(deepseek));
        }
        if let Some(gemini) = GeminiClient::from_config(&config.gemini, client) {
            providers.push(Arc::new(gemini));
        }

        let chain = Self::new(providers);
        if chain.is_empty() {
            warn!("No AI API keys configured, analysis will use local card rules only");
        } else {
            info!("Text generation providers: {}", chain.names().join(" -> "));
        }
        Ok(chain)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String, ProviderError> {
        for provider in &self.providers {
            match provider.generate(prompt, options).await {
                Ok(text) => {
                    info!("{} answered ({} chars)", provider.name(), text.len());
                    return Ok(text);
                }
                Err(e) => warn!("{} failed, trying next provider: {}", provider.name(), e),
            }
        }
        Err(ProviderError::AllUnavailable)
    }
}

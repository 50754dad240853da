// DeepSeek chat-completions client
use crate::config::ProviderConfig;
use crate::model::ProviderError;
use crate::provider::{GenerationOptions, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
const NAME: &str = "deepseek";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct DeepSeekClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl DeepSeekClient {
    pub fn new(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &ProviderConfig, client: Client) -> Option<Self> {
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let mut deepseek = Self::new(api_key, client);
        if let Some(url) = &config.base_url {
            deepseek = deepseek.with_base_url(url.clone());
        }
        if let Some(model) = &config.model {
            deepseek.model = model.clone();
        }
        Some(deepseek)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request<'a>(&'a self, prompt: &'a str, options: GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for DeepSeekClient {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String, ProviderError> {
        debug!("DeepSeek request: model={}, max_tokens={}", self.model, options.max_tokens);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt, options))
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                provider: NAME,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("DeepSeek API responded [{}]: {}", status, body);
            return Err(ProviderError::Status {
                provider: NAME,
                status: status.as_u16(),
            });
        }

        let payload: ChatResponse = response.json().await.map_err(|e| ProviderError::Payload {
            provider: NAME,
            message: e.to_string(),
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Payload {
                provider: NAME,
                message: "missing choices[0].message.content".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let client = DeepSeekClient::new("key", Client::new());
        let body = serde_json::to_value(client.request("hi", GenerationOptions::ANALYSIS)).unwrap();
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 1500);
    }

    #[test]
    fn missing_key_disables_provider() {
        assert!(DeepSeekClient::from_config(&ProviderConfig::default(), Client::new()).is_none());
        let config = ProviderConfig {
            api_key: Some("sk".into()),
            base_url: Some("http://localhost:1234/".into()),
            model: None,
        };
        let client = DeepSeekClient::from_config(&config, Client::new()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/chat/completions");
    }

    #[test]
    fn response_without_choices_is_rejected() {
        let payload: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(payload.choices.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        let client = DeepSeekClient::new("key", Client::new()).with_base_url("http://127.0.0.1:9");
        let err = client.generate("hi", GenerationOptions::ANALYSIS).await.unwrap_err();
        assert!(matches!(err, ProviderError::Http { provider: "deepseek", .. }));
    }
}

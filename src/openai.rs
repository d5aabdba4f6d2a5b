use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use crate::config::Config;
use crate::error::{ConfigError, SummaryError};
use crate::prompt::SYSTEM_INSTRUCTION;

pub const MODEL: &str = "gpt-4.1-mini-2025-04-14";
pub const TEMPERATURE: f32 = 0.2;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::DependencyUnavailable(e.to_string()))?;

        let mut openai = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }

        Ok(Self {
            client: Client::with_config(openai).with_http_client(http),
            timeout: config.timeout,
        })
    }

    fn provider_error(&self, e: OpenAIError) -> SummaryError {
        match e {
            OpenAIError::Reqwest(ref err) if err.is_timeout() => SummaryError::Timeout(self.timeout),
            other => SummaryError::Provider(other.to_string()),
        }
    }
}

pub fn chat_request(prompt: &str) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(MODEL)
        .temperature(TEMPERATURE)
        .messages(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTION)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ])
        .build()
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = chat_request(prompt).map_err(|e| self.provider_error(e))?;

        // Bounds the library's own rate-limit backoff as well as the HTTP call.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| SummaryError::Timeout(self.timeout))?
            .map_err(|e| self.provider_error(e))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SummaryError::Provider("the reply contained no message content".into()))?;
        tracing::debug!(chars = text.len(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_fixed_model_and_temperature() {
        let request = chat_request("Summarize John 3").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], MODEL);
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_INSTRUCTION);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Summarize John 3");
    }

    #[test]
    fn client_builds_from_config() {
        let config = Config::from_lookup(|k| match k {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_BASE_URL" => Some("http://127.0.0.1:9/v1".to_string()),
            _ => None,
        })
        .unwrap();
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.timeout, config.timeout);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_provider_error() {
        let config = Config::from_lookup(|k| match k {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            // Port 9 (discard) is closed on test hosts; the connect fails fast.
            "OPENAI_BASE_URL" => Some("http://127.0.0.1:9/v1".to_string()),
            "SUMMARY_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        let client = OpenAiClient::new(&config).unwrap();
        let err = client.complete("Summarize John 3").await.unwrap_err();
        assert!(matches!(err, SummaryError::Provider(_)), "{err:?}");
        assert!(err.is_completion_failure());
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept and hold connections without ever answering
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = Config::from_lookup(|k| match k {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_BASE_URL" => Some(format!("http://{addr}/v1")),
            "SUMMARY_TIMEOUT_SECS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let client = OpenAiClient::new(&config).unwrap();
        let err = client.complete("Summarize John 3").await.unwrap_err();
        assert!(matches!(err, SummaryError::Timeout(_)), "{err:?}");
    }
}

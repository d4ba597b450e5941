use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

use crate::prompt::Prompt;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const TEMPERATURE: f64 = 0.5;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Anything that can turn a prompt into generated text
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

/// Settings for an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl OpenAiConfig {
    /// Reads `OPENAI_API_KEY` once; a missing key only surfaces when a request is made.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            bail!("OPENAI_API_KEY environment variable not set (required for completions)");
        };

        let model = &self.config.model;
        debug!("Requesting completion from {model} (max_tokens={})", prompt.max_tokens);

        let body = request_body(model, prompt);

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("OpenAI API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_openai_text(&json)
    }
}

fn request_body(model: &str, prompt: &Prompt) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": prompt.text
            }
        ],
        "max_tokens": prompt.max_tokens,
        "temperature": TEMPERATURE
    })
}

/// First choice's message content, verbatim
fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt {
            text: "Write a short summary of the following text in English.\n\nhello".to_string(),
            max_tokens: 100,
        }
    }

    #[test]
    fn test_request_body() {
        let body = request_body("gpt-3.5-turbo", &prompt());
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a helpful assistant.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], prompt().text);
    }

    #[test]
    fn test_extract_openai_text() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "  Summary of the video.\n"
                    },
                    "finish_reason": "length"
                },
                {
                    "message": {
                        "role": "assistant",
                        "content": "second choice"
                    }
                }
            ],
            "usage": { "total_tokens": 42 }
        });
        assert_eq!(extract_openai_text(&json).unwrap(), "  Summary of the video.\n");
    }

    #[test]
    fn test_extract_openai_text_empty() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_openai_text(&json).is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiClient::new(
            reqwest::Client::new(),
            OpenAiConfig {
                api_base: "http://localhost:8080/v1/".to_string(),
                ..OpenAiConfig::default()
            },
        );
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = OpenAiConfig {
            api_key: Some("sk-secret".to_string()),
            ..OpenAiConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_call_time() {
        let client = OpenAiClient::new(reqwest::Client::new(), OpenAiConfig::default());
        let err = client.complete(&prompt()).await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}

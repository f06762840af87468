//! OpenAI expert client.
//!
//! Implements the [`Expert`] trait against the Chat Completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::port::outbound::expert::Expert;

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    /// Model identifier (e.g., "gpt-4o").
    model: String,
    max_tokens: usize,
    /// Sampling temperature (0.0 to 2.0).
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY is not set".into()))?;
        Ok(Self::new(api_key, model, 1024, 0.2))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Expert for OpenAi {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String> {
        let request = Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Execution(format!("openai request failed: {e}")))?
            .json::<Response>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Execution("openai response had no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_places_system_message_first() {
        let request = Request {
            model: "gpt-4o".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            messages: vec![
                Message {
                    role: "system",
                    content: "sys".to_string(),
                },
                Message {
                    role: "user",
                    content: "usr".to_string(),
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn response_takes_first_choice_content() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "{\"probability\": 0.4}"}}
            ]
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        let content = response.choices[0].message.content.as_deref();
        assert_eq!(content, Some(r#"{"probability": 0.4}"#));
    }

    #[test]
    fn empty_choices_deserialize() {
        let response: Response = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn expert_name_is_stable() {
        let client = OpenAi::new("key", "model", 100, 0.1);
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn from_env_requires_key() {
        std::env::remove_var("OPENAI_API_KEY");
        let result = OpenAi::from_env("gpt-4o");
        assert!(result.is_err());
    }
}

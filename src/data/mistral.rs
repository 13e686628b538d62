//! Minimal blocking client for the Mistral chat completions API.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::data::{ServiceConfig, ServiceError};

const SERVICE: &str = "Mistral";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Requested shape of the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatBody>,
}

#[derive(Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl MistralClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .mistral_api_key
            .clone()
            .ok_or(ServiceError::MissingConfig("MISTRAL_API_KEY"))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Network {
                service: SERVICE,
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: config.mistral_base_url.trim_end_matches('/').to_string(),
            model: config.mistral_model.clone(),
        })
    }

    /// Send `messages` and return the first choice's content.
    pub fn chat(&self, messages: &[ChatMessage], format: ResponseFormat) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            response_format: match format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(ResponseFormatBody {
                    format_type: "json_object",
                }),
            },
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| ServiceError::Network {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%status, "chat completion failed");
            return Err(ServiceError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().map_err(|e| ServiceError::MalformedResponse {
            service: SERVICE,
            message: e.to_string(),
        })?;

        first_choice(body)
    }
}

fn first_choice(body: ChatResponse) -> Result<String, ServiceError> {
    body.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ServiceError::MalformedResponse {
            service: SERVICE,
            message: "no choices in response".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_sets_response_format() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let req = ChatRequest {
            model: "m",
            messages: &messages,
            response_format: Some(ResponseFormatBody {
                format_type: "json_object",
            }),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["response_format"]["type"], "json_object");
        assert_eq!(v["messages"][1]["role"], "user");

        let plain = ChatRequest {
            model: "m",
            messages: &messages,
            response_format: None,
        };
        let v = serde_json::to_value(&plain).unwrap();
        assert!(v.get("response_format").is_none());
    }

    #[test]
    fn empty_choices_are_malformed() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_choice(body), Err(ServiceError::MalformedResponse { .. })));

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#).unwrap();
        assert_eq!(first_choice(body).unwrap(), "hi");
    }
}

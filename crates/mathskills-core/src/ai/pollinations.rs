use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{AdapterError, ChatModel, WireMessage};
use crate::config::{Config, DEFAULT_ENDPOINT, DEFAULT_REFERRER};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    referrer: &'a str,
    messages: &'a [WireMessage],
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

/// OpenAI-compatible text endpoint. No auth; requests are attributed by
/// referrer.
#[derive(Clone)]
pub struct PollinationsClient {
    client: Client,
    endpoint: String,
    referrer: String,
}

impl PollinationsClient {
    pub fn new(endpoint: &str, referrer: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            referrer: referrer.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.endpoint(), &config.referrer())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for PollinationsClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_REFERRER)
    }
}

fn request_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("req_{}", &id[..12])
}

#[async_trait]
impl ChatModel for PollinationsClient {
    fn name(&self) -> &str {
        "pollinations"
    }

    async fn complete(&self, model: &str, messages: &[WireMessage]) -> Result<String, AdapterError> {
        let request_id = request_id();
        let started = Instant::now();
        info!(
            request_id = %request_id,
            model,
            messages = messages.len(),
            "Sending chat completion"
        );

        let request = CompletionRequest {
            model,
            referrer: &self.referrer,
            messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .inspect_err(|e| warn!(request_id = %request_id, "Transport error: {}", e))?;

        let status = response.status();
        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        let body = response.text().await?;
        if !status.is_success() {
            warn!(request_id = %request_id, status = status.as_u16(), "Endpoint returned an error");
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .inspect_err(|e| warn!(request_id = %request_id, "Undecodable response: {}", e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(AdapterError::MissingContent)?;

        info!(
            request_id = %request_id,
            chars = content.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion succeeded"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PollinationsClient {
        PollinationsClient::new(&format!("{}/openai", server.uri()), "pppp")
    }

    #[tokio::test]
    async fn test_request_body_shape_and_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "model": "openai-large",
                "referrer": "pppp",
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "2+2?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "$4$ 🎉"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete(
                "openai-large",
                &[WireMessage::new("system", "be nice"), WireMessage::new("user", "2+2?")],
            )
            .await
            .unwrap();

        assert_eq!(reply, "$4$ 🎉");
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("openai-large", &[WireMessage::new("user", "hi")])
            .await
            .unwrap_err();

        match err {
            AdapterError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("openai-large", &[WireMessage::new("user", "hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_choices_is_missing_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("openai-large", &[WireMessage::new("user", "hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::MissingContent));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = PollinationsClient::new("http://127.0.0.1:9/openai", "pppp");
        let err = client
            .complete("openai-large", &[WireMessage::new("user", "hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Transport(_)));
    }

    #[test]
    fn test_request_ids_are_prefixed() {
        let id = request_id();
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 16);
    }
}

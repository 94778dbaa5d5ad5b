use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use plateread_core::{RelayError, VisionProvider, VisionReply, VisionRequest};

/// Default base URL for the OpenAI chat-completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible multimodal chat-completions provider.
pub struct OpenAiVisionProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiVisionProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound the whole upstream exchange. An elapsed timeout surfaces as an
    /// unexpected failure, never as a partial result.
    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(self)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

fn build_body(request: &VisionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(&request.system_prompt),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: &request.image_url,
                        },
                    },
                    ContentPart::Text {
                        text: &request.user_prompt,
                    },
                ]),
            },
        ],
    }
}

/// Pull `error.message` out of a provider error body, if there is one.
fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
}

#[async_trait]
impl VisionProvider for OpenAiVisionProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<VisionReply, RelayError> {
        let start = Instant::now();
        let body = build_body(request);

        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "Sending image to upstream"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Upstream HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Upstream rejected request");
            return Err(RelayError::upstream(
                status.as_u16(),
                upstream_error_message(&error_body),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to decode upstream response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(VisionReply {
            content,
            model: chat_response.model.unwrap_or_else(|| request.model.clone()),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct FakeUpstream {
        status: StatusCode,
        body: String,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn fake_completions(
        State(fake): State<FakeUpstream>,
        headers: axum::http::HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        let auth = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        fake.seen.lock().unwrap().push((auth, body));
        (fake.status, fake.body.clone())
    }

    async fn spawn_upstream(fake: FakeUpstream) -> SocketAddr {
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(fake);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn fake(status: StatusCode, body: Value) -> FakeUpstream {
        FakeUpstream {
            status,
            body: body.to_string(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn request() -> VisionRequest {
        VisionRequest::for_image("data:image/jpeg;base64,/9j/AAAA", "gpt-4o", 500)
    }

    #[test]
    fn body_carries_system_turn_and_image_part() {
        let req = request();
        let body = serde_json::to_value(build_body(&req)).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], req.system_prompt.as_str());
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"][0]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/jpeg;base64,/9j/AAAA"
        );
        assert_eq!(body["messages"][1]["content"][1]["type"], "text");
        assert_eq!(body["messages"][1]["content"][1]["text"], req.user_prompt.as_str());
    }

    #[test]
    fn error_message_extraction() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        assert_eq!(upstream_error_message(body).as_deref(), Some("Rate limit reached"));
        assert_eq!(upstream_error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(upstream_error_message(r#"{"error":{}}"#), None);
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let upstream = fake(
            StatusCode::OK,
            json!({
                "model": "gpt-4o-2024-08-06",
                "choices": [{"message": {"role": "assistant", "content": "{\"results\": []}"}}]
            }),
        );
        let seen = upstream.seen.clone();
        let addr = spawn_upstream(upstream).await;

        let provider = OpenAiVisionProvider::new("sk-test").with_base_url(format!("http://{addr}/v1/"));
        let reply = provider.complete(&request()).await.unwrap();

        assert_eq!(reply.content, "{\"results\": []}");
        assert_eq!(reply.model, "gpt-4o-2024-08-06");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer sk-test"));
        assert_eq!(seen[0].1["messages"][1]["content"][0]["type"], "image_url");
    }

    #[tokio::test]
    async fn missing_content_is_empty_text() {
        let addr = spawn_upstream(fake(StatusCode::OK, json!({"choices": []}))).await;
        let provider = OpenAiVisionProvider::new("sk-test").with_base_url(format!("http://{addr}/v1"));
        let reply = provider.complete(&request()).await.unwrap();
        assert_eq!(reply.content, "");
        assert_eq!(reply.model, "gpt-4o");
    }

    #[tokio::test]
    async fn rejection_passes_provider_message_through() {
        let addr = spawn_upstream(fake(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
        ))
        .await;
        let provider = OpenAiVisionProvider::new("sk-bad").with_base_url(format!("http://{addr}/v1"));
        let err = provider.complete(&request()).await.unwrap_err();

        match err {
            RelayError::UpstreamRejection { status, ref message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallback() {
        let addr = spawn_upstream(fake(StatusCode::INTERNAL_SERVER_ERROR, json!("oops"))).await;
        let provider = OpenAiVisionProvider::new("sk-test").with_base_url(format!("http://{addr}/v1"));
        let err = provider.complete(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.public_message(), plateread_core::UPSTREAM_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_unexpected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OpenAiVisionProvider::new("sk-test")
            .with_base_url(format!("http://{addr}/v1"))
            .with_timeout(Duration::from_secs(5))
            .unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, RelayError::Unexpected(_)));
        assert_eq!(err.status_code(), 500);
    }
}

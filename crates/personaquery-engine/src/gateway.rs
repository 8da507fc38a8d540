//! Answer Service Gateway.
//!
//! Turns a question into exactly one call to the remote answer service and
//! normalizes whatever comes back into an [`AnswerResult`]. No retries and no
//! timeout of its own: a single attempt that resolves when the service (or the
//! transport) does.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{AskMode, Config};
use crate::message::Source;

/// Response fields checked for the answer text, in priority order.
pub const ANSWER_FIELDS: [&str; 3] = ["answer", "response", "text"];

/// Normalized outcome of one question.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerResult {
    /// The service replied. `text` may be empty when no usable answer field was present.
    Answered {
        text: String,
        sources: Option<Vec<Source>>,
    },
    /// The call could not be completed or the reply was unusable.
    Failed { description: String },
}

impl AnswerResult {
    /// Shorthand for a failure.
    pub fn failed(description: impl Into<String>) -> Self {
        Self::Failed {
            description: description.into(),
        }
    }
}

/// Something that can answer questions.
#[async_trait]
pub trait AnswerGateway: Send + Sync {
    /// Ask a question. Never errors: failures come back as [`AnswerResult::Failed`].
    async fn ask(&self, question: &str) -> AnswerResult;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<AskMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

/// Reply from the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Service status, `"ok"` when healthy.
    pub status: String,
    /// Named links published by the service.
    #[serde(default)]
    pub author_links: BTreeMap<String, String>,
}

impl HealthReport {
    /// Whether the service reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// HTTP implementation of [`AnswerGateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    chat_url: String,
    health_url: String,
    mode: Option<AskMode>,
    top_k: Option<u32>,
}

impl HttpGateway {
    /// Create a gateway for the configured service.
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a gateway that reuses an existing HTTP client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            chat_url: config.chat_url(),
            health_url: config.health_url(),
            mode: config.mode,
            top_k: config.top_k,
        }
    }

    /// Address questions are posted to.
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Post a question and decode the reply.
    pub async fn post_question(&self, question: &str) -> Result<ChatReply, GatewayError> {
        let request = ChatRequest {
            question,
            mode: self.mode,
            top_k: self.top_k,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        ChatReply::parse(&body)
    }

    /// Query the service health endpoint.
    pub async fn health(&self) -> Result<HealthReport, GatewayError> {
        let response = self.client.get(&self.health_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(GatewayError::Malformed)
    }
}

#[async_trait]
impl AnswerGateway for HttpGateway {
    async fn ask(&self, question: &str) -> AnswerResult {
        match self.post_question(question).await {
            Ok(reply) => AnswerResult::Answered {
                text: reply.text,
                sources: reply.sources,
            },
            Err(e) => AnswerResult::failed(describe_error(&e)),
        }
    }
}

/// Decoded success reply from the question endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    /// Answer text; empty when none of [`ANSWER_FIELDS`] held a string.
    pub text: String,
    /// Evidence, present only when the reply carried a `sources` array.
    pub sources: Option<Vec<Source>>,
}

impl ChatReply {
    /// Decode a reply body. Only invalid JSON is an error; any valid JSON
    /// yields a reply, possibly with an empty answer.
    pub fn parse(body: &str) -> Result<Self, GatewayError> {
        let payload: Value = serde_json::from_str(body).map_err(GatewayError::Malformed)?;
        Ok(Self::from_value(&payload))
    }

    /// Extract a reply from an already parsed payload.
    pub fn from_value(payload: &Value) -> Self {
        let text = ANSWER_FIELDS
            .iter()
            .find_map(|field| payload.get(field).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        let sources = payload
            .get("sources")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(source_from_value).collect());

        Self { text, sources }
    }
}

/// Decode one `sources` element, keeping only the fields with usable types.
fn source_from_value(item: &Value) -> Source {
    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);

    let page_label = match item.get("page_label") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    Source {
        file_name: text("file_name"),
        page_label,
        score: item.get("score").and_then(Value::as_f64),
        snippet: text("snippet"),
    }
}

/// Render an error with its chain of causes on one line.
fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !description.contains(&cause_text) {
            description.push_str(": ");
            description.push_str(&cause_text);
        }
        source = cause.source();
    }
    description
}

/// Errors from talking to the answer service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request could not be sent or the reply could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {detail}")]
    Status { status: u16, detail: String },

    /// The reply body was not valid JSON.
    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn gateway_for(server: &MockServer) -> HttpGateway {
        let config = Config {
            api_url: format!("{}/", server.uri()),
            ..Config::default()
        };
        HttpGateway::new(&config)
    }

    #[test]
    fn test_reply_prefers_answer_field() {
        let reply = ChatReply::from_value(&json!({
            "text": "third",
            "response": "second",
            "answer": "first"
        }));
        assert_eq!(reply.text, "first");
    }

    #[test]
    fn test_reply_skips_non_text_fields() {
        let reply = ChatReply::from_value(&json!({"answer": 42, "response": null, "text": "fallback"}));
        assert_eq!(reply.text, "fallback");

        let reply = ChatReply::from_value(&json!({"answer": ["a"], "other": "x"}));
        assert_eq!(reply.text, "");
        assert!(reply.sources.is_none());
    }

    #[test]
    fn test_reply_from_non_object_is_empty() {
        assert_eq!(ChatReply::parse("[1, 2]").unwrap(), ChatReply::default());
        assert_eq!(ChatReply::parse("\"hello\"").unwrap(), ChatReply::default());
    }

    #[test]
    fn test_reply_invalid_json_is_malformed() {
        assert!(matches!(
            ChatReply::parse("<html>oops</html>"),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn test_sources_only_from_arrays() {
        let reply = ChatReply::from_value(&json!({"answer": "x", "sources": {"file_name": "a"}}));
        assert!(reply.sources.is_none());

        let reply = ChatReply::from_value(&json!({"answer": "x", "sources": []}));
        assert_eq!(reply.sources, Some(vec![]));
    }

    #[test]
    fn test_sources_decoded_leniently() {
        let reply = ChatReply::from_value(&json!({
            "answer": "x",
            "sources": [
                {"file_name": "resume.pdf", "page_label": 2, "score": 1.5, "snippet": "..."},
                {"file_name": 7, "score": "high", "section": "Skills"},
                "not an object"
            ]
        }));
        let sources = reply.sources.unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].file_name.as_deref(), Some("resume.pdf"));
        assert_eq!(sources[0].page_label.as_deref(), Some("2"));
        assert_eq!(sources[0].score, Some(1.5));
        assert_eq!(sources[1], Source::default());
        assert_eq!(sources[2], Source::default());
    }

    #[tokio::test]
    async fn test_ask_passes_sources_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"question": "Best-fit roles"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "X",
                "sources": [{"file_name": "r.pdf", "score": 0.87}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway_for(&server).ask("Best-fit roles").await;

        let AnswerResult::Answered { text, sources } = result else {
            panic!("expected an answer");
        };
        assert_eq!(text, "X");
        let sources = sources.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_name.as_deref(), Some("r.pdf"));
        assert!((sources[0].score.unwrap() - 0.87).abs() < 1e-9);
        assert!(sources[0].page_label.is_none());
        assert!(sources[0].snippet.is_none());
    }

    #[tokio::test]
    async fn test_ask_sends_optional_fields_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"question": "q", "mode": "interview", "top_k": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            api_url: server.uri(),
            mode: Some(AskMode::Interview),
            top_k: Some(5),
            ..Config::default()
        };
        let result = HttpGateway::new(&config).ask("q").await;
        assert_eq!(
            result,
            AnswerResult::Answered {
                text: "ok".into(),
                sources: None
            }
        );
    }

    #[tokio::test]
    async fn test_ask_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": ""})))
            .mount(&server)
            .await;

        let result = gateway_for(&server).ask("anything").await;
        assert_eq!(
            result,
            AnswerResult::Answered {
                text: String::new(),
                sources: None
            }
        );
    }

    #[tokio::test]
    async fn test_ask_status_error_includes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = gateway_for(&server).ask("q").await;
        let AnswerResult::Failed { description } = result else {
            panic!("expected a failure");
        };
        assert_eq!(description, "API error (500): boom");
    }

    #[tokio::test]
    async fn test_ask_status_error_falls_back_to_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = gateway_for(&server).ask("q").await;
        assert_eq!(
            result,
            AnswerResult::failed("API error (503): Service Unavailable")
        );
    }

    #[tokio::test]
    async fn test_ask_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = gateway_for(&server).ask("q").await;
        let AnswerResult::Failed { description } = result else {
            panic!("expected a failure");
        };
        assert!(description.starts_with("malformed response"));
    }

    #[tokio::test]
    async fn test_ask_transport_failure() {
        // Reserve a port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = Config {
            api_url: format!("http://127.0.0.1:{port}"),
            ..Config::default()
        };
        let result = HttpGateway::new(&config).ask("q").await;
        let AnswerResult::Failed { description } = result else {
            panic!("expected a failure");
        };
        assert!(description.starts_with("request failed"));
    }

    #[tokio::test]
    async fn test_health_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "author_links": {"GitHub": "https://github.com/RudraJoshi25"}
            })))
            .mount(&server)
            .await;

        let report = gateway_for(&server).health().await.unwrap();
        assert!(report.is_ok());
        assert_eq!(
            report.author_links.get("GitHub").map(String::as_str),
            Some("https://github.com/RudraJoshi25")
        );
    }

    #[tokio::test]
    async fn test_health_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = gateway_for(&server).health().await.unwrap_err();
        assert_eq!(err.to_string(), "API error (404): Not Found");
    }
}

use crate::config::{env_secs, Settings};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{CompletionRequest, Provider, TextGenerator};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chat-completions client for Groq's OpenAI-compatible API.
///
/// A missing API key does not stop construction; every call fails instead,
/// which lets the server start and serve fallback fortunes.
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url =
            std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = env_secs("GROQ_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            settings.groq_api_key.clone(),
            base_url,
            model,
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GROQ_API_KEY is required")?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .context("GROQ_API_KEY is not a valid header value")?,
        );
        Ok(headers)
    }

    async fn create_chat_completion(
        &self,
        req: ChatCompletionRequest<'_>,
    ) -> anyhow::Result<ChatCompletionResponse> {
        let headers = self.headers()?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("Groq request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Groq response body")?;
        if !status.is_success() {
            return Err(LlmDiagnosticsError::http(Provider::Groq, status, text).into());
        }

        serde_json::from_str::<ChatCompletionResponse>(&text)
            .with_context(|| format!("failed to decode Groq response JSON: {text}"))
    }

    fn response_text(res: ChatCompletionResponse) -> anyhow::Result<String> {
        let content = res
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty());

        content.ok_or_else(|| {
            LlmDiagnosticsError::decode(Provider::Groq, "response contained no message content")
                .into()
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for GroqClient {
    fn provider(&self) -> Provider {
        Provider::Groq
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &req.system,
                },
                Message {
                    role: "user",
                    content: &req.prompt,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        let res = self.create_chat_completion(body).await?;
        Self::response_text(res)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::Stage;
    use axum::{
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You are a fortune teller".to_string(),
            prompt: "Tell me something".to_string(),
            temperature: 1.2,
            max_tokens: 150,
        }
    }

    async fn spawn_mock_groq(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/openai/v1")
    }

    fn client(api_key: Option<&str>, base_url: &str) -> GroqClient {
        GroqClient::new(
            api_key.map(str::to_string),
            base_url,
            DEFAULT_MODEL,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn decodes_first_choice_content() {
        let res: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "\"Beware.\""}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}},
            ],
        }))
        .unwrap();

        assert_eq!(GroqClient::response_text(res).unwrap(), "\"Beware.\"");
    }

    #[test]
    fn empty_choices_are_a_decode_error() {
        let res: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = GroqClient::response_text(res).unwrap_err();
        let diag = err.downcast_ref::<LlmDiagnosticsError>().unwrap();
        assert_eq!(diag.stage, Stage::Decode);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let err = client(None, "http://127.0.0.1:1/openai/v1")
            .complete(request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY is required"));
    }

    #[tokio::test]
    async fn sends_chat_completion_and_returns_text() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|headers: AxumHeaders, Json(body): Json<Value>| async move {
                assert_eq!(
                    headers.get("authorization").unwrap().to_str().unwrap(),
                    "Bearer test-key"
                );
                assert_eq!(body["model"], DEFAULT_MODEL);
                assert_eq!(body["max_tokens"], 150);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "Tell me something");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "The printer knows."}}]
                }))
            }),
        );
        let base_url = spawn_mock_groq(app).await;

        let text = client(Some("test-key"), &base_url)
            .complete(request())
            .await
            .unwrap();
        assert_eq!(text, "The printer knows.");
    }

    #[tokio::test]
    async fn non_success_status_keeps_raw_body() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "slow down"}})),
                )
            }),
        );
        let base_url = spawn_mock_groq(app).await;

        let err = client(Some("test-key"), &base_url)
            .complete(request())
            .await
            .unwrap_err();
        let diag = err.downcast_ref::<LlmDiagnosticsError>().unwrap();
        assert_eq!(diag.stage, Stage::Http);
        assert_eq!(diag.provider, Provider::Groq);
        assert!(diag.raw_output.as_deref().unwrap().contains("slow down"));
        assert_eq!(
            diag.raw_response_json.as_ref().unwrap()["error"]["message"],
            "slow down"
        );
    }
}

//! Remote relevance judge backed by an OpenAI-compatible chat-completions
//! endpoint (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// Default model used for classification.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout:free";

/// OpenRouter chat-completions endpoint.
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are an expert Discord bot that determines if a message is asking for help with installing, downloading, getting, or sideloading the Firka app on iOS devices. The user may write in Hungarian or English, and may use slang or typos. Only respond with 'true' or 'false'.";

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// Worth another attempt: the request may never have reached the model.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() { Self::Timeout } else { Self::Transport(e) }
    }
}

/// Second-stage judge. Returns the model's raw answer text.
#[async_trait]
pub trait RemoteJudge: Send + Sync {
    async fn judge(&self, text: &str) -> Result<String, ClassifierError>;
}

pub struct OpenRouterJudge {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterJudge {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

pub fn request_body(model: &str, text: &str) -> Value {
    let user_prompt = format!(
        "A következő üzenet arról érdeklődik, hogyan lehet letölteni, telepíteni vagy sideloadolni a Firka alkalmazást iOS-re, iPhone-ra vagy iPadre? Válaszolj csak \"true\" vagy \"false\" értékkel.\n\nÜzenet: \"{}\"",
        text
    );

    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": user_prompt}
        ],
        "temperature": 0
    })
}

/// Pulls `choices[0].message.content` out of a completion body.
pub fn completion_text(body: &Value) -> Result<String, ClassifierError> {
    if let Some(error) = body.get("error") {
        let message = error.get("message").and_then(Value::as_str).unwrap_or("unknown error");
        return Err(ClassifierError::Malformed(format!("API error: {}", message)));
    }

    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ClassifierError::Malformed("no content in first choice".to_string()))
}

#[async_trait]
impl RemoteJudge for OpenRouterJudge {
    async fn judge(&self, text: &str) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body(&self.model, text))
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ClassifierError::Status { status: status.as_u16(), body: raw });
        }
        debug!(body = %raw, "Classifier response");

        let body: Value = serde_json::from_str(&raw).map_err(|e| ClassifierError::Malformed(e.to_string()))?;
        completion_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn judge_for(server: &MockServer) -> OpenRouterJudge {
        OpenRouterJudge::new(server.uri(), "test-key", DEFAULT_MODEL, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_body_is_deterministic_and_embeds_text() {
        let body = request_body("m", "firka iphone?");
        assert_eq!(body["model"], "m");
        assert_eq!(body["temperature"], 0);
        assert_eq!(body["messages"][0]["role"], "system");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Üzenet: \"firka iphone?\""));
    }

    #[test]
    fn test_completion_text_reads_first_choice() {
        let body = json!({"choices": [{"message": {"content": " True\n"}}, {"message": {"content": "false"}}]});
        assert_eq!(completion_text(&body).unwrap(), " True\n");
    }

    #[test]
    fn test_completion_text_rejects_missing_choices() {
        assert!(matches!(completion_text(&json!({"choices": []})), Err(ClassifierError::Malformed(_))));
        assert!(matches!(
            completion_text(&json!({"error": {"message": "rate limited"}})),
            Err(ClassifierError::Malformed(m)) if m.contains("rate limited")
        ));
    }

    #[tokio::test]
    async fn test_judge_posts_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": DEFAULT_MODEL, "temperature": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "true"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(judge_for(&server).judge("firka iphone").await.unwrap(), "true");
    }

    #[tokio::test]
    async fn test_judge_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = judge_for(&server).judge("firka iphone").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Status { status: 429, ref body } if body == "slow down"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_judge_reports_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = judge_for(&server).judge("firka iphone").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_judge_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "true"}}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let judge = OpenRouterJudge::new(server.uri(), "k", DEFAULT_MODEL, Duration::from_millis(200)).unwrap();
        let err = judge.judge("firka iphone").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Timeout));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_judge_unreachable_host_is_transient() {
        let judge = OpenRouterJudge::new("http://127.0.0.1:1/v1/chat/completions", "k", DEFAULT_MODEL, Duration::from_secs(2)).unwrap();

        let err = judge.judge("firka iphone").await.unwrap_err();
        assert!(err.is_transient());
    }
}

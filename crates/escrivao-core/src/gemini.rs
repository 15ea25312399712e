//! Client for the Gemini `generateContent` endpoint.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ServiceError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// A generative-language backend that turns a prompt into text.
pub trait GenerativeApi: Send + Sync {
    /// Send `prompt` authenticated with `api_key` and return the cleaned
    /// text of the first candidate.
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>>;
}

/// Endpoint settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub model: String,
    /// Per-request timeout. `None` leaves it to the network stack.
    pub timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, settings: ApiSettings) -> Self {
        Self { client, settings }
    }

    /// Endpoint URL without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

impl GenerativeApi for GeminiClient {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>> {
        Box::pin(async move {
            let body = GenerateRequest {
                contents: vec![RequestContent {
                    parts: vec![RequestPart { text: prompt }],
                }],
            };

            let mut req = self
                .client
                .post(self.endpoint())
                .query(&[("key", api_key)])
                .json(&body);
            if let Some(timeout) = self.settings.timeout {
                req = req.timeout(timeout);
            }

            tracing::debug!(model = %self.settings.model, prompt_chars = prompt.len(), "calling generative API");
            let resp = req.send().await?;
            read_response(resp).await
        })
    }
}

/// Interpret a `generateContent` response.
///
/// Non-success statuses become [`ServiceError::ApiHttp`] carrying the
/// service's `error.message` when the body has one.
pub async fn read_response(resp: reqwest::Response) -> Result<String, ServiceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Erro HTTP: {}", status.as_u16()));
        tracing::warn!(status = status.as_u16(), "generative API returned an error");
        return Err(ServiceError::ApiHttp {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    let parsed: GenerateResponse = serde_json::from_str(&body)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| ServiceError::MalformedResponse("resposta sem candidatos de texto".into()))?;

    Ok(clean_response_text(&text))
}

/// Remove code-fence markers and surrounding whitespace.
pub fn clean_response_text(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

// ── Wire types ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> reqwest::Response {
        let http_resp = http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(http_resp)
    }

    #[test]
    fn clean_strips_fences_and_whitespace() {
        assert_eq!(clean_response_text("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_response_text("  OK \n"), "OK");
        assert_eq!(clean_response_text("```\ntexto\n```"), "texto");
    }

    #[tokio::test]
    async fn success_takes_first_candidate_part() {
        let body = r#"{"candidates": [
            {"content": {"parts": [{"text": "```json\n{\"a\":1}\n```"}, {"text": "ignored"}]}},
            {"content": {"parts": [{"text": "second"}]}}
        ]}"#;
        let text = read_response(response(200, body)).await.unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn error_uses_service_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}}"#;
        let err = read_response(response(400, body)).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::ApiHttp {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".into()
            }
        );
    }

    #[tokio::test]
    async fn error_without_message_falls_back_to_status() {
        let err = read_response(response(503, "upstream down")).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::ApiHttp {
                status: 503,
                message: "Erro HTTP: 503".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_candidates_is_malformed() {
        let err = read_response(response(200, r#"{"candidates": []}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));

        let err = read_response(response(200, "<html>")).await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "olá" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "olá"}]}]})
        );
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            ApiSettings {
                base_url: "http://localhost:9/v1beta/".into(),
                ..ApiSettings::default()
            },
        );
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }
}

//! Text generation backend.
//!
//! [`GenerationClient`] performs the single `generateText` round trip.
//! [`GenerationService`] runs that round trip on a background task and hands
//! the outcome back to the event loop over a channel, tagged with the id of
//! the request that produced it.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{GenerateTextRequest, GenerateTextResponse};
use crate::core::config::Settings;
use crate::utils::url::generate_text_url;

/// Why a generation request produced no usable output.
#[derive(Debug)]
pub enum GenerateError {
    /// The request never completed (DNS, TLS, connection reset, ...).
    Transport(reqwest::Error),
    /// The upstream answered with a non-success status.
    Status { status: u16, summary: Option<String> },
    /// The body was not the expected JSON document.
    Decode(serde_json::Error),
    /// The body parsed but carried no candidate output.
    NoCandidates,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Transport(source) => write!(f, "request failed: {source}"),
            GenerateError::Status {
                status,
                summary: Some(summary),
            } => write!(f, "upstream returned {status}: {summary}"),
            GenerateError::Status {
                status,
                summary: None,
            } => write!(f, "upstream returned {status}"),
            GenerateError::Decode(source) => write!(f, "malformed response: {source}"),
            GenerateError::NoCandidates => write!(f, "response contained no candidates"),
        }
    }
}

impl StdError for GenerateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GenerateError::Transport(source) => Some(source),
            GenerateError::Decode(source) => Some(source),
            _ => None,
        }
    }
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl GenerationClient {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            url: generate_text_url(&settings.host, &settings.model),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateText request");

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .json(&GenerateTextRequest::new(prompt))
            .send()
            .await
            .map_err(GenerateError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GenerateError::Transport)?;
        debug!(status = status.as_u16(), body_len = body.len(), "generateText responded");

        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                summary: extract_error_summary(&body),
            });
        }

        let parsed: GenerateTextResponse =
            serde_json::from_str(&body).map_err(GenerateError::Decode)?;
        parsed
            .first_output()
            .map(str::to_owned)
            .ok_or(GenerateError::NoCandidates)
    }
}

/// Pull a one-line message out of an API error body, if it has one.
fn extract_error_summary(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Outcome of one background request.
#[derive(Debug)]
pub struct GenerationResult {
    pub request_id: u64,
    pub outcome: Result<String, GenerateError>,
}

pub struct RequestParams {
    pub generator: Arc<dyn TextGenerator>,
    pub prompt: String,
    pub request_id: u64,
    pub cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct GenerationService {
    tx: mpsc::UnboundedSender<GenerationResult>,
}

impl GenerationService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GenerationResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_request(&self, params: RequestParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let RequestParams {
                generator,
                prompt,
                request_id,
                cancel_token,
            } = params;

            tokio::select! {
                outcome = generator.generate(&prompt) => {
                    let _ = tx.send(GenerationResult { request_id, outcome });
                }
                _ = cancel_token.cancelled() => {
                    debug!(request_id, "Request cancelled before completion");
                }
            }
        });
    }
}

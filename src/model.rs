//! Model collaborator: one stateless `generate(prompt) -> text` call.
//!
//! [`GeminiClient`] talks to the Vertex AI `generateContent` REST endpoint.
//! Tests substitute any other [`ModelClient`] implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ModelError;

pub const DEFAULT_LOCATION: &str = "asia-northeast1";
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Generative-text backend. Implementations must be safe to share across requests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Send a single prompt and return the raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

// ══════════════════════════════════════════════════════════════════════════════
// VERTEX AI REQUEST/RESPONSE TYPES
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ══════════════════════════════════════════════════════════════════════════════
// CLIENT
// ══════════════════════════════════════════════════════════════════════════════

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub project: Option<String>,
    pub location: String,
    pub model: String,
    /// OAuth bearer token, e.g. from `gcloud auth print-access-token`.
    pub access_token: Option<String>,
    /// Overrides `https://{location}-aiplatform.googleapis.com`.
    pub endpoint: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            project: None,
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            access_token: None,
            endpoint: None,
        }
    }
}

/// Vertex AI Gemini client.
pub struct GeminiClient {
    client: Client,
    url: String,
    model: String,
    access_token: Option<String>,
}

impl GeminiClient {
    /// Fails with [`ModelError::NotConfigured`] when no project is set.
    pub fn new(settings: GeminiSettings) -> Result<Self, ModelError> {
        let project = settings
            .project
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ModelError::NotConfigured("GOOGLE_CLOUD_PROJECT is not set".into()))?;

        let endpoint = settings
            .endpoint
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", settings.location));

        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            project,
            settings.location,
            settings.model
        );

        Ok(Self {
            client: Client::new(),
            url,
            model: settings.model,
            access_token: settings.access_token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let start = Instant::now();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        debug!(url = %self.url, prompt_chars = prompt.chars().count(), "calling model");
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        info!(
            model = %self.model,
            finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
            reply_chars = text.chars().count(),
            latency_ms = start.elapsed().as_millis() as u64,
            "model reply received"
        );
        Ok(text)
    }
}

//! Chat-completion client for report generation.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint; DeepSeek is
//! the default. The model output is opaque text; the only check applied is
//! that it is not empty.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    Res,
    config::{self, Credentials, Endpoints},
    error::AppError,
    ports::{Completion, ReportKind},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

pub const AR_SYSTEM_PROMPT: &str = "You are an experienced A&R specialist with deep knowledge of the music industry, artist development, and market trends.";

pub const TASTE_SYSTEM_PROMPT: &str =
    "You are an expert music analyst specializing in user behavior and music trends.";

pub const TRACK_SYSTEM_PROMPT: &str = "You are an AI-powered Music Strategist and A&R specialist focused on African music. \
Analyze the provided information including Spotify metrics and audio features to give insights about:
1. Musical elements and production quality
2. Market potential and target audience
3. Cultural relevance and authenticity
4. Recommendations for growth and development";

pub const SCOUT_SYSTEM_PROMPT: &str = "You are an AI-powered A&R specialist focused on discovering emerging African talent. \
Search for and analyze:
1. Emerging artists in the specified region/genre
2. Streaming and social media metrics
3. Recent breakthrough moments
4. Market potential and unique selling points
5. Recommendations for artist development";

impl ReportKind {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            ReportKind::ArReport => AR_SYSTEM_PROMPT,
            ReportKind::TasteAnalysis => TASTE_SYSTEM_PROMPT,
            ReportKind::TrackAnalysis => TRACK_SYSTEM_PROMPT,
            ReportKind::TalentScout => SCOUT_SYSTEM_PROMPT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
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

/// OpenAI-compatible chat-completion client.
pub struct AiClient {
    http: Client,
    base_url: String,
    model: String,
    credentials: Credentials,
}

impl AiClient {
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        Self::with_model(credentials, endpoints, config::deepseek_model())
    }

    pub fn with_model(
        credentials: &Credentials,
        endpoints: &Endpoints,
        model: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: endpoints.deepseek_api.trim_end_matches('/').to_string(),
            model: model.into(),
            credentials: credentials.clone(),
        }
    }

    /// Sends an explicit message list and returns the first choice's text.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Res<String> {
        let api_key = self.credentials.require_deepseek_api_key()?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiRequestFailed(format!("request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let reason = match status.as_u16() {
                401 | 403 => "authentication failed",
                429 => "rate limited",
                _ => "upstream error",
            };
            return Err(AppError::AiRequestFailed(format!(
                "{} (status {})",
                reason,
                status.as_u16()
            )));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AppError::AiRequestFailed(format!("invalid response: {}", e)))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::AiRequestFailed(
                "model returned an empty response".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl Completion for AiClient {
    async fn generate(&self, kind: ReportKind, prompt: &str) -> Res<String> {
        self.chat(vec![
            ChatMessage::system(kind.system_prompt()),
            ChatMessage::user(prompt),
        ])
        .await
    }
}

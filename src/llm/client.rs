//! Hosted text generation through the Gemini `generateContent` API

use crate::config::{Config, GenerationConfig};
use crate::error::{Result, ResumeAtsError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Sends one prompt, returns the model's text
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joined text of the first candidate; empty or blocked output is a failure
    pub fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ResumeAtsError::GenerationFailed(format!("prompt blocked: {}", reason)));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ResumeAtsError::GenerationFailed("response contained no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ResumeAtsError::GenerationFailed(format!(
                "empty response (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &GenerationConfig, model: &str, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ResumeAtsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config, api_key: String) -> Result<Self> {
        Self::new(&config.generation, &config.models.generation_model, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("POST {} ({} prompt chars)", self.url(), prompt.len());

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResumeAtsError::GenerationFailed(format!("request to {} timed out", self.model))
                } else {
                    ResumeAtsError::GenerationFailed(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            return Err(ResumeAtsError::GenerationFailed(format!("{} returned {}: {}", self.model, status, snippet)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ResumeAtsError::GenerationFailed(format!("unreadable response: {}", e)))?;

        let text = parsed.into_text()?;
        info!("{} answered in {:.2?} ({} chars)", self.model, start_time.elapsed(), text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_joins_candidate_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"- ATS score: 72\n"},{"text":"- Missing: flask"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(response.into_text().unwrap(), "- ATS score: 72\n- Missing: flask");
    }

    #[test]
    fn test_empty_text_is_failure() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]},"finishReason":"MAX_TOKENS"}]}"#);
        let err = response.into_text().unwrap_err();
        assert!(matches!(err, ResumeAtsError::GenerationFailed(ref m) if m.contains("MAX_TOKENS")));
    }

    #[test]
    fn test_no_candidates_is_failure() {
        let err = parse(r#"{}"#).into_text().unwrap_err();
        assert!(matches!(err, ResumeAtsError::GenerationFailed(_)));
    }

    #[test]
    fn test_blocked_prompt_is_failure() {
        let err = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).into_text().unwrap_err();
        assert!(matches!(err, ResumeAtsError::GenerationFailed(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_request_url() {
        let mut settings = Config::default().generation;
        settings.endpoint = "http://localhost:9/v1beta/".to_string();
        let client = GeminiClient::new(&settings, "gemini-flash-latest", "key".to_string()).unwrap();
        assert_eq!(client.url(), "http://localhost:9/v1beta/models/gemini-flash-latest:generateContent");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generation_failure() {
        let mut settings = Config::default().generation;
        settings.endpoint = "http://127.0.0.1:9".to_string();
        settings.timeout_secs = 2;
        let client = GeminiClient::new(&settings, "gemini-flash-latest", "key".to_string()).unwrap();

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, ResumeAtsError::GenerationFailed(_)));
    }
}

//! Tips from the Gemini text-generation API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TipConfig;

use super::{random_fallback, TipSource, FALLBACK_TIPS};

/// Prompt sent with every tip request.
pub const TIP_PROMPT: &str = "The user is taking a 30-second 'ocular rest' break from their \
screen. Suggest a very quick 1-sentence eye exercise or a positive health affirmation to \
encourage looking away from the screen.";

const MAX_OUTPUT_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.7;

/// Errors from a single tip request. Never leave this module.
#[derive(Debug, thiserror::Error)]
pub enum TipError {
    #[error("Tip request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Tip service answered with status {0}")]
    Status(u16),
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Returns the trimmed text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

// ============================================================================
// GeminiTipSource
// ============================================================================

/// Fetches tips from the Gemini `generateContent` endpoint.
///
/// One attempt per tip. Without an API key no request is made and a random
/// fallback is returned; a failed request yields the second fallback tip and
/// an empty answer the first.
#[derive(Debug, Clone)]
pub struct GeminiTipSource {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl GeminiTipSource {
    #[must_use]
    pub fn new(config: &TipConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty() && key != "undefined");

        Self {
            client,
            api_key,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
        }
    }

    /// Returns true if requests will actually be made.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(&self, api_key: &str) -> Result<Option<String>, TipError> {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: TIP_PROMPT }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TipError::Status(response.status().as_u16()));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

impl TipSource for GeminiTipSource {
    async fn fetch_tip(&self) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No tip API key configured, using a local tip");
            return random_fallback().to_string();
        };

        match self.request(api_key).await {
            Ok(Some(tip)) => tip,
            Ok(None) => FALLBACK_TIPS[0].to_string(),
            Err(e) => {
                tracing::warn!("Tip fetch failed: {}", e);
                FALLBACK_TIPS[1].to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, endpoint: &str) -> TipConfig {
        TipConfig {
            api_key: api_key.map(String::from),
            endpoint: endpoint.to_string(),
            timeout_secs: 2,
            ..TipConfig::default()
        }
    }

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let source = GeminiTipSource::new(&TipConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "some-model".to_string(),
            ..TipConfig::default()
        });
        assert_eq!(
            source.url,
            "https://example.test/v1beta/models/some-model:generateContent"
        );
    }

    #[test]
    fn test_placeholder_keys_are_ignored() {
        assert!(!GeminiTipSource::new(&config(Some(""), "http://x")).has_api_key());
        assert!(!GeminiTipSource::new(&config(Some("undefined"), "http://x")).has_api_key());
        assert!(GeminiTipSource::new(&config(Some("k"), "http://x")).has_api_key());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 100,
                temperature: 0.5,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
    }

    #[test]
    fn test_response_text_is_trimmed() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  Blink slowly. \n"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Blink slowly."));
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(response.text(), None);

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert_eq!(response.text(), None);
    }

    #[tokio::test]
    async fn test_missing_key_uses_local_tip() {
        let source = GeminiTipSource::new(&config(None, "http://127.0.0.1:9"));
        let tip = source.fetch_tip().await;
        assert!(FALLBACK_TIPS.contains(&tip.as_str()));
    }

    #[tokio::test]
    async fn test_unreachable_service_uses_second_tip() {
        // Nothing listens on the discard port.
        let source = GeminiTipSource::new(&config(Some("key"), "http://127.0.0.1:9"));
        assert_eq!(source.fetch_tip().await, FALLBACK_TIPS[1]);
    }
}

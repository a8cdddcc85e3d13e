//! Multimodal completion upstream.
//!
//! [`VisionModel`] is the seam the diagnose handler talks to; the only real
//! implementation is [`AnthropicVision`], which sends one image plus one
//! text instruction to the Messages API and hands back the reply text.

use crate::config::Config;
use crate::data_url::ImagePayload;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_VERSION: &str = "2023-06-01";

/// How much of an upstream error body ends up in the log line.
const LOGGED_BODY_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to upstream failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream reply could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Sends `image` with `instruction` and returns the text of the first
    /// content block, or an empty string when there is none.
    async fn describe(&self, image: &ImagePayload, instruction: &str)
        -> Result<String, VisionError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ReplyBlock>,
}

#[derive(Debug, Deserialize)]
struct ReplyBlock {
    #[serde(default)]
    text: Option<String>,
}

// ============================================================================
// Anthropic client
// ============================================================================

pub struct AnthropicVision {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicVision {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[async_trait]
impl VisionModel for AnthropicVision {
    async fn describe(
        &self,
        image: &ImagePayload,
        instruction: &str,
    ) -> Result<String, VisionError> {
        let api_key = self.api_key.as_ref().ok_or(VisionError::MissingApiKey)?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: [
                    ContentPart::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: &image.media_type,
                            data: &image.data,
                        },
                    },
                    ContentPart::Text { text: instruction },
                ],
            }],
        };

        tracing::info!(
            model = %self.model,
            media_type = %image.media_type,
            payload_chars = image.data.len(),
            "📤 Sending image to Anthropic"
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(VisionError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(VisionError::Transport)?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %truncate(&body, LOGGED_BODY_LIMIT),
                "Anthropic error"
            );
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::Decode(e.to_string()))?;

        let text = reply
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .unwrap_or_default();

        tracing::debug!(reply_chars = text.len(), "✅ Anthropic replied");
        Ok(text)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_has_image_then_text() {
        let request = MessagesRequest {
            model: "claude-test",
            max_tokens: 2000,
            messages: [Message {
                role: "user",
                content: [
                    ContentPart::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: "image/png",
                            data: "AAAA",
                        },
                    },
                    ContentPart::Text { text: "diagnose" },
                ],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "claude-test",
                "max_tokens": 2000,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "AAAA"}},
                        {"type": "text", "text": "diagnose"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn first_block_without_text_reads_as_empty() {
        let reply: MessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "tool_use", "id": "x", "name": "y", "input": {}}, {"type": "text", "text": "{}"}]
        }))
        .unwrap();
        let text = reply.content.into_iter().next().and_then(|b| b.text);
        assert_eq!(text, None);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("₹₹", 4), "₹");
        assert_eq!(truncate("short", 500), "short");
    }
}

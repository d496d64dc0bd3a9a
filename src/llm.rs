//! Text-generation client for OpenAI-compatible chat completion endpoints.
//!
//! This is the one place the pipeline talks to an external service, and it
//! never fails: every outcome is a [`Generation`]. A caller that only needs
//! text calls [`Generation::into_text`]; tests and logs can tell a real
//! completion from a placeholder by matching on the variant.
//!
//! | Situation | Result |
//! |---|---|
//! | No API key configured | `Degraded { cause: Offline }`, echo of the prompt, no request |
//! | Non-2xx response | `Degraded { cause: Status(code) }`, fixed apology |
//! | Connection / timeout / bad body | `Degraded { cause: Transport / Decode }`, fixed apology |
//! | 2xx with content | `Text(content.trim())` |
//! | 2xx without content | `Text("")` |

use crate::config::LlmConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix of the offline echo, so callers and users can spot it.
pub const OFFLINE_MARKER: &str = "MOCK:";

/// Returned in place of model output when the upstream call fails.
pub const APOLOGY: &str = "Gagal memanggil LLM. Coba cek API key / limit.";

/// How many characters of the user prompt the offline echo keeps.
const OFFLINE_ECHO_CHARS: usize = 140;

/// Sampling parameters for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 600,
        }
    }
}

/// Why a generation fell back to placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeCause {
    /// No credential configured.
    Offline,
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// Request never completed (connect error, timeout).
    Transport(String),
    /// Success status but the body was not a chat completion.
    Decode(String),
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    Degraded { text: String, cause: DegradeCause },
}

impl Generation {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Degraded { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    fn apology(cause: DegradeCause) -> Self {
        Self::Degraded {
            text: APOLOGY.to_string(),
            cause,
        }
    }
}

/// Anything that can turn a system + user prompt into text.
///
/// The HTTP client implements this; tests substitute recording fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str, sampling: Sampling) -> Generation;
}

/// Offline echo: `MOCK: <first 140 chars of the prompt> ...`.
pub fn offline_echo(user: &str) -> String {
    let head: String = user.chars().take(OFFLINE_ECHO_CHARS).collect();
    format!("{OFFLINE_MARKER} {head} ...")
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for `<base_url>/chat/completions`.
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn is_offline(&self) -> bool {
        self.config.api_key().is_none()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, user: &str, sampling: Sampling) -> Generation {
        let Some(api_key) = self.config.api_key() else {
            tracing::debug!("no LLM credential configured, returning offline echo");
            return Generation::Degraded {
                text: offline_echo(user),
                cause: DegradeCause::Offline,
            };
        };

        let body = ChatRequest {
            model: &self.config.model,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = match self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM request failed: {e}");
                return Generation::apology(DegradeCause::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("LLM error ({status}): {text}");
            return Generation::apology(DegradeCause::Status(status.as_u16()));
        }

        match response.json::<ChatResponse>().await {
            Ok(data) => {
                let content = data
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message)
                    .and_then(|m| m.content)
                    .unwrap_or_default();
                Generation::Text(content.trim().to_string())
            }
            Err(e) => {
                tracing::error!("LLM response could not be decoded: {e}");
                Generation::apology(DegradeCause::Decode(e.to_string()))
            }
        }
    }
}

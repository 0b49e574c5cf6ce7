// Chat Completion Backend
//
// Request and response types in the OpenAI chat-completions shape, which Groq and
// most hosted backends accept unchanged

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpChatBackend;

/// A chat message sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (system, user, assistant)
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Fixed sampling parameters for every generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

impl From<&GenerationConfig> for SamplingParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        }
    }
}

/// Chat completion request (non-streaming)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// A single user-role message with the given sampling parameters
    pub fn single_user(model: impl Into<String>, prompt: impl Into<String>, sampling: SamplingParams) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            stream: false,
        }
    }
}

/// Chat completion response, only the fields we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice; some backends send `content: null`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Convenience constructor for a one-choice assistant reply
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                index: 0,
                message: ResponseMessage {
                    role: Some("assistant".to_string()),
                    content: Some(text.into()),
                },
                finish_reason: Some("stop".to_string()),
            }],
        }
    }
}

/// Something that can answer a chat-completion request
///
/// Injected into the agent at construction so tests can script the replies.
pub trait GenerationBackend: Send + Sync {
    fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError>;
}

/// Text of `choices[0].message.content`
///
/// No choices, a null content or blank text is `GenerationError::EmptyResponse`.
pub fn first_choice_text(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

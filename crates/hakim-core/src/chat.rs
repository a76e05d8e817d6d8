//! Chat-completion wire format
//!
//! Request and response shapes for an OpenAI-compatible chat completions endpoint:
//! ```text
//! {"model":"...","messages":[{"role":"system","content":"..."},{"role":"user","content":[{"type":"text","text":"..."},{"type":"image_url","image_url":{"url":"...","detail":"high"}}]}],"temperature":0.3,"max_tokens":2000}
//! ```

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// User message content as built by the classifier.
///
/// Converted into the wire [`MessageContent`] when the message is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    /// Plain text only
    TextOnly(String),

    /// Text followed by one image part per reference
    TextWithImages {
        text: String,
        image_refs: Vec<String>,
        detail: String,
    },
}

impl UserContent {
    /// Pick the message shape from the presence of images
    pub fn build(text: impl Into<String>, image_refs: &[String], detail: &str) -> Self {
        let text = text.into();
        if image_refs.is_empty() {
            Self::TextOnly(text)
        } else {
            Self::TextWithImages {
                text,
                image_refs: image_refs.to_vec(),
                detail: detail.to_string(),
            }
        }
    }
}

impl From<UserContent> for MessageContent {
    fn from(content: UserContent) -> Self {
        match content {
            UserContent::TextOnly(text) => Self::Text(text),
            UserContent::TextWithImages {
                text,
                image_refs,
                detail,
            } => {
                let mut parts = Vec::with_capacity(image_refs.len() + 1);
                parts.push(ContentPart::Text { text });
                parts.extend(image_refs.into_iter().map(|url| ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url,
                        detail: Some(detail.clone()),
                    },
                }));
                Self::Parts(parts)
            }
        }
    }
}

/// Message content on the wire: a plain string or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single part of a multimodal message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image passed by reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,

    /// "low", "high" or "auto"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message
    pub fn user(content: UserContent) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completions request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat completions response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

impl ChatCompletionResponse {
    /// Text content of the first candidate, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Top-level error object returned by the endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}

//! Chat Completions wire types.
//!
//! Request and response structures for the OpenAI-compatible
//! `chat/completions` endpoint exposed by Azure AI projects. Only the
//! fields this application sends or reads are modelled.

// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Everything the inference collaborator needs for one answer.
#[derive(Clone)]
pub struct VisionPrompt {
    pub system_prompt: String,
    pub question: String,
    /// `data:<mime>;base64,<payload>`
    pub image_data_uri: String,
}

// The data URI can be megabytes long
impl std::fmt::Debug for VisionPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionPrompt")
            .field("system_prompt", &self.system_prompt)
            .field("question", &self.question)
            .field("image_data_uri_len", &self.image_data_uri.len())
            .finish()
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Message content is either plain text or a list of typed parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatCompletionRequest {
    /// System instruction followed by one user turn holding the question and the image.
    pub fn from_prompt(model: &str, prompt: &VisionPrompt) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(prompt.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: prompt.question.clone(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: prompt.image_data_uri.clone(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Chat completion response; unused fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// `choices[0].message.content`, unless it is missing or blank.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .content
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

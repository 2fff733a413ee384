// Error types for vision-chat
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionChatError {
    #[error("Could not load image: {0}")]
    ImageFetch(String),

    #[error("Invalid image URL '{url}': {reason}")]
    InvalidImageUrl { url: String, reason: String },

    #[error("Image size {size} bytes exceeds maximum of {limit} bytes")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("Please enter a question first!")]
    MissingQuestion,

    #[error("Please provide a valid image URL first!")]
    MissingImage,

    #[error("No {kind} numbered {number}")]
    UnknownSelection { kind: &'static str, number: usize },

    #[error("{0} (type /help for commands)")]
    InvalidCommand(String),

    #[error("Inference API error (HTTP {status}): {message}")]
    Inference { status: u16, message: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("No credential available: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// How the front-end should present a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Input was incomplete; nothing was sent over the network.
    Warning,
    /// The action ran and failed.
    Error,
}

impl VisionChatError {
    pub fn severity(&self) -> Severity {
        match self {
            VisionChatError::MissingQuestion
            | VisionChatError::MissingImage
            | VisionChatError::UnknownSelection { .. }
            | VisionChatError::InvalidCommand(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// True for failures raised while acquiring the image.
    pub fn is_image_load(&self) -> bool {
        matches!(
            self,
            VisionChatError::ImageFetch(_)
                | VisionChatError::InvalidImageUrl { .. }
                | VisionChatError::ImageTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, VisionChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_warning() {
        assert_eq!(VisionChatError::MissingQuestion.severity(), Severity::Warning);
        assert_eq!(VisionChatError::MissingImage.severity(), Severity::Warning);
        assert_eq!(
            VisionChatError::Inference { status: 500, message: "boom".into() }.severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_image_load_classification() {
        assert!(VisionChatError::ImageFetch("HTTP 404".into()).is_image_load());
        assert!(VisionChatError::ImageTooLarge { size: 2, limit: 1 }.is_image_load());
        assert!(!VisionChatError::MissingImage.is_image_load());
    }
}

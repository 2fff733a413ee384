//! Configuration data structures for vision-chat.
//!
//! This module defines the schema for the application settings: the
//! inference project connection, image fetching, credential selection
//! and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Inference project endpoint (`PROJECT_CONNECTION`).
    #[serde(default)]
    pub project_connection: String,

    /// Model deployment identifier (`MODEL_DEPLOYMENT`).
    #[serde(default)]
    pub model_deployment: String,

    /// Chat-completion request settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Image download settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Credential chain settings.
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// API version tag appended to every request.
    /// Default: `2024-10-21`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// System instruction sent ahead of the user's question.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_inference_timeout")]
    pub timeout_seconds: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Settings for downloading the user's image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Identifying header sent with the GET; some hosts reject requests without one.
    /// Default: `Mozilla/5.0`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    /// Largest accepted image body.
    /// Default: 20 MiB
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

/// Settings for the credential chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Static API key. When set it is tried before any CLI login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Token scope requested from the identity provider.
    /// Default: `https://cognitiveservices.azure.com/.default`
    #[serde(default = "default_scope")]
    pub scope: String,

    #[serde(default)]
    pub exclude_azure_cli: bool,

    #[serde(default)]
    pub exclude_azure_developer_cli: bool,

    /// Seconds before expiry at which a cached token is refreshed.
    /// Default: `300` (5 minutes)
    #[serde(default = "default_refresh_buffer")]
    pub refresh_buffer_seconds: i64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `warn`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_connection: String::new(),
            model_deployment: String::new(),
            inference: InferenceConfig::default(),
            fetch: FetchConfig::default(),
            credential: CredentialConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            system_prompt: default_system_prompt(),
            timeout_seconds: default_inference_timeout(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_fetch_timeout(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            scope: default_scope(),
            exclude_azure_cli: false,
            exclude_azure_developer_cli: false,
            refresh_buffer_seconds: default_refresh_buffer(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants

/// API version pinned for the chat-completions endpoint.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// System instruction used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant that analyzes images and provides detailed, helpful responses about what you see.";

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_inference_timeout() -> u64 {
    120
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_max_image_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_scope() -> String {
    "https://cognitiveservices.azure.com/.default".to_string()
}

fn default_refresh_buffer() -> i64 {
    300
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

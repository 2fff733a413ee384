// Inference API module
// Author: kelexine (https://github.com/kelexine)

mod client;
pub mod models;

pub use client::AzureOpenAiClient;
pub use models::VisionPrompt;

use crate::error::Result;
use async_trait::async_trait;

/// Turns a multimodal prompt into a single text answer.
///
/// One call is one outbound request; implementations do not retry.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, prompt: &VisionPrompt) -> Result<String>;
}

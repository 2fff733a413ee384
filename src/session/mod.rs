//! Interaction state and the ask flow.
//!
//! `ViewState` is the single record the front-end owns: the current image
//! URL, the current question and what the last preview loaded. Handlers take
//! it by reference; there is no global session.
//!
//! `Assistant` runs the two network actions against that state. `preview`
//! validates the image URL by fetching it, and `submit` checks the inputs,
//! fetches a fresh payload and asks the inference client for one answer.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod presets;

pub use presets::{PresetQuestion, SampleImage, DEFAULT_IMAGE_URL, PRESET_QUESTIONS, SAMPLE_IMAGES};

use crate::config::AppConfig;
use crate::error::{Result, VisionChatError};
use crate::inference::{InferenceClient, VisionPrompt};
use crate::vision::ImageFetcher;
use tracing::{debug, info, warn};

/// What the last successful preview fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub mime_type: String,
    pub byte_len: usize,
}

/// Ephemeral view state for one user session.
#[derive(Debug, Clone)]
pub struct ViewState {
    image_url: String,
    question: String,
    loaded_image: Option<LoadedImage>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Start with the default sample image and no question.
    pub fn new() -> Self {
        Self {
            image_url: DEFAULT_IMAGE_URL.to_string(),
            question: String::new(),
            loaded_image: None,
        }
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn loaded_image(&self) -> Option<&LoadedImage> {
        self.loaded_image.as_ref()
    }

    /// Replace the image URL. A different URL invalidates the loaded image.
    /// Returns whether the URL changed.
    pub fn set_image_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into().trim().to_string();
        if url == self.image_url {
            return false;
        }
        self.image_url = url;
        self.loaded_image = None;
        true
    }

    /// Replace the question; the last writer wins.
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Fill the question from a preset (1-based).
    pub fn apply_preset(&mut self, number: usize) -> Result<&'static PresetQuestion> {
        let preset = presets::preset(number).ok_or(VisionChatError::UnknownSelection {
            kind: "preset question",
            number,
        })?;
        self.set_question(preset.text);
        Ok(preset)
    }

    /// Switch to a sample image (1-based).
    pub fn apply_sample(&mut self, number: usize) -> Result<&'static SampleImage> {
        let sample = presets::sample(number).ok_or(VisionChatError::UnknownSelection {
            kind: "sample image",
            number,
        })?;
        self.set_image_url(sample.url);
        Ok(sample)
    }
}

/// Runs previews and submissions against a `ViewState`.
pub struct Assistant<I> {
    fetcher: ImageFetcher,
    inference: I,
    system_prompt: String,
}

impl<I: InferenceClient> Assistant<I> {
    pub fn new(fetcher: ImageFetcher, inference: I, system_prompt: impl Into<String>) -> Self {
        Self {
            fetcher,
            inference,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn inference(&self) -> &I {
        &self.inference
    }

    /// Fetch the current URL to confirm it is a loadable image.
    ///
    /// On success the image is recorded as loaded; on any failure the
    /// loaded image is cleared so a later submit warns instead of sending.
    pub async fn preview<'s>(&self, state: &'s mut ViewState) -> Result<&'s LoadedImage> {
        state.loaded_image = None;
        if state.image_url.is_empty() {
            return Err(VisionChatError::MissingImage);
        }

        match self.fetcher.fetch(&state.image_url).await {
            Ok(payload) => {
                debug!("Preview loaded {:?}", payload);
                Ok(state.loaded_image.insert(LoadedImage {
                    url: state.image_url.clone(),
                    mime_type: payload.mime_type().to_string(),
                    byte_len: payload.raw_bytes().len(),
                }))
            }
            Err(e) => {
                warn!("Preview of {} failed: {}", state.image_url, e);
                Err(e)
            }
        }
    }

    /// Ask the model the current question about the loaded image.
    ///
    /// Missing input is reported before any network traffic. Otherwise the
    /// image is fetched again and exactly one inference call is made.
    pub async fn submit(&self, state: &ViewState) -> Result<String> {
        if state.question.trim().is_empty() {
            return Err(VisionChatError::MissingQuestion);
        }
        let image = state
            .loaded_image
            .as_ref()
            .ok_or(VisionChatError::MissingImage)?;

        let payload = self.fetcher.fetch(&image.url).await?;
        info!(
            "Submitting question ({} chars) with {} image of {} bytes",
            state.question.len(),
            payload.mime_type(),
            payload.raw_bytes().len()
        );

        let prompt = VisionPrompt {
            system_prompt: self.system_prompt.clone(),
            question: state.question.clone(),
            image_data_uri: payload.into_data_uri(),
        };

        self.inference.complete(&prompt).await
    }
}

/// Endpoint and model as shown in the connection info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub endpoint: String,
    pub model: String,
}

impl ConnectionInfo {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            endpoint: config.project_connection.clone(),
            model: config.model_deployment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_default_image() {
        let state = ViewState::new();
        assert_eq!(state.image_url(), DEFAULT_IMAGE_URL);
        assert!(state.question().is_empty());
        assert!(state.loaded_image().is_none());
    }

    #[test]
    fn test_changing_url_clears_loaded_image() {
        let mut state = ViewState::new();
        state.loaded_image = Some(LoadedImage {
            url: DEFAULT_IMAGE_URL.to_string(),
            mime_type: "image/jpeg".to_string(),
            byte_len: 10,
        });

        assert!(!state.set_image_url(format!(" {} ", DEFAULT_IMAGE_URL)));
        assert!(state.loaded_image().is_some());

        assert!(state.set_image_url("https://example.com/other.png"));
        assert!(state.loaded_image().is_none());
    }

    #[test]
    fn test_presets_are_last_writer_wins() {
        let mut state = ViewState::new();
        state.set_question("my own question");
        state.apply_preset(2).unwrap();
        assert_eq!(state.question(), "Describe the colors and composition of this image");
        state.apply_preset(5).unwrap();
        assert_eq!(state.question(), "What's the mood or atmosphere of this image?");
        state.set_question("typed again");
        assert_eq!(state.question(), "typed again");
    }

    #[test]
    fn test_unknown_selection() {
        let mut state = ViewState::new();
        let err = state.apply_preset(9).unwrap_err();
        assert!(matches!(err, VisionChatError::UnknownSelection { number: 9, .. }));
        assert!(state.apply_sample(0).is_err());
        assert_eq!(state.image_url(), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_apply_sample_switches_url() {
        let mut state = ViewState::new();
        let sample = state.apply_sample(3).unwrap();
        assert_eq!(state.image_url(), sample.url);
    }

    #[test]
    fn test_connection_info() {
        let config = AppConfig {
            project_connection: "https://x.services.ai.azure.com/api/projects/p".to_string(),
            model_deployment: "gpt-4o".to_string(),
            ..AppConfig::default()
        };
        let info = ConnectionInfo::from_config(&config);
        assert_eq!(info.model, "gpt-4o");
        assert!(info.endpoint.ends_with("/api/projects/p"));
    }
}

// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{Result, VisionChatError};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Values that take precedence over every other source.
///
/// These come from the `PROJECT_CONNECTION` / `MODEL_DEPLOYMENT` settings
/// (command line flags or the environment variables of the same name).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_connection: Option<String>,
    pub model_deployment: Option<String>,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. `ConfigOverrides` (highest)
    /// 2. `VISION_CHAT__*` environment variables
    /// 3. Config file (`path`, or `~/.vision-chat/config.toml`)
    /// 4. Defaults (lowest)
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let (file_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };
        debug!("Reading configuration from {}", file_path.display());

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(file_path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            // e.g. VISION_CHAT__FETCH__USER_AGENT
            .add_source(
                Environment::with_prefix("VISION_CHAT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("project_connection", overrides.project_connection)?
            .set_override_option("model_deployment", overrides.model_deployment)?
            .build()
            .map_err(|e| VisionChatError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| VisionChatError::Config(e.to_string()))
    }

    /// `~/.vision-chat/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vision-chat")
            .join("config.toml")
    }

    /// Render this configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VisionChatError::Config(e.to_string()))
    }

    /// Write this configuration to `path`, creating parent directories.
    /// Refuses to overwrite an existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(VisionChatError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

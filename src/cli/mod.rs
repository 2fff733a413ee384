// CLI module for vision-chat
// Author: kelexine (https://github.com/kelexine)

use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// vision-chat - ask a hosted vision model questions about an image URL
#[derive(Parser, Debug)]
#[command(name = "vision-chat", version, about, long_about = None)]
pub struct Args {
    /// Image URL to ask about
    #[arg(long, short = 'u', conflicts_with = "sample")]
    pub url: Option<String>,

    /// Question to ask; without one an interactive session starts
    #[arg(long, short = 'q', conflicts_with = "preset")]
    pub question: Option<String>,

    /// Use preset question N (1-6)
    #[arg(long, short = 'p')]
    pub preset: Option<usize>,

    /// Use sample image N (1-3)
    #[arg(long, short = 's')]
    pub sample: Option<usize>,

    /// Inference project endpoint
    #[arg(long, env = "PROJECT_CONNECTION")]
    pub project_connection: Option<String>,

    /// Model deployment name
    #[arg(long, env = "MODEL_DEPLOYMENT")]
    pub model_deployment: Option<String>,

    /// Config file (default: ~/.vision-chat/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print connection info and exit
    #[arg(long)]
    pub info: bool,

    /// Write a default config file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_connection: self.project_connection.clone(),
            model_deployment: self.model_deployment.clone(),
        }
    }

    /// A question was given on the command line, so run once and exit.
    pub fn is_one_shot(&self) -> bool {
        self.question.is_some() || self.preset.is_some()
    }
}

// vision-chat - Ask a hosted vision model questions about an image URL
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use vision_chat::cli::Args;
use vision_chat::config::AppConfig;
use vision_chat::credential::ChainedCredential;
use vision_chat::inference::{AzureOpenAiClient, InferenceClient};
use vision_chat::session::{Assistant, ConnectionInfo, ViewState};
use vision_chat::ui;
use vision_chat::utils::logging;
use vision_chat::vision::ImageFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let args = Args::parse();

    // --write-config runs before loading, since the file may not exist yet
    if args.write_config {
        let path = args
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_config_path);
        AppConfig::default().write_to(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    // Phase 1: Load configuration
    let config = AppConfig::load(args.config.as_deref(), args.overrides())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting vision-chat v{}", env!("CARGO_PKG_VERSION"));

    let connection = ConnectionInfo::from_config(&config);
    let mut stdout = io::stdout();
    if args.info {
        ui::render_connection_info(&mut stdout, &connection)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Phase 3: Build the credential chain and clients
    let credential = Arc::new(ChainedCredential::from_config(&config.credential));
    let inference = AzureOpenAiClient::new(&config, credential)?;
    let fetcher = ImageFetcher::new(&config.fetch)?;
    info!(
        "Using deployment '{}' at {}",
        inference.deployment(),
        connection.endpoint
    );
    let assistant = Assistant::new(fetcher, inference, config.inference.system_prompt.clone());

    // Phase 4: Seed the view state from flags
    let mut state = ViewState::new();
    if let Some(n) = args.sample {
        state.apply_sample(n)?;
    }
    if let Some(url) = &args.url {
        state.set_image_url(url.as_str());
    }
    if let Some(n) = args.preset {
        state.apply_preset(n)?;
    }
    if let Some(question) = &args.question {
        state.set_question(question.as_str());
    }

    // Phase 5: One answer, or an interactive session
    if args.is_one_shot() {
        return run_once(&assistant, &mut state).await;
    }

    let stdin = io::stdin();
    ui::run_interactive(&assistant, &connection, &mut state, stdin.lock(), &mut stdout).await?;
    info!("Session ended");
    Ok(ExitCode::SUCCESS)
}

/// Preview, ask, print. Failures go to stderr with a non-zero exit code.
async fn run_once<I: InferenceClient>(assistant: &Assistant<I>, state: &mut ViewState) -> Result<ExitCode> {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    if let Err(e) = assistant.preview(state).await {
        ui::render_failure(&mut stderr, &e)?;
        return Ok(ExitCode::FAILURE);
    }

    match assistant.submit(state).await {
        Ok(answer) => {
            writeln!(stdout, "{}", answer)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            ui::render_failure(&mut stderr, &e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// Terminal front-end
// Author: kelexine (https://github.com/kelexine)

pub mod command;

pub use command::{parse, Command, HELP};

use crate::error::{Result, Severity, VisionChatError};
use crate::inference::InferenceClient;
use crate::session::{
    Assistant, ConnectionInfo, LoadedImage, ViewState, PRESET_QUESTIONS, SAMPLE_IMAGES,
};
use std::io::{BufRead, Write};
use tracing::debug;

pub fn render_banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "🖼️ Vision Chat")?;
    writeln!(out, "Give an image URL and ask questions about it!")?;
    writeln!(out, "Supported formats: JPG, PNG, GIF, WebP")?;
    writeln!(out)?;
    Ok(())
}

pub fn render_presets<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "💡 Quick Questions (/preset <n>):")?;
    for (i, preset) in PRESET_QUESTIONS.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, preset.label)?;
    }
    Ok(())
}

pub fn render_samples<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Try these sample images (/sample <n>):")?;
    for (i, sample) in SAMPLE_IMAGES.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, sample.label)?;
    }
    Ok(())
}

pub fn render_connection_info<W: Write>(out: &mut W, info: &ConnectionInfo) -> Result<()> {
    writeln!(out, "Connection Info")?;
    writeln!(out, "  Endpoint: {}", info.endpoint)?;
    writeln!(out, "  Model: {}", info.model)?;
    Ok(())
}

pub fn render_preview<W: Write>(out: &mut W, image: &LoadedImage) -> Result<()> {
    writeln!(
        out,
        "✅ Image loaded successfully! ({}, {} bytes)",
        image.mime_type, image.byte_len
    )?;
    Ok(())
}

pub fn render_answer<W: Write>(out: &mut W, answer: &str) -> Result<()> {
    writeln!(out, "AI Response:")?;
    writeln!(out, "{}", answer)?;
    Ok(())
}

/// Print a failed action. Warnings and errors are styled differently.
pub fn render_failure<W: Write>(out: &mut W, err: &VisionChatError) -> Result<()> {
    match err.severity() {
        Severity::Warning => writeln!(out, "⚠️  {}", err)?,
        Severity::Error if err.is_image_load() => {
            writeln!(out, "❌ {}", err)?;
            writeln!(out, "Please check the URL and make sure it's a valid image link.")?;
        }
        Severity::Error => writeln!(out, "❌ Error: {}", err)?,
    }
    Ok(())
}

async fn preview_and_render<I, W>(assistant: &Assistant<I>, state: &mut ViewState, out: &mut W) -> Result<()>
where
    I: InferenceClient,
    W: Write,
{
    match assistant.preview(state).await {
        Ok(image) => render_preview(out, image),
        Err(e) => render_failure(out, &e),
    }
}

async fn ask_and_render<I, W>(assistant: &Assistant<I>, state: &ViewState, out: &mut W) -> Result<()>
where
    I: InferenceClient,
    W: Write,
{
    if !state.question().trim().is_empty() && state.loaded_image().is_some() {
        writeln!(out, "Getting AI response...")?;
        out.flush()?;
    }
    match assistant.submit(state).await {
        Ok(answer) => render_answer(out, &answer),
        Err(e) => render_failure(out, &e),
    }
}

/// Run the interactive loop until `/quit` or end of input.
///
/// Every action's failure is rendered and the loop continues; only I/O
/// errors on the terminal itself end the session early.
pub async fn run_interactive<I, R, W>(
    assistant: &Assistant<I>,
    info: &ConnectionInfo,
    state: &mut ViewState,
    mut input: R,
    out: &mut W,
) -> Result<()>
where
    I: InferenceClient,
    R: BufRead,
    W: Write,
{
    render_banner(out)?;
    render_presets(out)?;
    render_samples(out)?;
    writeln!(out, "Type /help for commands.")?;
    writeln!(out)?;

    writeln!(out, "Image: {}", state.image_url())?;
    preview_and_render(assistant, state, out).await?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                render_failure(out, &e)?;
                continue;
            }
        };
        debug!("Command: {:?}", command);

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Info => render_connection_info(out, info)?,
            Command::ListPresets => render_presets(out)?,
            Command::ListSamples => render_samples(out)?,
            Command::Question(text) => {
                state.set_question(text);
            }
            Command::Preset(n) => match state.apply_preset(n) {
                Ok(preset) => writeln!(out, "Question: {}", preset.text)?,
                Err(e) => render_failure(out, &e)?,
            },
            Command::Url(url) => {
                state.set_image_url(url);
                preview_and_render(assistant, state, out).await?;
            }
            Command::Sample(n) => match state.apply_sample(n) {
                Ok(sample) => {
                    writeln!(out, "Image: {} {}", sample.label, sample.url)?;
                    preview_and_render(assistant, state, out).await?;
                }
                Err(e) => render_failure(out, &e)?,
            },
            Command::Preview => preview_and_render(assistant, state, out).await?,
            Command::Ask(question) => {
                if let Some(question) = question {
                    state.set_question(question);
                }
                ask_and_render(assistant, state, out).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failure_styles() {
        let mut out = Vec::new();
        render_failure(&mut out, &VisionChatError::MissingQuestion).unwrap();
        render_failure(&mut out, &VisionChatError::ImageFetch("HTTP 404 Not Found".into())).unwrap();
        render_failure(&mut out, &VisionChatError::Authentication("HTTP 401".into())).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("⚠️  Please enter a question first!"));
        assert!(text.contains("❌ Could not load image: HTTP 404 Not Found"));
        assert!(text.contains("make sure it's a valid image link"));
        assert!(text.contains("❌ Error: Authentication failed: HTTP 401"));
    }

    #[test]
    fn test_render_lists() {
        let mut out = Vec::new();
        render_presets(&mut out).unwrap();
        render_samples(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. 🔍 What do you see?"));
        assert!(text.contains("3. 🐱 Cat"));
    }
}

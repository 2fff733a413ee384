// Interactive command parsing
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, VisionChatError};

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the image URL and preview it.
    Url(String),
    /// Replace the question text.
    Question(String),
    Preset(usize),
    Sample(usize),
    /// Ask, optionally replacing the question first.
    Ask(Option<String>),
    Preview,
    ListPresets,
    ListSamples,
    Info,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Commands:
  /url <image url>     set the image URL and preview it
  /sample <n>          use sample image n (see /samples)
  /preview             load the current image again
  /preset <n>          use preset question n (see /presets)
  /ask [question]      ask the AI (optionally setting the question first)
  /presets             list preset questions
  /samples             list sample images
  /info                show connection info
  /help                show this help
  /quit                exit
Any other text replaces the current question.";

/// Parse a line typed by the user.
///
/// Lines starting with `/` are commands; anything else is question text.
pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Question(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "url" | "u" => {
            if arg.is_empty() {
                return Err(VisionChatError::InvalidCommand("/url needs an image URL".to_string()));
            }
            Ok(Command::Url(arg.to_string()))
        }
        "preset" | "p" => number(arg, "/preset").map(Command::Preset),
        "sample" | "s" => number(arg, "/sample").map(Command::Sample),
        "ask" | "a" => Ok(Command::Ask((!arg.is_empty()).then(|| arg.to_string()))),
        "preview" => Ok(Command::Preview),
        "presets" => Ok(Command::ListPresets),
        "samples" => Ok(Command::ListSamples),
        "info" => Ok(Command::Info),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(VisionChatError::InvalidCommand(format!(
            "Unknown command '/{}'",
            other
        ))),
    }
}

fn number(arg: &str, command: &str) -> Result<usize> {
    arg.parse().map_err(|_| {
        VisionChatError::InvalidCommand(format!("{} needs a number, got '{}'", command, arg))
    })
}

// vision-chat - Ask a hosted vision model questions about an image URL
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod inference;
pub mod session;
pub mod ui;
pub mod utils;
pub mod vision;

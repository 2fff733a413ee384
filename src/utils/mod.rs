//! Utility functions and helpers for vision-chat.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and log redaction.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;

//! Image acquisition and normalization.
//!
//! This module turns a user-supplied URL into an image payload that can be
//! embedded in a multimodal chat message: it downloads the bytes, decides a
//! MIME label and builds the base64 data URI.
//!
//! # Submodules
//!
//! - `models`: Image formats, the payload type and size validation.
//! - `fetch`: The HTTP download and MIME resolution rules.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod fetch;
pub mod models;

pub use fetch::{resolve_mime_type, ImageFetcher};
pub use models::{ImageFormat, ImagePayload};

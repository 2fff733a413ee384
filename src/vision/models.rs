// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, VisionChatError};
use base64::Engine;
use bytes::Bytes;
use phf::phf_map;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Unrecognized images are labelled JPEG.
    #[default]
    Jpeg,
    Png,
    Gif,
    WebP,
}

/// File extension (lower-case) to format.
static EXTENSIONS: phf::Map<&'static str, ImageFormat> = phf_map! {
    "jpg" => ImageFormat::Jpeg,
    "jpeg" => ImageFormat::Jpeg,
    "png" => ImageFormat::Png,
    "gif" => ImageFormat::Gif,
    "webp" => ImageFormat::WebP,
};

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Look up a format by file extension, ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS.get(ext.to_ascii_lowercase().as_str()).copied()
    }
}

/// A fetched image ready to embed in a multimodal chat message.
///
/// Built fresh for every submission and dropped once the request body is
/// serialized.
#[derive(Clone)]
pub struct ImagePayload {
    raw_bytes: Bytes,
    mime_type: String,
    base64_data: String,
    encoded_data_uri: String,
}

impl ImagePayload {
    pub fn new(raw_bytes: Bytes, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let base64_data = base64::engine::general_purpose::STANDARD.encode(&raw_bytes);
        let encoded_data_uri = format!("data:{};base64,{}", mime_type, base64_data);
        Self {
            raw_bytes,
            mime_type,
            base64_data,
            encoded_data_uri,
        }
    }

    pub fn raw_bytes(&self) -> &Bytes {
        &self.raw_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 of the raw bytes, without the `data:` prefix
    pub fn base64_data(&self) -> &str {
        &self.base64_data
    }

    /// `data:<mime_type>;base64,<payload>`
    pub fn data_uri(&self) -> &str {
        &self.encoded_data_uri
    }

    /// Consume the payload, keeping only the data URI.
    pub fn into_data_uri(self) -> String {
        self.encoded_data_uri
    }
}

// Payloads can be megabytes of base64; keep them out of Debug output
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.raw_bytes.len())
            .field("base64_len", &self.base64_data.len())
            .finish()
    }
}

/// Validate image data size
pub fn validate_image_size(data_len: usize, limit: usize) -> Result<()> {
    if data_len > limit {
        return Err(VisionChatError::ImageTooLarge {
            size: data_len,
            limit,
        });
    }
    Ok(())
}

// Image download and MIME resolution
// Author: kelexine (https://github.com/kelexine)

use super::models::{validate_image_size, ImageFormat, ImagePayload};
use bytes::BytesMut;
use crate::config::FetchConfig;
use crate::error::{Result, VisionChatError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

/// Downloads images and turns them into embeddable payloads.
///
/// One HTTP client is built up front and reused for every preview and
/// submission. Each call performs exactly one GET; failures are returned
/// to the caller as-is and never retried.
#[derive(Clone)]
pub struct ImageFetcher {
    http_client: Client,
    max_image_bytes: usize,
}

impl ImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| VisionChatError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created image HTTP client (user agent: {})", config.user_agent);

        Ok(Self {
            http_client,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Fetch `url` and build its payload.
    pub async fn fetch(&self, url: &str) -> Result<ImagePayload> {
        let parsed = parse_image_url(url)?;
        debug!("Fetching image from {}", parsed);

        let mut response = self
            .http_client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| VisionChatError::ImageFetch(format!("request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Image request to {} returned HTTP {}", parsed, status);
            return Err(VisionChatError::ImageFetch(format!("HTTP {}", status)));
        }

        if let Some(declared) = response.content_length() {
            validate_image_size(declared as usize, self.max_image_bytes)?;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // Content-Length may be absent (chunked), so the limit is enforced while reading
        let mut buffer = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| VisionChatError::ImageFetch(format!("failed to read body: {}", e)))?
        {
            validate_image_size(buffer.len() + chunk.len(), self.max_image_bytes)?;
            buffer.extend_from_slice(&chunk);
        }
        let body = buffer.freeze();

        let mime_type = resolve_mime_type(content_type.as_deref(), &parsed);
        debug!(
            "Fetched {} bytes (content-type: {:?}, resolved: {})",
            body.len(),
            content_type,
            mime_type
        );

        Ok(ImagePayload::new(body, mime_type))
    }
}

/// Parse a user-supplied image URL, accepting only http and https.
pub fn parse_image_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).map_err(|e| VisionChatError::InvalidImageUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(VisionChatError::InvalidImageUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Decide the MIME label for a fetched image.
///
/// Priority: a declared `image/*` content type (verbatim), then the URL
/// path's extension, then `image/jpeg` even if the bytes are something else.
pub fn resolve_mime_type(content_type: Option<&str>, url: &Url) -> String {
    if let Some(declared) = content_type {
        if declared.starts_with("image/") {
            return declared.to_string();
        }
    }

    extension_of(url.path())
        .and_then(ImageFormat::from_extension)
        .unwrap_or_default()
        .mime_type()
        .to_string()
}

/// Extension of the last path segment, if any
fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next()?;
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_declared_image_type_wins() {
        let u = url("https://example.com/photo.png");
        assert_eq!(resolve_mime_type(Some("image/webp"), &u), "image/webp");
    }

    #[test]
    fn test_non_image_content_type_falls_back_to_extension() {
        let u = url("https://example.com/photo.png");
        assert_eq!(resolve_mime_type(Some("application/octet-stream"), &u), "image/png");
        assert_eq!(resolve_mime_type(Some("text/html"), &u), "image/png");
    }

    #[test]
    fn test_extension_mapping() {
        let cases = [
            ("https://e.com/a.jpg", "image/jpeg"),
            ("https://e.com/a.JPEG", "image/jpeg"),
            ("https://e.com/dir/a.Png", "image/png"),
            ("https://e.com/a.gif", "image/gif"),
            ("https://e.com/a.WEBP", "image/webp"),
        ];
        for (u, expected) in cases {
            assert_eq!(resolve_mime_type(None, &url(u)), expected, "{}", u);
        }
    }

    #[test]
    fn test_query_string_is_ignored() {
        let u = url("https://images.example.com/photo-123.png?w=400");
        assert_eq!(resolve_mime_type(None, &u), "image/png");
    }

    #[test]
    fn test_unknown_extension_defaults_to_jpeg() {
        assert_eq!(resolve_mime_type(None, &url("https://e.com/a.bmp")), "image/jpeg");
        assert_eq!(resolve_mime_type(None, &url("https://e.com/photo")), "image/jpeg");
        assert_eq!(resolve_mime_type(None, &url("https://e.com/")), "image/jpeg");
        // Dot in a directory name is not an extension
        assert_eq!(resolve_mime_type(None, &url("https://e.com/v1.png/raw")), "image/jpeg");
    }

    #[test]
    fn test_parse_image_url_rejects_bad_input() {
        assert!(parse_image_url("not a url").is_err());
        assert!(matches!(
            parse_image_url("ftp://example.com/a.png"),
            Err(VisionChatError::InvalidImageUrl { .. })
        ));
        assert!(parse_image_url("  https://example.com/a.png ").is_ok());
    }
}

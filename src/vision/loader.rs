// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loader: turns a request's image field into owned bytes
//!
//! A field may carry raw bytes (a JSON array of 0..=255), an http(s) URL,
//! or a base64 string (optionally wrapped in a `data:` URL).

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::image_utils::{decode_base64, ImageError};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to fetch image from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("invalid base64 image data: {0}")]
    Decode(String),

    #[error("unsupported image input: {0}")]
    Unsupported(String),
}

/// Where an image's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDescriptor {
    RawBytes(Vec<u8>),
    Url(String),
    Base64(String),
}

impl ImageDescriptor {
    /// Classify a JSON value
    pub fn from_json(value: &Value) -> Result<Self, LoaderError> {
        match value {
            Value::String(s) => Ok(Self::from_text(s)),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| {
                            LoaderError::Unsupported(format!(
                                "byte arrays must hold integers in 0..=255, found {item}"
                            ))
                        })
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Self::RawBytes),
            other => Err(LoaderError::Unsupported(format!(
                "expected a string or byte array, found {}",
                json_type_name(other)
            ))),
        }
    }

    /// Classify a string: URL when it carries an http(s) scheme, base64 otherwise
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if has_http_scheme(trimmed) {
            return Self::Url(trimmed.to_string());
        }
        let payload = strip_data_url(trimmed).unwrap_or(trimmed);
        Self::Base64(payload.to_string())
    }
}

impl std::fmt::Display for ImageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RawBytes(bytes) => write!(f, "<{} raw bytes>", bytes.len()),
            Self::Url(url) => write!(f, "{url}"),
            Self::Base64(data) => write!(f, "<{} base64 chars>", data.len()),
        }
    }
}

fn has_http_scheme(text: &str) -> bool {
    let lower = text.get(..8).unwrap_or(text).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `data:image/png;base64,XXXX` -> `XXXX`
fn strip_data_url(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    header.ends_with(";base64").then_some(payload)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Settings for remote fetches
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Skip TLS certificate validation for URL descriptors
    pub accept_invalid_certs: bool,
    /// Whole-request timeout for a fetch
    pub fetch_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolves descriptors into bytes; cheap to clone, shares one HTTP client
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: Client,
}

impl ImageLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate validation is disabled for image fetches");
        }
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| LoaderError::Unsupported(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Resolve a JSON image field
    pub async fn resolve_json(&self, value: &Value) -> Result<Vec<u8>, LoaderError> {
        let descriptor = ImageDescriptor::from_json(value)?;
        self.resolve(descriptor).await
    }

    /// Resolve a descriptor into an owned byte buffer
    pub async fn resolve(&self, descriptor: ImageDescriptor) -> Result<Vec<u8>, LoaderError> {
        debug!("resolving image {}", descriptor);
        match descriptor {
            ImageDescriptor::RawBytes(bytes) => Ok(bytes),
            ImageDescriptor::Url(url) => self.fetch(&url).await,
            ImageDescriptor::Base64(data) => decode_base64(&data).map_err(|e| match e {
                ImageError::InvalidBase64(err) => LoaderError::Decode(err.to_string()),
                other => LoaderError::Decode(other.to_string()),
            }),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        let fetch_error = |reason: String| LoaderError::Fetch {
            url: url.to_string(),
            reason,
        };

        let parsed = url::Url::parse(url).map_err(|e| fetch_error(e.to_string()))?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("server answered {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        debug!("fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

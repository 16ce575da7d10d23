// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition facade
//!
//! One method per capability, each a function of image bytes. Implementations
//! are shared across requests and must tolerate concurrent calls.

use thiserror::Error;

use super::bbox::BoundingBox;
use super::image_utils::ImageError;

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("{0} model is not loaded")]
    ModelUnavailable(&'static str),

    #[error("image could not be read: {0}")]
    Image(#[from] ImageError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("inference engine lock poisoned")]
    EnginePoisoned,
}

impl RecognitionError {
    pub fn inference(err: impl std::fmt::Display) -> Self {
        Self::Inference(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Recognizer: Send + Sync {
    /// Recognized text of the whole image
    fn classify(&self, image: &[u8]) -> Result<String, RecognitionError>;

    /// Candidate regions, in the engine's output order
    fn detect(&self, image: &[u8]) -> Result<Vec<BoundingBox>, RecognitionError>;

    /// Horizontal offset where the sliding piece fits into the background
    ///
    /// `simple_target` matches the piece as-is instead of first trimming its
    /// transparent margin.
    fn slide_match(
        &self,
        sliding: &[u8],
        background: &[u8],
        simple_target: bool,
    ) -> Result<u32, RecognitionError>;

    /// Horizontal offset of the gap, found by diffing the two images
    fn slide_compare(&self, sliding: &[u8], background: &[u8]) -> Result<u32, RecognitionError>;
}

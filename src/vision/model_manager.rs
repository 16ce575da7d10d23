// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager: loads the captcha models and implements the
//! recognition facade on top of them

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::bbox::BoundingBox;
use super::image_utils::decode_image;
use super::ocr::{DetectionModel, OcrClassifier};
use super::recognizer::{RecognitionError, Recognizer};
use super::slide;

/// Configuration for loading vision models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Classification model (ONNX)
    pub ocr_model_path: Option<PathBuf>,
    /// Charset matching the classification model
    pub ocr_charset_path: Option<PathBuf>,
    /// Detection model (ONNX)
    pub det_model_path: Option<PathBuf>,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            ocr_model_path: Some(PathBuf::from("./models/common.onnx")),
            ocr_charset_path: Some(PathBuf::from("./models/charsets.json")),
            det_model_path: Some(PathBuf::from("./models/common_det.onnx")),
            intra_threads: 4,
        }
    }
}

/// Information about a loaded vision model
#[derive(Debug, Clone, Serialize)]
pub struct VisionModelInfo {
    /// Model name
    pub name: String,
    /// Model type (ocr, detection)
    pub model_type: String,
    /// Whether the model is available
    pub available: bool,
}

/// Owner of the captcha models
///
/// Slide matching needs no model and is always available.
#[derive(Debug, Default)]
pub struct VisionModelManager {
    classifier: Option<Arc<OcrClassifier>>,
    detector: Option<Arc<DetectionModel>>,
}

impl VisionModelManager {
    /// Load every configured model
    ///
    /// Missing or broken model files are logged and leave that capability
    /// unavailable rather than failing startup.
    pub async fn new(config: VisionModelConfig) -> anyhow::Result<Self> {
        let classifier = match (&config.ocr_model_path, &config.ocr_charset_path) {
            (Some(model), Some(charset)) => {
                match OcrClassifier::new(model, charset, config.intra_threads).await {
                    Ok(classifier) => {
                        tracing::info!("✅ OCR classifier loaded from {}", model.display());
                        Some(Arc::new(classifier))
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Failed to load OCR classifier: {:#}", e);
                        None
                    }
                }
            }
            _ => None,
        };

        let detector = if let Some(ref model) = config.det_model_path {
            match DetectionModel::new(model, config.intra_threads).await {
                Ok(detector) => {
                    tracing::info!("✅ Detection model loaded from {}", model.display());
                    Some(Arc::new(detector))
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to load detection model: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            classifier,
            detector,
        })
    }

    /// Check if classification is available
    pub fn has_ocr(&self) -> bool {
        self.classifier.is_some()
    }

    /// Check if detection is available
    pub fn has_detection(&self) -> bool {
        self.detector.is_some()
    }

    /// List all vision models
    pub fn list_models(&self) -> Vec<VisionModelInfo> {
        vec![
            VisionModelInfo {
                name: "ocr-classifier".to_string(),
                model_type: "ocr".to_string(),
                available: self.has_ocr(),
            },
            VisionModelInfo {
                name: "detector".to_string(),
                model_type: "detection".to_string(),
                available: self.has_detection(),
            },
        ]
    }

    fn classifier(&self) -> Result<&OcrClassifier, RecognitionError> {
        self.classifier
            .as_deref()
            .ok_or(RecognitionError::ModelUnavailable("classification"))
    }

    fn detector(&self) -> Result<&DetectionModel, RecognitionError> {
        self.detector
            .as_deref()
            .ok_or(RecognitionError::ModelUnavailable("detection"))
    }
}

impl Recognizer for VisionModelManager {
    fn classify(&self, image: &[u8]) -> Result<String, RecognitionError> {
        let classifier = self.classifier()?;
        let image = decode_image(image)?;
        classifier.classify(&image)
    }

    fn detect(&self, image: &[u8]) -> Result<Vec<BoundingBox>, RecognitionError> {
        let detector = self.detector()?;
        let image = decode_image(image)?;
        detector.detect(&image)
    }

    fn slide_match(
        &self,
        sliding: &[u8],
        background: &[u8],
        simple_target: bool,
    ) -> Result<u32, RecognitionError> {
        let piece = decode_image(sliding)?;
        let background = decode_image(background)?;
        slide::slide_match(&piece, &background, simple_target)
    }

    fn slide_compare(&self, sliding: &[u8], background: &[u8]) -> Result<u32, RecognitionError> {
        let with_gap = decode_image(sliding)?;
        let background = decode_image(background)?;
        slide::slide_compare(&with_gap, &background)
    }
}

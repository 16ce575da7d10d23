// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Captcha text classification model
//!
//! A CTC-style ONNX model: one image in, a sequence of symbol indices out.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayViewD, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::charset::Charset;
use super::preprocessing::preprocess_for_classification;
use crate::vision::recognizer::RecognitionError;

/// Captcha text classifier
///
/// The session sits behind a mutex; only `run` happens under the lock.
#[derive(Clone)]
pub struct OcrClassifier {
    session: Arc<Mutex<Session>>,
    charset: Arc<Charset>,
    input_name: String,
}

impl std::fmt::Debug for OcrClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrClassifier")
            .field("charset_size", &self.charset.len())
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl OcrClassifier {
    /// Load the classifier from an ONNX file and its charset
    ///
    /// # Errors
    /// Returns error if either file is missing or ONNX Runtime rejects the model.
    pub async fn new<P: AsRef<Path>>(model_path: P, charset_path: P, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();
        let charset_path = charset_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("OCR model not found: {}", model_path.display());
        }
        if !charset_path.exists() {
            anyhow::bail!("OCR charset not found: {}", charset_path.display());
        }

        info!("Loading OCR classifier from {}", model_path.display());

        let charset = Charset::load(charset_path)?;
        info!("Loaded charset with {} symbols", charset.len());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load OCR classifier from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input1".to_string());

        debug!("Classifier loaded - input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            charset: Arc::new(charset),
            input_name,
        })
    }

    /// Recognize the text in a decoded captcha image
    pub fn classify(&self, image: &DynamicImage) -> Result<String, RecognitionError> {
        let tensor = preprocess_for_classification(image, &self.charset.input);
        debug!("Classifier input shape: {:?}", tensor.shape());

        let input_value = Value::from_array(tensor).map_err(RecognitionError::inference)?;

        let indices = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| RecognitionError::EnginePoisoned)?;
            let outputs = session
                .run(ort::inputs![&self.input_name => input_value])
                .map_err(RecognitionError::inference)?;

            // Exported models either emit indices directly or per-step scores
            let indices: Vec<usize> = match outputs[0].try_extract_array::<i64>() {
                Ok(indices) => indices.iter().map(|&i| i.max(0) as usize).collect(),
                Err(_) => {
                    let scores = outputs[0]
                        .try_extract_array::<f32>()
                        .map_err(RecognitionError::inference)?;
                    argmax_last_axis(scores)
                }
            };
            indices
        };

        Ok(self.charset.decode(&indices))
    }
}

/// Index of the best score along the last axis, for every leading position
pub(crate) fn argmax_last_axis(scores: ArrayViewD<f32>) -> Vec<usize> {
    let Some(last) = scores.ndim().checked_sub(1) else {
        return Vec::new();
    };
    scores
        .lanes(Axis(last))
        .into_iter()
        .map(|lane| {
            lane.iter()
                .enumerate()
                .fold((0usize, f32::NEG_INFINITY), |best, (i, &v)| {
                    if v > best.1 {
                        (i, v)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Captcha element detection model
//!
//! An anchor-free YOLOX-style ONNX model. Each output row is
//! `[cx, cy, w, h, objectness, class scores...]` relative to a grid cell.

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use ndarray::{ArrayViewD, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::{preprocess_for_detection, DETECTION_INPUT_SIZE};
use crate::vision::bbox::BoundingBox;
use crate::vision::recognizer::RecognitionError;

/// Feature map strides of the detection head
const STRIDES: [u32; 3] = [8, 16, 32];

/// Minimum objectness x class score kept
pub const SCORE_THRESHOLD: f32 = 0.1;

/// IoU above which the weaker of two boxes is suppressed
pub const NMS_THRESHOLD: f32 = 0.45;

/// A decoded candidate in original-image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1 + 1.0) * (self.y2 - self.y1 + 1.0)
    }

    fn iou(&self, other: &Candidate) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1) + 1.0).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1) + 1.0).max(0.0);
        let inter = w * h;
        inter / (self.area() + other.area() - inter)
    }
}

/// Captcha element detector
#[derive(Clone)]
pub struct DetectionModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
}

impl std::fmt::Debug for DetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionModel")
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl DetectionModel {
    /// Load the detection model from an ONNX file
    pub async fn new<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

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
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("Detection model loaded - input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
        })
    }

    /// Detect captcha elements; boxes come back highest score first
    pub fn detect(&self, image: &DynamicImage) -> Result<Vec<BoundingBox>, RecognitionError> {
        let (width, height) = image.dimensions();
        let (tensor, ratio) = preprocess_for_detection(image);

        let input_value = Value::from_array(tensor).map_err(RecognitionError::inference)?;

        let candidates = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| RecognitionError::EnginePoisoned)?;
            let outputs = session
                .run(ort::inputs![&self.input_name => input_value])
                .map_err(RecognitionError::inference)?;
            let predictions = outputs[0]
                .try_extract_array::<f32>()
                .map_err(RecognitionError::inference)?;
            let candidates = decode_predictions(predictions, ratio)?;
            candidates
        };

        let kept = non_max_suppression(candidates, NMS_THRESHOLD);
        debug!("Detected {} regions", kept.len());

        Ok(kept
            .iter()
            .filter_map(|c| clip_to_image(c, width, height))
            .collect())
    }
}

/// Grid cell origin and stride for every prediction row
fn grid_cells(input_size: u32) -> Vec<(f32, f32, f32)> {
    let mut cells = Vec::new();
    for stride in STRIDES {
        let cells_per_side = input_size / stride;
        for gy in 0..cells_per_side {
            for gx in 0..cells_per_side {
                cells.push((gx as f32, gy as f32, stride as f32));
            }
        }
    }
    cells
}

/// Turn raw head output into scored boxes in original-image coordinates
pub(crate) fn decode_predictions(
    predictions: ArrayViewD<f32>,
    ratio: f32,
) -> Result<Vec<Candidate>, RecognitionError> {
    let shape = predictions.shape().to_vec();
    let rows = match shape.as_slice() {
        [1, n, k] if *k >= 6 => predictions
            .index_axis_move(Axis(0), 0)
            .into_shape_with_order((*n, *k))
            .map_err(RecognitionError::inference)?,
        [n, k] if *k >= 6 => predictions
            .into_shape_with_order((*n, *k))
            .map_err(RecognitionError::inference)?,
        _ => {
            return Err(RecognitionError::inference(format!(
                "unexpected detection output shape {shape:?}"
            )))
        }
    };

    let cells = grid_cells(DETECTION_INPUT_SIZE);
    if rows.nrows() != cells.len() {
        return Err(RecognitionError::inference(format!(
            "expected {} detection rows, got {}",
            cells.len(),
            rows.nrows()
        )));
    }

    let mut candidates = Vec::new();
    for (row, &(gx, gy, stride)) in rows.outer_iter().zip(cells.iter()) {
        let objectness = row[4];
        let class_score = row
            .iter()
            .skip(5)
            .fold(f32::NEG_INFINITY, |best, &v| best.max(v));
        let score = objectness * class_score;
        if score <= SCORE_THRESHOLD {
            continue;
        }

        let cx = (row[0] + gx) * stride;
        let cy = (row[1] + gy) * stride;
        let w = row[2].exp() * stride;
        let h = row[3].exp() * stride;

        candidates.push(Candidate {
            x1: (cx - w / 2.0) / ratio,
            y1: (cy - h / 2.0) / ratio,
            x2: (cx + w / 2.0) / ratio,
            y2: (cy + h / 2.0) / ratio,
            score,
        });
    }

    Ok(candidates)
}

/// Greedy NMS; survivors are ordered by descending score
pub(crate) fn non_max_suppression(mut candidates: Vec<Candidate>, threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| k.iou(&candidate) <= threshold) {
            kept.push(candidate);
        }
    }
    kept
}

/// Truncate to integer pixels inside the image; `None` when nothing is left
fn clip_to_image(candidate: &Candidate, width: u32, height: u32) -> Option<BoundingBox> {
    let x1 = candidate.x1.max(0.0) as u32;
    let y1 = candidate.y1.max(0.0) as u32;
    let x2 = (candidate.x2.max(0.0) as u32).min(width);
    let y2 = (candidate.y2.max(0.0) as u32).min(height);
    BoundingBox::new(x1, y1, x2, y2).ok()
}

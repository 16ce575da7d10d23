// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX captcha models
//!
//! Components:
//! - `classifier` - Text recognition of a whole captcha image
//! - `detector` - Bounding boxes of characters/icons
//! - `charset` - Symbol table and input layout for the classifier
//! - `preprocessing` - Image to tensor conversion

pub mod charset;
pub mod classifier;
pub mod detector;
pub mod preprocessing;

pub use charset::Charset;
pub use classifier::OcrClassifier;
pub use detector::DetectionModel;

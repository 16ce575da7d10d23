// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for captcha images
//!
//! This module provides:
//! - Image loading from raw bytes, URLs or base64
//! - Image transforms (crop, encode, base64)
//! - The recognition facade and its model-backed implementation
//!
//! All models run on CPU.

pub mod bbox;
pub mod image_utils;
pub mod loader;
pub mod model_manager;
pub mod ocr;
pub mod recognizer;
pub mod slide;

pub use bbox::BoundingBox;
pub use image_utils::{decode_base64, decode_image, encode_base64, ImageError};
pub use loader::{ImageDescriptor, ImageLoader, LoaderConfig, LoaderError};
pub use model_manager::{VisionModelConfig, VisionModelInfo, VisionModelManager};
pub use recognizer::{RecognitionError, Recognizer};

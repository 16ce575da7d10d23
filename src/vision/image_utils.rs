// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding, encoding and cropping helpers
//!
//! Everything here is a plain byte/pixel transformation: no model is involved.

use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

use super::bbox::BoundingBox;

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Standard alphabet, padding optional on decode
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Region {region:?} lies outside a {width}x{height} image")]
    OutOfBounds {
        region: [u32; 4],
        width: u32,
        height: u32,
    },
}

/// Decode a base64 string into raw bytes
///
/// ASCII whitespace (line wrapping) is ignored and trailing padding is optional.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, ImageError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT.decode(compact)?)
}

/// Encode raw bytes as padded standard base64
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode raw image bytes
///
/// The format comes from the magic bytes, not from any declared content type.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode an image as PNG, then as base64
pub fn png_base64(image: &DynamicImage) -> Result<String, ImageError> {
    encode_png(image).map(|png| encode_base64(&png))
}

/// Copy out the full-width horizontal band covering rows `[top, bottom)`
pub fn crop_rows(image: &DynamicImage, top: u32, bottom: u32) -> Result<DynamicImage, ImageError> {
    let (width, height) = image.dimensions();
    if top >= bottom || bottom > height {
        return Err(ImageError::OutOfBounds {
            region: [0, top, width, bottom],
            width,
            height,
        });
    }
    Ok(image.crop_imm(0, top, width, bottom - top))
}

/// Copy out the sub-image covered by a bounding box
///
/// The box is clipped to the image; a box with no overlap is rejected.
pub fn crop_region(image: &DynamicImage, bbox: &BoundingBox) -> Result<DynamicImage, ImageError> {
    let (width, height) = image.dimensions();
    let x2 = bbox.x2.min(width);
    let y2 = bbox.y2.min(height);
    if bbox.x1 >= x2 || bbox.y1 >= y2 {
        return Err(ImageError::OutOfBounds {
            region: bbox.to_array(),
            width,
            height,
        });
    }
    Ok(image.crop_imm(bbox.x1, bbox.y1, x2 - bbox.x1, y2 - bbox.y1))
}

/// Detect image format from magic bytes
///
/// # Returns
/// * `Ok(ImageFormat)` - Detected format
/// * `Err(ImageError::UnsupportedFormat)` - If format cannot be detected
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

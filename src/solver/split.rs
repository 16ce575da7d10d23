// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Splitting a stacked slider image into its piece and background bands
//!
//! Some slider captchas ship the piece and the background stacked vertically
//! in one image. Given a row `y`, the image is cut into `[0, y)`, `[y, 2y)` and
//! `[2y, height)`; the first and last bands are returned.

use image::GenericImageView;
use serde::Serialize;
use tracing::debug;

use super::SolveError;
use crate::vision::image_utils::{crop_rows, decode_image, png_base64};

/// Top and bottom bands, base64 PNG
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitBands {
    pub sliding_image: String,
    pub back_image: String,
}

pub fn split_bands(image: &[u8], y: u32) -> Result<SplitBands, SolveError> {
    let decoded = decode_image(image)?;
    let height = decoded.height();

    let second = u64::from(y) * 2;
    if y == 0 || second >= u64::from(height) {
        return Err(SolveError::Bounds { y, height });
    }
    let second = second as u32;

    let top = crop_rows(&decoded, 0, y)?;
    let bottom = crop_rows(&decoded, second, height)?;
    debug!(
        "split {}x{} at y={}: top {:?}, bottom {:?}",
        decoded.width(),
        height,
        y,
        top.dimensions(),
        bottom.dimensions()
    );

    Ok(SplitBands {
        sliding_image: png_base64(&top)?,
        back_image: png_base64(&bottom)?,
    })
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Slider captcha solving
//!
//! - `slide_match` locates a puzzle piece inside the background by matching
//!   edge maps
//! - `slide_compare` locates the gap by diffing the background with and
//!   without the gap

pub mod edges;
pub mod matching;

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::recognizer::RecognitionError;

/// Canny hysteresis thresholds
const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Per-channel difference that marks a pixel as changed
const DIFF_THRESHOLD: u8 = 80;

/// Changed pixels a column needs before it counts as the gap's left edge
const MIN_CHANGED_PER_COLUMN: u32 = 5;

/// Columns added to the first changed column
const GAP_EDGE_OFFSET: u32 = 2;

/// Bounding box of the visible (non-transparent) pixels of a piece
///
/// Images without an alpha channel, or fully transparent ones, are returned whole.
pub fn trim_transparent(piece: &DynamicImage) -> DynamicImage {
    if !piece.color().has_alpha() {
        return piece.clone();
    }

    let rgba = piece.to_rgba8();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
        });
    }

    match bounds {
        Some((x1, y1, x2, y2)) => piece.crop_imm(x1, y1, x2 - x1 + 1, y2 - y1 + 1),
        None => piece.clone(),
    }
}

/// Horizontal offset at which `piece` best fits into `background`
pub fn slide_match(
    piece: &DynamicImage,
    background: &DynamicImage,
    simple_target: bool,
) -> Result<u32, RecognitionError> {
    let piece = if simple_target {
        piece.clone()
    } else {
        trim_transparent(piece)
    };

    let (pw, ph) = piece.dimensions();
    let (bw, bh) = background.dimensions();
    if pw > bw || ph > bh {
        return Err(RecognitionError::InvalidInput(format!(
            "sliding piece {pw}x{ph} is larger than background {bw}x{bh}"
        )));
    }

    let piece_edges = edges::canny(&piece.to_luma8(), CANNY_LOW, CANNY_HIGH);
    let background_edges = edges::canny(&background.to_luma8(), CANNY_LOW, CANNY_HIGH);

    let found = matching::match_template(&background_edges, &piece_edges).ok_or_else(|| {
        RecognitionError::InvalidInput("sliding piece does not fit the background".to_string())
    })?;
    debug!(
        "slide match at ({}, {}) score {:.3}",
        found.x, found.y, found.score
    );

    Ok(found.x)
}

/// Left edge of the gap, from a background with the gap and one without
///
/// The first column holding at least five changed pixels marks the gap; the
/// offset is that column plus two. Returns 0 when nothing changed.
pub fn slide_compare(
    with_gap: &DynamicImage,
    background: &DynamicImage,
) -> Result<u32, RecognitionError> {
    if with_gap.dimensions() != background.dimensions() {
        let (aw, ah) = with_gap.dimensions();
        let (bw, bh) = background.dimensions();
        return Err(RecognitionError::InvalidInput(format!(
            "images differ in size: {aw}x{ah} vs {bw}x{bh}"
        )));
    }

    let a = with_gap.to_rgb8();
    let b = background.to_rgb8();
    let (width, height) = a.dimensions();

    for x in 0..width {
        let changed = (0..height)
            .filter(|&y| {
                let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
                (0..3).any(|c| pa[c].abs_diff(pb[c]) > DIFF_THRESHOLD)
            })
            .count() as u32;
        if changed >= MIN_CHANGED_PER_COLUMN {
            debug!("slide comparison found gap at column {}", x);
            return Ok(x + GAP_EDGE_OFFSET);
        }
    }

    Ok(0)
}

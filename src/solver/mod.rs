// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Composite captcha operations built on the recognition facade

pub mod arithmetic;
pub mod select;
pub mod split;

use thiserror::Error;
use tracing::debug;

use crate::vision::image_utils::ImageError;
use crate::vision::recognizer::{RecognitionError, Recognizer};

pub use arithmetic::{ExpressionError, Number};
pub use select::{select_points, SelectedRegion};
pub use split::{split_bands, SplitBands};

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("row {y} is outside the splittable range of an image {height} rows high")]
    Bounds { y: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Read an arithmetic captcha and compute its answer
pub fn solve_arithmetic(recognizer: &dyn Recognizer, image: &[u8]) -> Result<Number, SolveError> {
    let text = recognizer.classify(image)?;
    debug!("arithmetic captcha read as {:?}", text);
    Ok(arithmetic::solve_text(&text)?)
}

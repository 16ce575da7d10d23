// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the captcha models

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input side of the detection model
pub const DETECTION_INPUT_SIZE: u32 = 416;

/// Padding value used by the detection letterbox
pub const DETECTION_PAD_VALUE: u8 = 114;

/// How the classifier wants its input tensor laid out
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInput {
    /// Fixed input width; `None` keeps the aspect ratio
    pub width: Option<u32>,
    /// Input height
    pub height: u32,
    /// 1 for grayscale, 3 for RGB
    pub channels: usize,
    /// Per-channel mean, applied after scaling to [0, 1]
    pub mean: [f32; 3],
    /// Per-channel std
    pub std: [f32; 3],
}

impl Default for ClassifierInput {
    fn default() -> Self {
        Self {
            width: None,
            height: 64,
            channels: 1,
            mean: [0.5; 3],
            std: [0.5; 3],
        }
    }
}

impl ClassifierInput {
    /// Target size for an image of the given dimensions
    pub fn target_size(&self, orig_w: u32, orig_h: u32) -> (u32, u32) {
        let width = match self.width {
            Some(width) => width,
            None if orig_h == 0 => self.height,
            None => ((orig_w as f32 * self.height as f32 / orig_h as f32) as u32).max(1),
        };
        (width, self.height)
    }
}

/// Preprocess a captcha image for classification
///
/// Steps:
/// 1. Resize to the model height (width fixed or proportional)
/// 2. Convert to grayscale or RGB
/// 3. Normalize: (pixel / 255 - mean) / std
/// 4. Convert to NCHW tensor format [1, C, H, W]
pub fn preprocess_for_classification(image: &DynamicImage, input: &ClassifierInput) -> Array4<f32> {
    let (orig_w, orig_h) = image.dimensions();
    let (width, height) = input.target_size(orig_w, orig_h);
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);

    let mut tensor = Array4::zeros((1, input.channels, height as usize, width as usize));

    if input.channels == 1 {
        let gray = resized.to_luma8();
        for (x, y, pixel) in gray.enumerate_pixels() {
            tensor[[0, 0, y as usize, x as usize]] =
                (pixel[0] as f32 / 255.0 - input.mean[0]) / input.std[0];
        }
    } else {
        let rgb = resized.to_rgb8();
        for (x, y, pixel) in rgb.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] =
                    (pixel[c] as f32 / 255.0 - input.mean[c]) / input.std[c];
            }
        }
    }

    tensor
}

/// Preprocess an image for detection
///
/// The image is scaled to fit `DETECTION_INPUT_SIZE` square, pasted at the
/// top-left corner of a gray canvas, and laid out as BGR NCHW with raw 0..255
/// values. Returns the tensor and the scale ratio applied.
pub fn preprocess_for_detection(image: &DynamicImage) -> (Array4<f32>, f32) {
    let size = DETECTION_INPUT_SIZE;
    let (orig_w, orig_h) = image.dimensions();
    let ratio = (size as f32 / orig_h.max(1) as f32).min(size as f32 / orig_w.max(1) as f32);

    let new_w = ((orig_w as f32 * ratio) as u32).clamp(1, size);
    let new_h = ((orig_h as f32 * ratio) as u32).clamp(1, size);
    let resized = image
        .resize_exact(new_w, new_h, FilterType::Triangle)
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(
        size,
        size,
        Rgb([DETECTION_PAD_VALUE, DETECTION_PAD_VALUE, DETECTION_PAD_VALUE]),
    );
    image::imageops::replace(&mut canvas, &resized, 0, 0);

    let mut tensor = Array4::zeros((1, 3, size as usize, size as usize));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        // BGR channel order
        tensor[[0, 0, y as usize, x as usize]] = pixel[2] as f32;
        tensor[[0, 1, y as usize, x as usize]] = pixel[1] as f32;
        tensor[[0, 2, y as usize, x as usize]] = pixel[0] as f32;
    }

    (tensor, ratio)
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Zero-mean normalized cross-correlation template matching

use image::GrayImage;

/// Best placement of a template inside an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Summed-area table of values and squared values, one extra row/column of zeros
struct IntegralImage {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl IntegralImage {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0.0; stride * (h + 1)];
        let mut sum_sq = vec![0.0; stride * (h + 1)];
        for y in 0..h {
            let mut row = 0.0;
            let mut row_sq = 0.0;
            for x in 0..w {
                let v = image.get_pixel(x as u32, y as u32)[0] as f64;
                row += v;
                row_sq += v * v;
                sum[(y + 1) * stride + x + 1] = sum[y * stride + x + 1] + row;
                sum_sq[(y + 1) * stride + x + 1] = sum_sq[y * stride + x + 1] + row_sq;
            }
        }
        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    fn window(&self, table: &[f64], x: usize, y: usize, w: usize, h: usize) -> f64 {
        let s = self.stride;
        table[(y + h) * s + x + w] - table[y * s + x + w] - table[(y + h) * s + x] + table[y * s + x]
    }
}

/// Slide `template` over `image` and return the best zero-mean NCC score
///
/// Returns `None` when the template does not fit. Flat windows (or a flat
/// template) score 0.
pub fn match_template(image: &GrayImage, template: &GrayImage) -> Option<TemplateMatch> {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let (tw, th) = (template.width() as usize, template.height() as usize);
    if tw == 0 || th == 0 || tw > iw || th > ih {
        return None;
    }

    let n = (tw * th) as f64;
    let tpl: Vec<f64> = template.pixels().map(|p| p[0] as f64).collect();
    let tpl_mean = tpl.iter().sum::<f64>() / n;
    let tpl_centered: Vec<f64> = tpl.iter().map(|v| v - tpl_mean).collect();
    let tpl_energy: f64 = tpl_centered.iter().map(|v| v * v).sum();

    let pixels: Vec<f64> = image.pixels().map(|p| p[0] as f64).collect();
    let integral = IntegralImage::new(image);

    let mut best = TemplateMatch {
        x: 0,
        y: 0,
        score: f32::NEG_INFINITY,
    };

    for y in 0..=ih - th {
        for x in 0..=iw - tw {
            let window_sum = integral.window(&integral.sum, x, y, tw, th);
            let window_sq = integral.window(&integral.sum_sq, x, y, tw, th);
            let window_energy = window_sq - window_sum * window_sum / n;

            let denominator = (tpl_energy * window_energy).sqrt();
            let score = if denominator <= f64::EPSILON {
                0.0
            } else {
                // the template is zero-mean, so the window mean drops out
                let mut cross = 0.0;
                for ty in 0..th {
                    let image_row = &pixels[(y + ty) * iw + x..(y + ty) * iw + x + tw];
                    let tpl_row = &tpl_centered[ty * tw..(ty + 1) * tw];
                    cross += image_row
                        .iter()
                        .zip(tpl_row)
                        .map(|(a, b)| a * b)
                        .sum::<f64>();
                }
                cross / denominator
            };

            if score as f32 > best.score {
                best = TemplateMatch {
                    x: x as u32,
                    y: y as u32,
                    score: score as f32,
                };
            }
        }
    }

    Some(best)
}

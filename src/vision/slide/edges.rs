// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canny edge detection on grayscale images

use image::{GrayImage, Luma};

/// Sobel gradients with an L1 magnitude
struct Gradients {
    width: usize,
    height: usize,
    magnitude: Vec<f32>,
    gx: Vec<f32>,
    gy: Vec<f32>,
}

fn sobel(image: &GrayImage) -> Gradients {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let px = |x: isize, y: isize| -> f32 {
        // replicate border
        let x = x.clamp(0, width as isize - 1) as u32;
        let y = y.clamp(0, height as isize - 1) as u32;
        image.get_pixel(x, y)[0] as f32
    };

    let mut gx = vec![0.0; width * height];
    let mut gy = vec![0.0; width * height];
    let mut magnitude = vec![0.0; width * height];

    for y in 0..height as isize {
        for x in 0..width as isize {
            let dx = (px(x + 1, y - 1) + 2.0 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x - 1, y) + px(x - 1, y + 1));
            let dy = (px(x - 1, y + 1) + 2.0 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x, y - 1) + px(x + 1, y - 1));
            let i = y as usize * width + x as usize;
            gx[i] = dx;
            gy[i] = dy;
            magnitude[i] = dx.abs() + dy.abs();
        }
    }

    Gradients {
        width,
        height,
        magnitude,
        gx,
        gy,
    }
}

/// Canny edge map: 255 on edges, 0 elsewhere
///
/// No pre-blur is applied; `low`/`high` are hysteresis thresholds on the
/// L1 Sobel magnitude.
pub fn canny(image: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (w, h) = (image.width(), image.height());
    if w < 3 || h < 3 {
        return GrayImage::new(w, h);
    }

    let g = sobel(image);
    let (width, height) = (g.width, g.height);

    // Non-maximum suppression along the quantized gradient direction
    let mut thin = vec![0.0f32; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let m = g.magnitude[i];
            if m <= low {
                continue;
            }
            let angle = g.gy[i].atan2(g.gx[i]).to_degrees().rem_euclid(180.0);
            let (a, b) = if !(22.5..157.5).contains(&angle) {
                (i - 1, i + 1)
            } else if angle < 67.5 {
                (i - width - 1, i + width + 1)
            } else if angle < 112.5 {
                (i - width, i + width)
            } else {
                (i - width + 1, i + width - 1)
            };
            if m > g.magnitude[a] && m >= g.magnitude[b] {
                thin[i] = m;
            }
        }
    }

    // Hysteresis: grow strong edges through weak ones
    let mut edges = GrayImage::new(w, h);
    let mut stack: Vec<usize> = (0..width * height).filter(|&i| thin[i] > high).collect();
    for &i in &stack {
        edges.put_pixel((i % width) as u32, (i / width) as u32, Luma([255]));
    }
    while let Some(i) = stack.pop() {
        let (x, y) = (i % width, i / width);
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let j = ny * width + nx;
                if thin[j] > low && edges.get_pixel(nx as u32, ny as u32)[0] == 0 {
                    edges.put_pixel(nx as u32, ny as u32, Luma([255]));
                    stack.push(j);
                }
            }
        }
    }

    edges
}

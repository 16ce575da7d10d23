// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /crop

use axum::http::StatusCode;
use captcha_assist_server::vision::decode_base64;
use image::{GenericImageView, Rgb, RgbImage};
use serde_json::{json, Value};

use super::common::{assert_error_envelope, b64, png_bytes, post_json, router, MockEngine};

/// 100x150, red / green / blue bands of 50 rows
fn stacked_png() -> String {
    b64(&png_bytes(RgbImage::from_fn(100, 150, |_, y| match y / 50 {
        0 => Rgb([255, 0, 0]),
        1 => Rgb([0, 255, 0]),
        _ => Rgb([0, 0, 255]),
    })))
}

fn band(value: &Value) -> image::DynamicImage {
    let bytes = decode_base64(value.as_str().expect("base64 string")).unwrap();
    image::load_from_memory(&bytes).unwrap()
}

#[tokio::test]
async fn test_crop_returns_top_and_bottom_bands() {
    // no engine calls expected
    let (status, body) = post_json(
        router(MockEngine::new()),
        "/crop",
        json!({"image": stacked_png(), "y_coordinate": 50}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    let top = band(&result["slidingImage"]);
    let bottom = band(&result["backImage"]);

    assert_eq!(top.dimensions(), (100, 50));
    assert_eq!(bottom.dimensions(), (100, 50));
    assert_eq!(top.to_rgb8().get_pixel(10, 10), &Rgb([255, 0, 0]));
    assert_eq!(bottom.to_rgb8().get_pixel(10, 10), &Rgb([0, 0, 255]));
}

#[tokio::test]
async fn test_crop_past_half_height_is_500() {
    let (status, body) = post_json(
        router(MockEngine::new()),
        "/crop",
        json!({"image": stacked_png(), "y_coordinate": 80}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_crop_requires_y_coordinate() {
    let (status, body) = post_json(
        router(MockEngine::new()),
        "/crop",
        json!({"image": stacked_png()}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "y_coordinate is required");
}

#[tokio::test]
async fn test_crop_rejects_negative_y() {
    let (status, body) = post_json(
        router(MockEngine::new()),
        "/crop",
        json!({"image": stacked_png(), "y_coordinate": -5}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

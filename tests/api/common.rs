// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for driving the router with a mocked recognition engine
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use captcha_assist_server::{
    api::{create_router, AppState},
    vision::{
        encode_base64, BoundingBox, ImageLoader, LoaderConfig, RecognitionError, Recognizer,
    },
};
use image::{DynamicImage, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;

// 1x1 red PNG - minimal valid image
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

mockall::mock! {
    pub Engine {}

    impl Recognizer for Engine {
        fn classify(&self, image: &[u8]) -> Result<String, RecognitionError>;
        fn detect(&self, image: &[u8]) -> Result<Vec<BoundingBox>, RecognitionError>;
        fn slide_match(
            &self,
            sliding: &[u8],
            background: &[u8],
            simple_target: bool,
        ) -> Result<u32, RecognitionError>;
        fn slide_compare(&self, sliding: &[u8], background: &[u8]) -> Result<u32, RecognitionError>;
    }
}

pub fn state(engine: MockEngine) -> AppState {
    let loader = ImageLoader::new(&LoaderConfig::default()).expect("loader");
    AppState::new(Arc::new(engine), loader)
}

pub fn router(engine: MockEngine) -> Router {
    create_router(state(engine), MAX_BODY_BYTES)
}

pub async fn read_body(response: axum::response::Response) -> (StatusCode, Vec<u8>) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    (status, bytes.to_vec())
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request");
    let response = app.oneshot(request).await.expect("router is infallible");
    let (status, bytes) = read_body(response).await;
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "{} answered {} with a non-JSON body: {}",
            uri,
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, json)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("router is infallible");
    let (status, bytes) = read_body(response).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn b64(bytes: &[u8]) -> String {
    encode_base64(bytes)
}

pub fn png_bytes(image: RgbImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("png encode");
    buffer.into_inner()
}

pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(RgbImage::new(width, height))
}

pub fn assert_error_envelope(body: &Value) {
    assert!(
        body.get("error").and_then(Value::as_str).is_some(),
        "expected an error envelope, got {}",
        body
    );
    assert!(body.get("result").is_none());
}

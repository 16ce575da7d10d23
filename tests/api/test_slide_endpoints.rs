// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /capcode and POST /slideComparison

use axum::http::StatusCode;
use captcha_assist_server::vision::RecognitionError;
use serde_json::json;

use super::common::{assert_error_envelope, b64, post_json, router, MockEngine};

#[tokio::test]
async fn test_capcode_passes_resolved_bytes() {
    let mut engine = MockEngine::new();
    engine
        .expect_slide_match()
        .times(1)
        .returning(|sliding, background, simple_target| {
            assert_eq!(sliding, b"piece");
            assert_eq!(background, b"background");
            assert!(simple_target);
            Ok(87)
        });

    let (status, body) = post_json(
        router(engine),
        "/capcode",
        json!({"slidingImage": b64(b"piece"), "backImage": b64(b"background")}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 87}));
}

#[tokio::test]
async fn test_capcode_simple_target_false() {
    let mut engine = MockEngine::new();
    engine
        .expect_slide_match()
        .returning(|_, _, simple_target| Ok(if simple_target { 1 } else { 2 }));

    let (status, body) = post_json(
        router(engine),
        "/capcode",
        json!({
            "slidingImage": b64(b"a"),
            "backImage": b64(b"b"),
            "simpleTarget": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 2);
}

#[tokio::test]
async fn test_capcode_accepts_raw_byte_arrays() {
    let mut engine = MockEngine::new();
    engine
        .expect_slide_match()
        .returning(|sliding, background, _| Ok((sliding.len() * 10 + background.len()) as u32));

    let (status, body) = post_json(
        router(engine),
        "/capcode",
        json!({"slidingImage": [1, 2, 3], "backImage": [4, 5]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 32);
}

#[tokio::test]
async fn test_capcode_missing_background() {
    let mut engine = MockEngine::new();
    engine.expect_slide_match().never();

    let (status, body) = post_json(
        router(engine),
        "/capcode",
        json!({"slidingImage": b64(b"piece")}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "backImage is required");
}

#[tokio::test]
async fn test_capcode_engine_failure_is_500() {
    let mut engine = MockEngine::new();
    engine.expect_slide_match().returning(|_, _, _| {
        Err(RecognitionError::InvalidInput(
            "sliding piece does not fit the background".into(),
        ))
    });

    let (status, body) = post_json(
        router(engine),
        "/capcode",
        json!({"slidingImage": b64(b"a"), "backImage": b64(b"b")}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
    assert!(!body["error"].as_str().unwrap().contains("does not fit"));
}

#[tokio::test]
async fn test_slide_comparison() {
    let mut engine = MockEngine::new();
    engine.expect_slide_compare().times(1).returning(|sliding, background| {
        assert_eq!(sliding, b"with gap");
        assert_eq!(background, b"without gap");
        Ok(65)
    });

    let (status, body) = post_json(
        router(engine),
        "/slideComparison",
        json!({"slidingImage": b64(b"with gap"), "backImage": b64(b"without gap")}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 65}));
}

#[tokio::test]
async fn test_slide_comparison_malformed_base64() {
    let mut engine = MockEngine::new();
    engine.expect_slide_compare().never();

    let (status, body) = post_json(
        router(engine),
        "/slideComparison",
        json!({"slidingImage": "%%% not base64 %%%", "backImage": b64(b"b")}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_slide_comparison_unreachable_url() {
    let mut engine = MockEngine::new();
    engine.expect_slide_compare().never();

    let (status, body) = post_json(
        router(engine),
        "/slideComparison",
        json!({
            "slidingImage": "http://127.0.0.1:1/piece.png",
            "backImage": b64(b"b")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

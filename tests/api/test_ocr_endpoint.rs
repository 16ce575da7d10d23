// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /classification and POST /calculate

use axum::http::StatusCode;
use captcha_assist_server::vision::RecognitionError;
use serde_json::json;
use tokio::task::JoinSet;

use super::common::{
    assert_error_envelope, b64, post_json, post_raw, router, MockEngine, TINY_PNG_BASE64,
};

/// Engine that "reads" the image bytes as UTF-8
fn echo_engine() -> MockEngine {
    let mut engine = MockEngine::new();
    engine
        .expect_classify()
        .returning(|image| Ok(String::from_utf8_lossy(image).into_owned()));
    engine
}

fn reading(text: &'static str) -> MockEngine {
    let mut engine = MockEngine::new();
    engine
        .expect_classify()
        .returning(move |_| Ok(text.to_string()));
    engine
}

#[tokio::test]
async fn test_classification_returns_text() {
    let (status, body) = post_json(
        router(reading("x7Kp")),
        "/classification",
        json!({"image": TINY_PNG_BASE64}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "x7Kp"}));
}

#[tokio::test]
async fn test_classification_data_url() {
    let (status, body) = post_json(
        router(echo_engine()),
        "/classification",
        json!({"image": format!("data:image/png;base64,{}", b64(b"abcd"))}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "abcd");
}

#[tokio::test]
async fn test_classification_missing_image() {
    for body in [json!({}), json!({"image": ""}), json!({"image": null})] {
        let mut engine = MockEngine::new();
        engine.expect_classify().never();

        let (status, response) = post_json(router(engine), "/classification", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "image is required");
    }
}

#[tokio::test]
async fn test_classification_malformed_base64_is_400() {
    let mut engine = MockEngine::new();
    engine.expect_classify().never();

    let (status, body) = post_json(
        router(engine),
        "/classification",
        json!({"image": "this is *not* base64!"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_classification_unsupported_descriptor() {
    let (status, body) = post_json(
        router(MockEngine::new()),
        "/classification",
        json!({"image": {"url": "http://example.com"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_classification_model_missing_is_500() {
    let mut engine = MockEngine::new();
    engine
        .expect_classify()
        .returning(|_| Err(RecognitionError::ModelUnavailable("classification")));

    let (status, body) = post_json(
        router(engine),
        "/classification",
        json!({"image": TINY_PNG_BASE64}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_malformed_json_body_uses_envelope() {
    let (status, body) = post_raw(router(MockEngine::new()), "/classification", "{\"image\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_concurrent_classifications_stay_independent() {
    let app = router(echo_engine());

    let mut requests = JoinSet::new();
    for i in 0..32 {
        let app = app.clone();
        requests.spawn(async move {
            let text = format!("request-{}", i);
            let (status, body) =
                post_json(app, "/classification", json!({"image": b64(text.as_bytes())})).await;
            (text, status, body)
        });
    }

    let mut completed = 0;
    while let Some(joined) = requests.join_next().await {
        let (text, status, body) = joined.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], text);
        completed += 1;
    }
    assert_eq!(completed, 32);
}

#[tokio::test]
async fn test_calculate_known_expressions() {
    for (text, expected) in [("12+3=15", json!(15)), ("7*6", json!(42)), ("(8-2)/4=?", json!(1.5))] {
        let (status, body) = post_json(
            router(reading(text)),
            "/calculate",
            json!({"image": TINY_PNG_BASE64}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", text);
        assert_eq!(body["result"], expected, "{}", text);
    }
}

#[tokio::test]
async fn test_calculate_without_arithmetic_is_500() {
    let (status, body) = post_json(
        router(reading("hello")),
        "/calculate",
        json!({"image": TINY_PNG_BASE64}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn test_calculate_never_runs_code() {
    // anything beyond arithmetic is stripped before parsing
    let (status, body) = post_json(
        router(reading("__import__('os').system('true')")),
        "/calculate",
        json!({"image": TINY_PNG_BASE64}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
}

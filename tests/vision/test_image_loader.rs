// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image loader against a local HTTP server

use axum::{http::StatusCode, routing::get, Router};
use captcha_assist_server::vision::{
    decode_base64, encode_base64, ImageDescriptor, ImageLoader, LoaderConfig, LoaderError,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

async fn serve_images() -> SocketAddr {
    let app = Router::new()
        .route("/captcha.png", get(|| async { IMAGE_BYTES }))
        .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                IMAGE_BYTES
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn loader() -> ImageLoader {
    ImageLoader::new(&LoaderConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetches_url() {
    let addr = serve_images().await;
    let url = format!("http://{}/captcha.png", addr);

    let bytes = loader().resolve_json(&json!(url)).await.unwrap();
    assert_eq!(bytes, IMAGE_BYTES);
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let addr = serve_images().await;
    let url = format!("http://{}/missing.png", addr);

    match loader().resolve(ImageDescriptor::Url(url.clone())).await {
        Err(LoaderError::Fetch { url: failed, reason }) => {
            assert_eq!(failed, url);
            assert!(reason.contains("404"), "{}", reason);
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_timeout() {
    let addr = serve_images().await;
    let loader = ImageLoader::new(&LoaderConfig {
        accept_invalid_certs: false,
        fetch_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let result = loader
        .resolve(ImageDescriptor::Url(format!("http://{}/slow.png", addr)))
        .await;
    assert!(matches!(result, Err(LoaderError::Fetch { .. })));
}

#[tokio::test]
async fn test_base64_round_trip() {
    let samples: [&[u8]; 4] = [b"", b"a", b"captcha", IMAGE_BYTES];
    for sample in samples {
        let encoded = encode_base64(sample);
        let decoded = loader().resolve_json(&json!(encoded)).await.unwrap();
        assert_eq!(decoded, sample);
        assert_eq!(encode_base64(&decode_base64(&encoded).unwrap()), encoded);
    }
}

#[tokio::test]
async fn test_malformed_base64_is_decode_error() {
    for bad in ["@@@@", "abc$", "data:image/png;base64,***"] {
        assert!(
            matches!(
                loader().resolve_json(&json!(bad)).await,
                Err(LoaderError::Decode(_))
            ),
            "{}",
            bad
        );
    }
}

#[tokio::test]
async fn test_unsupported_values() {
    for value in [json!(true), json!(3.5), json!({"bytes": []}), json!([1, 256])] {
        assert!(matches!(
            loader().resolve_json(&value).await,
            Err(LoaderError::Unsupported(_))
        ));
    }
}

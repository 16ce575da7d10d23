// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vision model manager tests
//!
//! Tests marked `#[ignore]` need the ONNX models under `./models`:
//! `common.onnx`, `charsets.json` and `common_det.onnx`.

use captcha_assist_server::vision::{
    RecognitionError, Recognizer, VisionModelConfig, VisionModelManager,
};
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

fn png(image: RgbImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn without_models() -> VisionModelConfig {
    VisionModelConfig {
        ocr_model_path: None,
        ocr_charset_path: None,
        det_model_path: None,
        intra_threads: 1,
    }
}

#[test]
fn test_default_config_points_at_models_dir() {
    let config = VisionModelConfig::default();
    assert_eq!(
        config.ocr_model_path.as_deref(),
        Some(Path::new("./models/common.onnx"))
    );
    assert_eq!(
        config.det_model_path.as_deref(),
        Some(Path::new("./models/common_det.onnx"))
    );
}

#[tokio::test]
async fn test_charset_without_model_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let charset = dir.path().join("charsets.json");
    std::fs::write(&charset, r#"["", "a", "b"]"#).unwrap();

    let manager = VisionModelManager::new(VisionModelConfig {
        ocr_model_path: Some(dir.path().join("missing.onnx")),
        ocr_charset_path: Some(charset),
        det_model_path: None,
        intra_threads: 1,
    })
    .await
    .unwrap();

    assert!(!manager.has_ocr());
    assert!(matches!(
        manager.classify(&png(RgbImage::new(4, 4))),
        Err(RecognitionError::ModelUnavailable(_))
    ));
}

#[tokio::test]
async fn test_slide_match_needs_no_models() {
    let manager = VisionModelManager::new(without_models()).await.unwrap();

    // bright square on a dark background, piece cut from the same spot
    let background = RgbImage::from_fn(80, 40, |x, y| {
        if (50..62).contains(&x) && (14..26).contains(&y) {
            Rgb([240, 240, 240])
        } else {
            Rgb([20, 20, 20])
        }
    });
    let piece = image::imageops::crop_imm(&background, 46, 10, 20, 20).to_image();

    let offset = manager
        .slide_match(&png(piece), &png(background), true)
        .unwrap();
    assert_eq!(offset, 46);
}

#[tokio::test]
#[ignore = "requires ./models/common.onnx and ./models/charsets.json"]
async fn test_real_classifier_reads_text() {
    let manager = VisionModelManager::new(VisionModelConfig::default())
        .await
        .unwrap();
    assert!(manager.has_ocr());

    let image = png(RgbImage::from_pixel(120, 40, Rgb([255, 255, 255])));
    let text = manager.classify(&image).unwrap();
    // a blank image reads as little or nothing
    assert!(text.chars().count() <= 2, "read {:?} from a blank image", text);
}

#[tokio::test]
#[ignore = "requires ./models/common_det.onnx"]
async fn test_real_detector_boxes_are_inside_image() {
    let manager = VisionModelManager::new(VisionModelConfig::default())
        .await
        .unwrap();
    assert!(manager.has_detection());

    let image = RgbImage::from_fn(200, 100, |x, y| {
        if (x / 20 + y / 20) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    for bbox in manager.detect(&png(image)).unwrap() {
        assert!(bbox.x1 < bbox.x2 && bbox.x2 <= 200);
        assert!(bbox.y1 < bbox.y2 && bbox.y2 <= 100);
    }
}

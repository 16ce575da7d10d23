// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod crop;
pub mod detection;
pub mod errors;
pub mod fields;
pub mod http_server;
pub mod ocr;
pub mod slide;

pub use crop::{crop_handler, CropRequest, CropResponse};
pub use detection::{detection_handler, select_handler, DetectionRequest};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState, HealthResponse, ModelAvailability};
pub use ocr::{calculate_handler, classification_handler, OcrRequest};
pub use slide::{capcode_handler, slide_comparison_handler, SlideCompareRequest, SlideMatchRequest};
